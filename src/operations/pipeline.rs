use tracing::info;

use crate::error::Result;
use crate::geometry::curve::Curve2;
use crate::geometry::polygon::GeneralPolygon2;
use crate::operations::extract::ExtractCurves;
use crate::operations::offset::{GraphOffset2D, OffsetParams};
use crate::operations::repair::{OverlapRepair, RepairParams};

/// Offsets a region and returns the result as curves.
///
/// Runs [`GraphOffset2D`], then [`OverlapRepair`] if configured, then
/// [`ExtractCurves`].
#[derive(Debug)]
pub struct OffsetCurves2D {
    region: GeneralPolygon2,
    offset: OffsetParams,
    repair: Option<RepairParams>,
}

impl OffsetCurves2D {
    /// Creates a new pipeline without overlap repair.
    #[must_use]
    pub fn new(region: impl Into<GeneralPolygon2>, offset: OffsetParams) -> Self {
        Self {
            region: region.into(),
            offset,
            repair: None,
        }
    }

    /// Enables overlap repair between offsetting and extraction.
    #[must_use]
    pub fn with_repair(mut self, repair: RepairParams) -> Self {
        self.repair = Some(repair);
        self
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first error of a stage: invalid parameters or a
    /// degenerate region.
    pub fn execute(&self) -> Result<Vec<Curve2>> {
        if let Some(repair) = &self.repair {
            repair.validate()?;
        }

        let mut result = GraphOffset2D::new(self.region.clone(), self.offset.clone()).execute()?;
        if let Some(repair) = &self.repair {
            OverlapRepair::new(repair.clone()).execute(&mut result.graph)?;
        }
        let curves = ExtractCurves::new(&result.graph).execute();

        info!(
            curves = curves.len(),
            vertices = result.graph.vertex_count(),
            iterations = result.stats.iterations,
            "offset curves ready"
        );
        Ok(curves)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::polygon::Polygon2;
    use crate::math::{Point2, Vector2};

    /// Circle of radius 10 with a radius-5 hole shifted 2 along x.
    fn crescent() -> GeneralPolygon2 {
        GeneralPolygon2::new(Polygon2::circle(Point2::origin(), 10.0, 64)).with_hole(
            Polygon2::circle(Point2::origin(), 5.0, 64).translate(Vector2::new(2.0, 0.0)),
        )
    }

    /// Perimeter of the exact offset: an arc of radius 8 around the origin
    /// and an arc of radius 7 around the shifted centre, meeting at
    /// x = 4.75.
    fn crescent_offset_perimeter() -> f64 {
        let y = (64.0_f64 - 4.75 * 4.75).sqrt();
        let outer = 2.0 * (std::f64::consts::PI - y.atan2(4.75));
        let inner = 2.0 * (std::f64::consts::PI - y.atan2(2.75));
        8.0 * outer + 7.0 * inner
    }

    #[test]
    fn crescent_gives_one_closed_curve() {
        let curves = OffsetCurves2D::new(crescent(), OffsetParams::new(2.0, 0.2))
            .execute()
            .unwrap();
        assert_eq!(curves.len(), 1);
        let c = &curves[0];
        assert!(c.closed);
        assert!((150..=600).contains(&c.len()), "{} vertices", c.len());
        assert_relative_eq!(c.length(), crescent_offset_perimeter(), max_relative = 0.1);
    }

    #[test]
    fn repaired_crescent_keeps_its_shape() {
        let curves = OffsetCurves2D::new(crescent(), OffsetParams::new(2.0, 0.2))
            .with_repair(RepairParams::new(0.1))
            .execute()
            .unwrap();
        assert_eq!(curves.len(), 1);
        let c = &curves[0];
        assert!(c.closed);
        // Flat collapse thins the points but the loop stays bounded.
        assert!((40..=600).contains(&c.len()), "{} vertices", c.len());
        assert_relative_eq!(c.length(), crescent_offset_perimeter(), max_relative = 0.1);
    }

    #[test]
    fn bad_repair_radius_is_rejected_up_front() {
        assert!(OffsetCurves2D::new(crescent(), OffsetParams::new(2.0, 0.2))
            .with_repair(RepairParams::new(0.0))
            .execute()
            .is_err());
    }
}
