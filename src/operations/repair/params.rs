//! Overlap repair parameters.

use crate::error::OperationError;

/// Parameters for [`OverlapRepair`](super::OverlapRepair).
#[derive(Debug, Clone)]
pub struct RepairParams {
    /// Minimum distance a vertex must keep from non-local parts of the
    /// graph.
    pub overlap_radius: f64,

    /// Path length around a vertex that counts as its own neighbourhood and
    /// is ignored by the self-distance.
    pub chain_radius: f64,

    /// Degree-2 vertices sharper than this (degrees) are eroded first.
    pub sharp_angle_deg: f64,

    /// Degree-2 vertices within this many degrees of straight are collapsed
    /// during cleanup.
    pub flat_tolerance_deg: f64,
}

impl RepairParams {
    /// Creates parameters with defaults derived from `overlap_radius`.
    #[must_use]
    pub fn new(overlap_radius: f64) -> Self {
        Self {
            overlap_radius,
            chain_radius: 2.0 * overlap_radius,
            sharp_angle_deg: 20.0,
            flat_tolerance_deg: 2.5,
        }
    }

    /// Set the local chain radius.
    #[must_use]
    pub const fn with_chain_radius(mut self, radius: f64) -> Self {
        self.chain_radius = radius;
        self
    }

    /// Set the sharp-corner threshold in degrees.
    #[must_use]
    pub const fn with_sharp_angle(mut self, degrees: f64) -> Self {
        self.sharp_angle_deg = degrees;
        self
    }

    /// Set the flat-collapse tolerance in degrees.
    #[must_use]
    pub const fn with_flat_tolerance(mut self, degrees: f64) -> Self {
        self.flat_tolerance_deg = degrees;
        self
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if a radius is not positive
    /// and finite or an angle is outside `[0, 180]`.
    pub fn validate(&self) -> Result<(), OperationError> {
        if !self.overlap_radius.is_finite() || self.overlap_radius <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "overlap radius must be positive and finite, got {}",
                self.overlap_radius
            )));
        }
        if !self.chain_radius.is_finite() || self.chain_radius < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "chain radius must be non-negative and finite, got {}",
                self.chain_radius
            )));
        }
        for (name, value) in [
            ("sharp angle", self.sharp_angle_deg),
            ("flat tolerance", self.flat_tolerance_deg),
        ] {
            if !(0.0..=180.0).contains(&value) {
                return Err(OperationError::InvalidInput(format!(
                    "{name} must be in [0, 180] degrees, got {value}"
                )));
            }
        }
        Ok(())
    }
}
