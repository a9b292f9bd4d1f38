//! Offset solver parameters.

use crate::error::OperationError;

/// Parameters for the iterative graph offset.
///
/// Everything except the target distance and the point spacing has a
/// default derived from the spacing `s`; the derived lengths are exposed as
/// accessors so the phases never disagree about them.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct OffsetParams {
    /// Signed target distance. Positive offsets into the material (inward),
    /// negative away from it.
    pub distance: f64,

    /// Target point spacing along the offset front.
    pub spacing: f64,

    /// Laplacian smoothing passes per iteration.
    pub smooth_passes: usize,

    /// Fraction of the way each smoothing pass moves a vertex toward the
    /// average of its neighbours.
    pub smooth_alpha: f64,

    /// Degree-2 vertices with an opening angle below this (degrees) count
    /// as sharp corners and are never moved by edge collapse.
    pub sharp_angle_deg: f64,

    /// Extra step-only passes after the main iterations.
    pub settle_passes: usize,

    /// Remove vertices that could not reach the target distance, together
    /// with the dangling branches they leave at junctions.
    pub trim_unreachable: bool,

    /// Detach all but the best-aligned pair of edges at junctions.
    pub resolve_junctions: bool,

    /// Run the step and smoothing computations on the rayon pool.
    pub parallel: bool,
}

impl OffsetParams {
    /// Creates parameters with defaults derived from `spacing`.
    #[must_use]
    pub fn new(distance: f64, spacing: f64) -> Self {
        Self {
            distance,
            spacing,
            smooth_passes: 5,
            smooth_alpha: 0.2,
            sharp_angle_deg: 140.0,
            settle_passes: 2,
            trim_unreachable: true,
            resolve_junctions: true,
            parallel: true,
        }
    }

    /// Set number of smoothing passes.
    #[must_use]
    pub const fn with_smooth_passes(mut self, passes: usize) -> Self {
        self.smooth_passes = passes;
        self
    }

    /// Set smoothing strength.
    #[must_use]
    pub const fn with_smooth_alpha(mut self, alpha: f64) -> Self {
        self.smooth_alpha = alpha;
        self
    }

    /// Set the sharp-corner threshold in degrees.
    #[must_use]
    pub const fn with_sharp_angle(mut self, degrees: f64) -> Self {
        self.sharp_angle_deg = degrees;
        self
    }

    /// Set number of settle passes.
    #[must_use]
    pub const fn with_settle_passes(mut self, passes: usize) -> Self {
        self.settle_passes = passes;
        self
    }

    /// Enable or disable trimming of unreachable fronts.
    #[must_use]
    pub const fn with_trim_unreachable(mut self, enable: bool) -> Self {
        self.trim_unreachable = enable;
        self
    }

    /// Enable or disable junction resolution.
    #[must_use]
    pub const fn with_resolve_junctions(mut self, enable: bool) -> Self {
        self.resolve_junctions = enable;
        self
    }

    /// Enable or disable the rayon-parallel phases.
    #[must_use]
    pub const fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Largest distance a vertex travels in one step move.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.spacing * 0.5
    }

    /// Number of iterations needed to cover the distance at the step size.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn base_iterations(&self) -> usize {
        (self.distance.abs() / self.step_size()).ceil() as usize
    }

    /// Actual per-iteration step: the distance split evenly over the base
    /// iterations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step_delta(&self) -> f64 {
        let n = self.base_iterations();
        if n == 0 {
            0.0
        } else {
            self.distance.abs() / n as f64
        }
    }

    /// Base iterations plus a quarter and a fixed margin.
    #[must_use]
    pub fn total_iterations(&self) -> usize {
        let n = self.base_iterations();
        n + n / 4 + 5
    }

    #[must_use]
    pub fn smooth_max_move(&self) -> f64 {
        self.spacing * 0.5
    }

    /// Vertices closer than this are welded.
    #[must_use]
    pub fn merge_distance(&self) -> f64 {
        self.spacing * 0.5
    }

    #[must_use]
    pub fn min_edge_length(&self) -> f64 {
        self.spacing * 0.5
    }

    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        self.spacing * 1.5
    }

    /// Slack below `|distance|` tolerated before a vertex counts as
    /// unreachable.
    #[must_use]
    pub fn trim_tolerance(&self) -> f64 {
        self.spacing * 0.25
    }

    /// How far detached junction branches are re-anchored from the junction.
    #[must_use]
    pub fn junction_step_back(&self) -> f64 {
        self.spacing * 0.5
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a non-finite distance, a
    /// non-finite or non-positive spacing, a smoothing strength outside
    /// `[0, 1]`, or a sharp angle outside `[0, 180]`.
    pub fn validate(&self) -> Result<(), OperationError> {
        if !self.distance.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "offset distance must be finite, got {}",
                self.distance
            )));
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "spacing must be positive and finite, got {}",
                self.spacing
            )));
        }
        if !(0.0..=1.0).contains(&self.smooth_alpha) {
            return Err(OperationError::InvalidInput(format!(
                "smoothing alpha must be in [0, 1], got {}",
                self.smooth_alpha
            )));
        }
        if !(0.0..=180.0).contains(&self.sharp_angle_deg) {
            return Err(OperationError::InvalidInput(format!(
                "sharp angle must be in [0, 180] degrees, got {}",
                self.sharp_angle_deg
            )));
        }
        Ok(())
    }
}
