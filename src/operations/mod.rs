pub mod extract;
pub mod offset;
pub mod pipeline;
pub mod query;
pub mod repair;

pub use extract::ExtractCurves;
pub use offset::{GraphOffset2D, OffsetParams, OffsetResult, OffsetStats};
pub use pipeline::OffsetCurves2D;
pub use repair::{OverlapRepair, RepairParams, RepairStats};
