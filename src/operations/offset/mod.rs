pub mod graph_offset;
pub mod params;

pub use graph_offset::{GraphOffset2D, OffsetResult, OffsetStats};
pub use params::OffsetParams;
