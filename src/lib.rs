pub mod error;
pub mod geometry;
pub mod graph;
pub mod math;
pub mod operations;
pub mod spatial;

pub use error::{ContourGraphError, Result};
