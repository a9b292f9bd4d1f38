pub mod components;
pub mod crossings;
pub mod deviation;
pub mod is_valid;

pub use components::ConnectedComponents;
pub use crossings::EdgeCrossings;
pub use deviation::{Deviation, DistanceDeviation};
pub use is_valid::GraphIsValid;
