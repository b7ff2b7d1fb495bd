pub mod approachability;
pub mod cancellation;
pub mod feedback;
pub mod providers;
pub mod recommendations;
pub mod strategies;

pub use recommendations::{RandomSource, RecommendationEngine};
