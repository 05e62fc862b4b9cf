pub mod store;

pub use store::*;

// Re-export common types for convenience
pub use lunchrec_core::{LunchRecError, RecommendationEntry, Result, UserId};
