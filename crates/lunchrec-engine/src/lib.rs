pub mod assembler;
pub mod availability;
pub mod generation;
pub mod matrix;
pub mod schedule;

pub use assembler::*;
pub use availability::*;
pub use generation::*;
pub use matrix::*;
pub use schedule::*;

// Re-export common types for convenience
pub use lunchrec_cache::RecommendationStore;
pub use lunchrec_core::{
    EngineConfig, LunchRecError, RecommendationEntry, Result, ScoreWeights, UserId, UserProfile,
};
