use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scoring constants for the compatibility and activity-pattern components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Points per shared cuisine-genre tag (set intersection).
    pub shared_cuisine_tag: i64,
    /// Points per shared lunch-style tag (set intersection).
    pub shared_lunch_style_tag: i64,
    /// Bonus when both age-group tags are present and equal.
    pub age_group_match: i64,
    /// Bonus when both gender tags are present and differ.
    pub gender_diversity: i64,
    /// Pattern bonus when participation counts differ by at most
    /// `pattern_close_gap`.
    pub pattern_close: i64,
    /// Pattern bonus when participation counts differ by at most
    /// `pattern_near_gap`.
    pub pattern_near: i64,
    pub pattern_close_gap: u64,
    pub pattern_near_gap: u64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            shared_cuisine_tag: 15,
            shared_lunch_style_tag: 20,
            age_group_match: 20,
            gender_diversity: 15,
            pattern_close: 20,
            pattern_near: 10,
            pattern_close_gap: 2,
            pattern_near_gap: 5,
        }
    }
}

/// Tunables for one generation run and the group assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rolling window: today plus this many following calendar days.
    pub window_days: u32,
    /// Hard cap on stored groups per (user, date) key.
    pub max_groups: usize,
    /// Triples are drawn from this many candidates at the top of the ranked
    /// list, a bounded neighborhood rather than full combination search.
    pub triple_scan: usize,
    /// Stop assembling triples once this many exist.
    pub max_triples: usize,
    /// Pairs are drawn from this many top candidates.
    pub pair_scan: usize,
    /// Stop assembling pairs once the group total reaches this.
    pub pair_fill_target: usize,
    /// Upper bound (exclusive) of the uniform jitter added to each
    /// candidate's total score.
    pub jitter_max: f64,
    /// Abort a generation run that has been going longer than this.
    /// Checked between dates; the run fails without publishing.
    pub soft_deadline: Option<Duration>,
    pub weights: ScoreWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            max_groups: 10,
            triple_scan: 6,
            max_triples: 6,
            pair_scan: 3,
            pair_fill_target: 9,
            jitter_max: 50.0,
            soft_deadline: None,
            weights: ScoreWeights::default(),
        }
    }
}
