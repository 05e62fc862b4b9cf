use crate::matrix::CompatibilityMatrix;
use lunchrec_core::{EngineConfig, UserId};
use rand::Rng;
use std::cmp::Ordering;

/// One ranked candidate for a (requester, date) pair.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub user_id: UserId,
    pub total: f64,
}

/// Greedy bounded-neighborhood group assembly.
///
/// Triples, pairs and singles are drawn from a fixed-size window at the top
/// of the ranked list rather than from all combinations, keeping assembly
/// O(1) in the population size. A candidate may appear in more than one
/// group of the same output list.
pub struct GroupAssembler {
    config: EngineConfig,
}

impl GroupAssembler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Rank everyone in `available` except the requester by combined score
    /// plus uniform jitter in `[0, jitter_max)`. The jitter varies the daily
    /// output when the underlying scores are static; it is freshly drawn
    /// every run.
    pub fn rank<R: Rng>(
        &self,
        requester: &str,
        available: &[UserId],
        matrix: &CompatibilityMatrix,
        rng: &mut R,
    ) -> Vec<ScoredCandidate> {
        let mut ranked: Vec<ScoredCandidate> = available
            .iter()
            .filter(|id| id.as_str() != requester)
            .map(|id| {
                let base = matrix.score(requester, id).total() as f64;
                let jitter = if self.config.jitter_max > 0.0 {
                    rng.random_range(0.0..self.config.jitter_max)
                } else {
                    0.0
                };
                ScoredCandidate {
                    user_id: id.clone(),
                    total: base + jitter,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        ranked
    }

    /// Assemble up to `max_groups` member-id lists: triples first, then
    /// pairs while below the fill target, then one single.
    pub fn assemble(&self, ranked: &[ScoredCandidate]) -> Vec<Vec<UserId>> {
        let cfg = &self.config;
        let mut groups: Vec<Vec<UserId>> = Vec::new();

        let window = ranked.len().min(cfg.triple_scan);
        'triples: for i in 0..window {
            for j in (i + 1)..window {
                for k in (j + 1)..window {
                    groups.push(vec![
                        ranked[i].user_id.clone(),
                        ranked[j].user_id.clone(),
                        ranked[k].user_id.clone(),
                    ]);
                    if groups.len() >= cfg.max_triples {
                        break 'triples;
                    }
                }
            }
        }

        if groups.len() < cfg.pair_fill_target && ranked.len() >= 2 {
            let window = ranked.len().min(cfg.pair_scan);
            'pairs: for i in 0..window {
                for j in (i + 1)..window {
                    groups.push(vec![ranked[i].user_id.clone(), ranked[j].user_id.clone()]);
                    if groups.len() >= cfg.pair_fill_target {
                        break 'pairs;
                    }
                }
            }
        }

        if groups.len() < cfg.max_groups {
            if let Some(top) = ranked.first() {
                groups.push(vec![top.user_id.clone()]);
            }
        }

        groups.truncate(cfg.max_groups);
        groups
    }
}
