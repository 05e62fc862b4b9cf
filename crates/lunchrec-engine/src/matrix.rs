use lunchrec_core::{PairScore, ScoreWeights, UserId, UserProfile};
use rayon::prelude::*;
use std::collections::HashMap;

/// Pairwise score table for one generation run.
///
/// Stored against the canonically ordered pair key, so symmetry holds by
/// construction; `score` normalizes the lookup order. Unknown pairs (and the
/// self pair) score zero.
pub struct CompatibilityMatrix {
    scores: HashMap<(UserId, UserId), PairScore>,
}

impl CompatibilityMatrix {
    pub fn score(&self, a: &str, b: &str) -> PairScore {
        self.scores
            .get(&ordered_pair(a, b))
            .copied()
            .unwrap_or_default()
    }

    pub fn pair_count(&self) -> usize {
        self.scores.len()
    }
}

fn ordered_pair(a: &str, b: &str) -> (UserId, UserId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Builds the full N×N pair table once per generation run. Participation
/// counts are precomputed per user by the caller; only the O(N²) difference
/// checks happen here, parallelized over the upper triangle.
pub struct MatrixBuilder {
    weights: ScoreWeights,
}

impl MatrixBuilder {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn build(
        &self,
        profiles: &[UserProfile],
        participation: &HashMap<UserId, u64>,
    ) -> CompatibilityMatrix {
        let scores = profiles
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, a)| {
                profiles[i + 1..].iter().map(move |b| {
                    let score = PairScore {
                        compatibility: self.compatibility(a, b),
                        pattern: self.pattern(
                            participation.get(&a.user_id).copied().unwrap_or(0),
                            participation.get(&b.user_id).copied().unwrap_or(0),
                        ),
                    };
                    (ordered_pair(&a.user_id, &b.user_id), score)
                })
            })
            .collect();

        CompatibilityMatrix { scores }
    }

    /// Attribute-based similarity: set intersection over the multi-valued
    /// tag fields plus fixed age-group and gender-diversity bonuses.
    pub fn compatibility(&self, a: &UserProfile, b: &UserProfile) -> i64 {
        let w = &self.weights;
        let mut score = 0;

        score += shared_tag_count(&a.cuisine_genres, &b.cuisine_genres) as i64
            * w.shared_cuisine_tag;
        score += shared_tag_count(&a.lunch_styles, &b.lunch_styles) as i64
            * w.shared_lunch_style_tag;

        if let (Some(x), Some(y)) = (&a.age_group, &b.age_group) {
            if !x.is_empty() && x == y {
                score += w.age_group_match;
            }
        }
        if let (Some(x), Some(y)) = (&a.gender, &b.gender) {
            if !x.is_empty() && !y.is_empty() && x != y {
                score += w.gender_diversity;
            }
        }

        score
    }

    /// Activity-pattern similarity from historical participation counts.
    pub fn pattern(&self, a_count: u64, b_count: u64) -> i64 {
        let gap = a_count.abs_diff(b_count);
        if gap <= self.weights.pattern_close_gap {
            self.weights.pattern_close
        } else if gap <= self.weights.pattern_near_gap {
            self.weights.pattern_near
        } else {
            0
        }
    }
}

fn shared_tag_count(a: &[String], b: &[String]) -> usize {
    a.iter().filter(|tag| b.contains(tag)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MatrixBuilder {
        MatrixBuilder::new(ScoreWeights::default())
    }

    #[test]
    fn shared_tags_score_per_intersection_element() {
        let a = UserProfile::new("a").with_cuisine_genres("한식,중식");
        let b = UserProfile::new("b").with_cuisine_genres("한식,중식,일식");
        // Two shared cuisine tags at 15 points each.
        assert_eq!(builder().compatibility(&a, &b), 30);
    }

    #[test]
    fn empty_tag_fields_score_nothing() {
        let a = UserProfile::new("a");
        let b = UserProfile::new("b").with_cuisine_genres("한식");
        assert_eq!(builder().compatibility(&a, &b), 0);
    }

    #[test]
    fn age_match_and_gender_diversity_bonuses() {
        let a = UserProfile::new("a").with_age_group("30대").with_gender("남");
        let b = UserProfile::new("b").with_age_group("30대").with_gender("여");
        assert_eq!(builder().compatibility(&a, &b), 20 + 15);

        let c = UserProfile::new("c").with_age_group("20대").with_gender("남");
        assert_eq!(builder().compatibility(&a, &c), 0);
    }

    #[test]
    fn lunch_style_overlap_scores() {
        let a = UserProfile::new("a").with_lunch_styles("빠른 식사,가성비");
        let b = UserProfile::new("b").with_lunch_styles("가성비");
        assert_eq!(builder().compatibility(&a, &b), 20);
    }

    #[test]
    fn pattern_tiers_by_participation_gap() {
        let m = builder();
        assert_eq!(m.pattern(10, 10), 20);
        assert_eq!(m.pattern(10, 12), 20);
        assert_eq!(m.pattern(10, 15), 10);
        assert_eq!(m.pattern(10, 16), 0);
        assert_eq!(m.pattern(3, 0), 10);
    }

    #[test]
    fn matrix_is_symmetric() {
        let profiles = vec![
            UserProfile::new("a").with_cuisine_genres("한식").with_gender("남"),
            UserProfile::new("b").with_cuisine_genres("한식").with_gender("여"),
            UserProfile::new("c").with_cuisine_genres("양식"),
        ];
        let mut participation = HashMap::new();
        participation.insert("a".to_string(), 1);
        participation.insert("b".to_string(), 8);
        participation.insert("c".to_string(), 3);

        let matrix = builder().build(&profiles, &participation);
        for x in ["a", "b", "c"] {
            for y in ["a", "b", "c"] {
                assert_eq!(matrix.score(x, y), matrix.score(y, x));
            }
        }
        assert_eq!(matrix.score("a", "b").compatibility, 15 + 15);
        assert_eq!(matrix.score("a", "b").pattern, 0);
        assert_eq!(matrix.score("a", "c").pattern, 20);
    }

    #[test]
    fn unknown_pairs_score_zero() {
        let matrix = builder().build(&[], &HashMap::new());
        assert_eq!(matrix.score("x", "y"), PairScore::default());
        assert_eq!(matrix.pair_count(), 0);
    }
}
