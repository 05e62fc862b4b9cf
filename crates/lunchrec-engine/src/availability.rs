use chrono::NaiveDate;
use lunchrec_core::{CommitmentDirectory, Result, UserId, UserProfile};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Resolves which users have no conflicting commitment on a date.
///
/// Pure read over the commitment directory; weekend filtering belongs to the
/// generation driver, not here.
pub struct AvailabilityResolver {
    commitments: Arc<dyn CommitmentDirectory>,
}

impl AvailabilityResolver {
    pub fn new(commitments: Arc<dyn CommitmentDirectory>) -> Self {
        Self { commitments }
    }

    /// Every user in `population` without a party membership or personal
    /// schedule entry on `date`.
    ///
    /// Commitments whose raw date string does not parse are skipped with a
    /// warning, leaving the affected user available (fail open). Records
    /// that parse to a different date are ignored.
    pub async fn available_on(
        &self,
        date: NaiveDate,
        population: &[UserProfile],
    ) -> Result<Vec<UserId>> {
        let records = self.commitments.commitments_on(date).await?;

        let mut busy: HashSet<&str> = HashSet::new();
        for record in &records {
            match NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") {
                Ok(parsed) if parsed == date => {
                    busy.insert(record.user_id.as_str());
                }
                Ok(_) => {}
                Err(_) => {
                    warn!(
                        user = %record.user_id,
                        raw = %record.date,
                        "skipping commitment with malformed date"
                    );
                }
            }
        }

        Ok(population
            .iter()
            .filter(|profile| !busy.contains(profile.user_id.as_str()))
            .map(|profile| profile.user_id.clone())
            .collect())
    }
}
