use crate::{Commitment, Result, UserProfile};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Read-only view of the external user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Snapshot of the full active population.
    async fn active_users(&self) -> Result<Vec<UserProfile>>;
}

/// Read-only view of party memberships and personal schedule entries.
#[async_trait]
pub trait CommitmentDirectory: Send + Sync {
    /// Every commitment recorded against `date`. Implementations may also
    /// return records whose raw date string they could not parse; the
    /// resolver decides what to do with those.
    async fn commitments_on(&self, date: NaiveDate) -> Result<Vec<Commitment>>;
}

/// Read-only view of historical party participation.
#[async_trait]
pub trait HistoryDirectory: Send + Sync {
    /// Most recent party both users attended together strictly before
    /// `before`, if any.
    async fn last_shared_party(
        &self,
        a: &str,
        b: &str,
        before: NaiveDate,
    ) -> Result<Option<NaiveDate>>;

    /// Total number of party memberships for one user, used for
    /// activity-pattern scoring.
    async fn participation_count(&self, user: &str) -> Result<u64>;
}

/// Read-only view of the per-user preference sub-store.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Normalized lunch-style preference shown on recommendation cards.
    async fn lunch_style(&self, user: &str) -> Result<Option<String>>;
}
