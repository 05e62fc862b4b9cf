use crate::{
    Commitment, CommitmentDirectory, HistoryDirectory, PreferenceStore, Result, UserDirectory,
    UserId, UserProfile,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;

/// One scheduled lunch party as the history/commitment queries see it.
#[derive(Debug, Clone)]
pub struct PartyRecord {
    /// Raw upstream date string, usually `YYYY-MM-DD`.
    pub date: String,
    pub host: UserId,
    pub members: Vec<UserId>,
}

impl PartyRecord {
    /// Host plus members; the host is committed like any other attendee.
    pub fn attendees(&self) -> impl Iterator<Item = &UserId> {
        std::iter::once(&self.host).chain(self.members.iter())
    }

    fn parsed_date(&self) -> Option<NaiveDate> {
        parse_upstream_date(&self.date)
    }
}

#[derive(Debug, Clone)]
struct ScheduleRecord {
    user_id: UserId,
    date: String,
}

/// In-memory implementation of all four directory traits, used by the test
/// suites and by embedders that hold their population in process. Party rows
/// feed both the commitment view and the history queries, mirroring how the
/// upstream schema derives them from the same table.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<Vec<UserProfile>>,
    parties: RwLock<Vec<PartyRecord>>,
    schedules: RwLock<Vec<ScheduleRecord>>,
    lunch_styles: RwLock<HashMap<UserId, String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, profile: UserProfile) {
        self.users.write().push(profile);
    }

    pub fn add_party(
        &self,
        date: impl Into<String>,
        host: impl Into<UserId>,
        members: impl IntoIterator<Item = impl Into<UserId>>,
    ) {
        self.parties.write().push(PartyRecord {
            date: date.into(),
            host: host.into(),
            members: members.into_iter().map(Into::into).collect(),
        });
    }

    pub fn add_personal_schedule(&self, user: impl Into<UserId>, date: impl Into<String>) {
        self.schedules.write().push(ScheduleRecord {
            user_id: user.into(),
            date: date.into(),
        });
    }

    pub fn set_lunch_style(&self, user: impl Into<UserId>, style: impl Into<String>) {
        self.lunch_styles.write().insert(user.into(), style.into());
    }
}

/// A record belongs to `date` if its raw string parses to exactly that date.
/// Unparseable records cannot be excluded by date, so they are handed to the
/// caller and the resolver applies the fail-open rule.
fn matches_or_malformed(raw: &str, date: NaiveDate) -> bool {
    match parse_upstream_date(raw) {
        Some(parsed) => parsed == date,
        None => true,
    }
}

fn parse_upstream_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn active_users(&self) -> Result<Vec<UserProfile>> {
        Ok(self.users.read().clone())
    }
}

#[async_trait]
impl CommitmentDirectory for InMemoryDirectory {
    async fn commitments_on(&self, date: NaiveDate) -> Result<Vec<Commitment>> {
        let mut commitments = Vec::new();
        for party in self.parties.read().iter() {
            if matches_or_malformed(&party.date, date) {
                for attendee in party.attendees() {
                    commitments.push(Commitment::new(attendee.clone(), party.date.clone()));
                }
            }
        }
        for schedule in self.schedules.read().iter() {
            if matches_or_malformed(&schedule.date, date) {
                commitments.push(Commitment::new(
                    schedule.user_id.clone(),
                    schedule.date.clone(),
                ));
            }
        }
        Ok(commitments)
    }
}

#[async_trait]
impl HistoryDirectory for InMemoryDirectory {
    async fn last_shared_party(
        &self,
        a: &str,
        b: &str,
        before: NaiveDate,
    ) -> Result<Option<NaiveDate>> {
        let last = self
            .parties
            .read()
            .iter()
            .filter(|party| {
                party.attendees().any(|id| id == a) && party.attendees().any(|id| id == b)
            })
            .filter_map(|party| party.parsed_date())
            .filter(|date| *date < before)
            .max();
        Ok(last)
    }

    async fn participation_count(&self, user: &str) -> Result<u64> {
        let count = self
            .parties
            .read()
            .iter()
            .filter(|party| party.attendees().any(|id| id == user))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl PreferenceStore for InMemoryDirectory {
    async fn lunch_style(&self, user: &str) -> Result<Option<String>> {
        Ok(self.lunch_styles.read().get(user).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn commitments_cover_party_host_and_members() {
        let dir = InMemoryDirectory::new();
        dir.add_party("2025-06-09", "host", ["m1", "m2"]);

        let commitments = dir.commitments_on(date(2025, 6, 9)).await.unwrap();
        let users: Vec<&str> = commitments.iter().map(|c| c.user_id.as_str()).collect();
        assert_eq!(users, vec!["host", "m1", "m2"]);

        assert!(dir.commitments_on(date(2025, 6, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_party_dates_are_surfaced_not_dropped() {
        let dir = InMemoryDirectory::new();
        dir.add_party("someday", "u1", Vec::<String>::new());

        let commitments = dir.commitments_on(date(2025, 6, 9)).await.unwrap();
        assert_eq!(commitments.len(), 1);
        assert_eq!(commitments[0].date, "someday");
    }

    #[tokio::test]
    async fn last_shared_party_is_strictly_before_cutoff() {
        let dir = InMemoryDirectory::new();
        dir.add_party("2025-06-02", "a", ["b"]);
        dir.add_party("2025-06-05", "a", ["b"]);
        dir.add_party("2025-06-05", "a", ["c"]);

        let shared = dir
            .last_shared_party("a", "b", date(2025, 6, 5))
            .await
            .unwrap();
        assert_eq!(shared, Some(date(2025, 6, 2)));

        let none = dir
            .last_shared_party("b", "c", date(2025, 6, 30))
            .await
            .unwrap();
        assert_eq!(none, None);
    }

    #[tokio::test]
    async fn participation_counts_include_hosting() {
        let dir = InMemoryDirectory::new();
        dir.add_party("2025-06-02", "a", ["b"]);
        dir.add_party("2025-06-03", "b", ["c"]);

        assert_eq!(dir.participation_count("a").await.unwrap(), 1);
        assert_eq!(dir.participation_count("b").await.unwrap(), 2);
        assert_eq!(dir.participation_count("d").await.unwrap(), 0);
    }
}
