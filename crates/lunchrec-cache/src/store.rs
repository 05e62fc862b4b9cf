use arc_swap::ArcSwap;
use chrono::NaiveDate;
use lunchrec_core::{RecommendationEntry, UserId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// The complete output of one generation run: every (user, date) key the run
/// produced, plus the Asia/Seoul date it was built for. Snapshots are built
/// off to the side and never mutated after publication.
#[derive(Debug, Default)]
pub struct CacheSnapshot {
    generated_for: Option<NaiveDate>,
    entries: HashMap<(UserId, NaiveDate), Vec<RecommendationEntry>>,
}

impl CacheSnapshot {
    pub fn new(generated_for: NaiveDate) -> Self {
        Self {
            generated_for: Some(generated_for),
            entries: HashMap::new(),
        }
    }

    /// Replaces any previous list for the key; keys are written once per run.
    pub fn insert(
        &mut self,
        user: impl Into<UserId>,
        date: NaiveDate,
        entries: Vec<RecommendationEntry>,
    ) {
        self.entries.insert((user.into(), date), entries);
    }

    pub fn generated_for(&self) -> Option<NaiveDate> {
        self.generated_for
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-side statistics, sampled at call time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub keys: usize,
    pub generated_for: Option<NaiveDate>,
}

/// Key-value store mapping (user, date) to the ranked recommendation list.
///
/// Reads go against whatever snapshot is currently published; a generation
/// run swaps in its finished snapshot with a single reference store, so
/// readers never observe a half-populated cache and are never blocked by a
/// writer.
pub struct RecommendationStore {
    current: ArcSwap<CacheSnapshot>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecommendationStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(CacheSnapshot::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// O(1) read. A miss returns an empty list and never triggers
    /// generation; the caller re-requests after the next run.
    pub fn lookup(&self, user: &str, date: NaiveDate) -> Vec<RecommendationEntry> {
        let snapshot = self.current.load();
        match snapshot.entries.get(&(user.to_string(), date)) {
            Some(entries) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                entries.clone()
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Vec::new()
            }
        }
    }

    /// The Seoul date of the last published run, used as the regeneration
    /// guard marker.
    pub fn generated_for(&self) -> Option<NaiveDate> {
        self.current.load().generated_for
    }

    /// Atomically replace the live snapshot. The previous run's output is
    /// fully superseded, including keys the new run did not produce.
    pub fn publish(&self, snapshot: CacheSnapshot) {
        debug!(
            keys = snapshot.len(),
            generated_for = ?snapshot.generated_for,
            "publishing recommendation snapshot"
        );
        self.current.store(Arc::new(snapshot));
    }

    /// Drop all entries and the generation marker.
    pub fn clear(&self) {
        self.current.store(Arc::new(CacheSnapshot::default()));
    }

    pub fn stats(&self) -> StoreStats {
        let snapshot = self.current.load();
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys: snapshot.len(),
            generated_for: snapshot.generated_for,
        }
    }
}

impl Default for RecommendationStore {
    fn default() -> Self {
        Self::new()
    }
}
