use crate::assembler::GroupAssembler;
use crate::availability::AvailabilityResolver;
use crate::matrix::MatrixBuilder;
use chrono::NaiveDate;
use lunchrec_cache::{CacheSnapshot, RecommendationStore};
use lunchrec_core::{
    seoul_today, workdays_in_window, CommitmentDirectory, EngineConfig, GroupMember,
    HistoryDirectory, LunchRecError, PreferenceStore, RecommendationEntry, Result, UserDirectory,
    UserId, UserProfile, ANONYMOUS_NAME,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// What a generation call did.
#[derive(Debug)]
pub enum GenerationOutcome {
    Generated(GenerationStats),
    /// The live snapshot was already built for today; the call was a no-op.
    AlreadyFresh,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub users: usize,
    pub dates: usize,
    pub entries: usize,
    pub elapsed_ms: u64,
}

/// The recommendation engine facade: wires the availability resolver, the
/// compatibility matrix builder and the group assembler to the external
/// directories, and publishes each finished run into the store.
///
/// `lookup` reads the last published snapshot and never blocks on a run in
/// progress; `trigger_generation` is idempotent per Asia/Seoul calendar day.
pub struct RecommendationEngine {
    users: Arc<dyn UserDirectory>,
    history: Arc<dyn HistoryDirectory>,
    preferences: Arc<dyn PreferenceStore>,
    resolver: AvailabilityResolver,
    matrix_builder: MatrixBuilder,
    assembler: GroupAssembler,
    store: Arc<RecommendationStore>,
    config: EngineConfig,
    run_guard: Mutex<()>,
}

impl RecommendationEngine {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        commitments: Arc<dyn CommitmentDirectory>,
        history: Arc<dyn HistoryDirectory>,
        preferences: Arc<dyn PreferenceStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            users,
            history,
            preferences,
            resolver: AvailabilityResolver::new(commitments),
            matrix_builder: MatrixBuilder::new(config.weights.clone()),
            assembler: GroupAssembler::new(config.clone()),
            store: Arc::new(RecommendationStore::new()),
            config,
            run_guard: Mutex::new(()),
        }
    }

    /// The store backing this engine, for embedders that want to expose
    /// lookups without holding the whole engine.
    pub fn store(&self) -> Arc<RecommendationStore> {
        Arc::clone(&self.store)
    }

    /// O(1) read of the last published run. Empty on miss; never triggers
    /// generation.
    pub fn lookup(&self, user: &str, date: NaiveDate) -> Vec<RecommendationEntry> {
        self.store.lookup(user, date)
    }

    /// Regenerate for the current Asia/Seoul day. Intended for the daily
    /// scheduler or manual invocation; concurrent calls for an already
    /// generated day are success no-ops.
    pub async fn trigger_generation(&self) -> Result<GenerationOutcome> {
        self.generate_for(seoul_today()).await
    }

    /// One full generation run anchored at `today`. Runs are serialized; the
    /// finished snapshot is published with a single atomic swap, so a failed
    /// run leaves the previous output live.
    pub async fn generate_for(&self, today: NaiveDate) -> Result<GenerationOutcome> {
        let _guard = self.run_guard.lock().await;

        if self.store.generated_for() == Some(today) {
            debug!(%today, "recommendation cache already generated; skipping");
            return Ok(GenerationOutcome::AlreadyFresh);
        }

        let started = Instant::now();
        let profiles = self.users.active_users().await?;
        info!(users = profiles.len(), %today, "starting recommendation generation");

        let mut participation = HashMap::with_capacity(profiles.len());
        for profile in &profiles {
            let count = self.history.participation_count(&profile.user_id).await?;
            participation.insert(profile.user_id.clone(), count);
        }
        let matrix = self.matrix_builder.build(&profiles, &participation);

        let by_id: HashMap<&str, &UserProfile> = profiles
            .iter()
            .map(|profile| (profile.user_id.as_str(), profile))
            .collect();
        let mut decorator = MemberDecorator::new(
            Arc::clone(&self.history),
            Arc::clone(&self.preferences),
        );

        let mut rng = StdRng::from_os_rng();
        let mut snapshot = CacheSnapshot::new(today);
        let mut entries_total = 0usize;

        let dates = workdays_in_window(today, self.config.window_days);
        for date in &dates {
            if let Some(deadline) = self.config.soft_deadline {
                let elapsed = started.elapsed();
                if elapsed > deadline {
                    return Err(LunchRecError::DeadlineExceeded { elapsed });
                }
            }

            let available = self.resolver.available_on(*date, &profiles).await?;
            if available.is_empty() {
                info!(%date, "no available users");
                continue;
            }

            for requester in &profiles {
                let ranked =
                    self.assembler
                        .rank(&requester.user_id, &available, &matrix, &mut rng);
                let groups = self.assembler.assemble(&ranked);
                if groups.is_empty() {
                    continue;
                }

                let mut entries = Vec::with_capacity(groups.len());
                for member_ids in groups {
                    let mut members = Vec::with_capacity(member_ids.len());
                    for member_id in member_ids {
                        members.push(
                            decorator
                                .decorate(&requester.user_id, &member_id, *date, &by_id)
                                .await?,
                        );
                    }
                    entries.push(RecommendationEntry {
                        requester: requester.user_id.clone(),
                        date: *date,
                        members,
                    });
                }
                entries_total += entries.len();
                snapshot.insert(requester.user_id.clone(), *date, entries);
            }
        }

        let stats = GenerationStats {
            users: profiles.len(),
            dates: dates.len(),
            entries: entries_total,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        self.store.publish(snapshot);
        info!(
            users = stats.users,
            dates = stats.dates,
            entries = stats.entries,
            elapsed_ms = stats.elapsed_ms,
            "recommendation generation complete"
        );
        Ok(GenerationOutcome::Generated(stats))
    }
}

/// Fills in the display fields of assembled members. Preference and shared
/// history lookups are memoized for the duration of one run; the same member
/// shows up in many groups.
struct MemberDecorator {
    history: Arc<dyn HistoryDirectory>,
    preferences: Arc<dyn PreferenceStore>,
    styles: HashMap<UserId, Option<String>>,
    shared: HashMap<(UserId, UserId, NaiveDate), Option<NaiveDate>>,
}

impl MemberDecorator {
    fn new(history: Arc<dyn HistoryDirectory>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            history,
            preferences,
            styles: HashMap::new(),
            shared: HashMap::new(),
        }
    }

    async fn decorate(
        &mut self,
        requester: &str,
        member: &str,
        date: NaiveDate,
        by_id: &HashMap<&str, &UserProfile>,
    ) -> Result<GroupMember> {
        let profile = by_id.get(member).copied();
        let display_name = profile
            .and_then(|p| p.nickname.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
        let cuisine_genre = profile.and_then(|p| p.primary_cuisine_genre().map(String::from));

        let lunch_style = match self.styles.get(member) {
            Some(cached) => cached.clone(),
            None => {
                let style = self.preferences.lunch_style(member).await?;
                self.styles.insert(member.to_string(), style.clone());
                style
            }
        };

        let key = shared_key(requester, member, date);
        let last_dined_together = match self.shared.get(&key) {
            Some(cached) => *cached,
            None => {
                let last = self.history.last_shared_party(requester, member, date).await?;
                self.shared.insert(key, last);
                last
            }
        };

        Ok(GroupMember {
            user_id: member.to_string(),
            display_name,
            cuisine_genre,
            lunch_style,
            last_dined_together,
        })
    }
}

fn shared_key(a: &str, b: &str, date: NaiveDate) -> (UserId, UserId, NaiveDate) {
    if a <= b {
        (a.to_string(), b.to_string(), date)
    } else {
        (b.to_string(), a.to_string(), date)
    }
}
