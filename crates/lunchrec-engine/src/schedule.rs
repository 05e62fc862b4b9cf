use crate::generation::RecommendationEngine;
use chrono::Utc;
use lunchrec_core::until_next_seoul_midnight;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawns the daily regeneration loop: sleep until the next Asia/Seoul
/// midnight, regenerate, repeat. Generation is idempotent per day, so an
/// extra manual trigger in between is harmless.
///
/// Abort the returned handle to stop the loop.
pub fn spawn_daily(engine: Arc<RecommendationEngine>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_seoul_midnight(Utc::now());
            debug!(?wait, "sleeping until next Seoul midnight");
            tokio::time::sleep(wait).await;
            if let Err(err) = engine.trigger_generation().await {
                warn!(error = %err, "scheduled generation failed");
            }
        }
    })
}
