//! Service wiring and background tasks.

use crate::{CooldownSettings, create_router};
use chrono::Utc;
use laurel_database::SqliteLevelStore;
use laurel_interface::{ActionSink, LevelStore};
use laurel_error::LaurelResult;
use laurel_leveling::{AccrualEngine, CooldownTracker, MembershipService};
use laurel_social::CommandRouter;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Open the store at `database_url` and run pending migrations.
///
/// # Errors
///
/// Returns a database error if the file cannot be opened or migrated.
pub fn open_store(database_url: &str) -> LaurelResult<Arc<dyn LevelStore>> {
    let store = SqliteLevelStore::open(database_url)?;
    Ok(Arc::new(store))
}

/// The leveling services sharing one store and one sink.
#[derive(Clone)]
pub struct Services {
    /// Durable leveling state
    pub store: Arc<dyn LevelStore>,
    /// Message accrual
    pub engine: Arc<AccrualEngine>,
    /// Join and leave handling
    pub membership: MembershipService,
    /// Chat commands
    pub router: CommandRouter,
}

impl Services {
    /// Wire the services over `store` and `sink`.
    pub fn new(
        store: Arc<dyn LevelStore>,
        sink: Arc<dyn ActionSink>,
        cooldowns: Arc<CooldownTracker>,
        prefix: &str,
    ) -> Self {
        let engine = AccrualEngine::new(Arc::clone(&store), Arc::clone(&sink))
            .with_cooldowns(cooldowns);
        Self {
            engine: Arc::new(engine),
            membership: MembershipService::new(Arc::clone(&store), sink),
            router: CommandRouter::new(Arc::clone(&store), prefix),
            store,
        }
    }
}

/// Periodically drop cooldown entries older than the configured age.
///
/// The first pass runs one interval after spawning.
pub fn spawn_cooldown_pruner(
    cooldowns: Arc<CooldownTracker>,
    settings: &CooldownSettings,
) -> JoinHandle<()> {
    let period = settings.prune_interval();
    let max_age = settings.max_age();
    info!(?period, max_age_seconds = settings.max_age_seconds, "Starting cooldown pruner");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cooldowns.prune(max_age, Utc::now());
            debug!(removed, remaining = cooldowns.len(), "Pruned cooldown entries");
        }
    })
}

/// Serve the health router on `host:port` until the listener fails.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound.
#[instrument]
pub async fn serve_health(host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!(address = %listener.local_addr()?, "Health endpoint listening");
    axum::serve(listener, create_router()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn pruner_drops_stale_entries() {
        let cooldowns = Arc::new(CooldownTracker::new());
        let stale = Utc::now() - Duration::hours(2);
        assert!(cooldowns.try_consume("g", "old", 60, stale));
        assert!(cooldowns.try_consume("g", "new", 60, Utc::now()));

        let settings = CooldownSettings {
            prune_interval_seconds: 1,
            max_age_seconds: 3600,
        };
        let handle = spawn_cooldown_pruner(Arc::clone(&cooldowns), &settings);

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        handle.abort();

        assert_eq!(cooldowns.len(), 1);
    }
}
