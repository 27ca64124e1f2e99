//! Read-only ranking queries.

use derive_getters::Getters;
use laurel_core::{LevelProgress, UserLevel};
use laurel_error::LaurelResult;
use laurel_interface::LevelStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Entries shown when no limit is given.
pub const DEFAULT_LEADERBOARD_SIZE: i64 = 10;

/// Everything the `level` view shows for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RankCard {
    /// Stored record
    record: UserLevel,
    /// 1-based rank in the guild
    rank: i64,
    /// Position inside the current level
    progress: LevelProgress,
}

/// Leaderboard and rank lookups over a [`LevelStore`].
#[derive(Clone)]
pub struct Leaderboard {
    store: Arc<dyn LevelStore>,
}

impl Leaderboard {
    /// Wrap a store.
    pub fn new(store: Arc<dyn LevelStore>) -> Self {
        Self { store }
    }

    /// Top `limit` members, highest experience first.
    #[instrument(skip(self))]
    pub async fn top(&self, guild_id: &str, limit: i64) -> LaurelResult<Vec<UserLevel>> {
        self.store.get_leaderboard(guild_id, limit).await
    }

    /// Rank of a member, `None` when they have no record.
    #[instrument(skip(self))]
    pub async fn rank(&self, guild_id: &str, user_id: &str) -> LaurelResult<Option<i64>> {
        self.store.get_user_rank(guild_id, user_id).await
    }

    /// Record, rank and progress of a member, `None` when they have no record.
    #[instrument(skip(self))]
    pub async fn rank_card(&self, guild_id: &str, user_id: &str) -> LaurelResult<Option<RankCard>> {
        let Some(record) = self.store.get_user_level(guild_id, user_id).await? else {
            return Ok(None);
        };
        let Some(rank) = self.store.get_user_rank(guild_id, user_id).await? else {
            return Ok(None);
        };
        let progress = LevelProgress::new(*record.level(), *record.xp());

        Ok(Some(RankCard {
            record,
            rank,
            progress,
        }))
    }
}
