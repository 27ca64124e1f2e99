//! SQLite implementation of [`LevelStore`].

use crate::connection::{establish_connection, run_migrations};
use crate::models::{
    GuildSettingsChangeset, GuildSettingsRow, LevelRewardRow, NewLevelRewardRow, NewUserLevelRow,
    NewWelcomeLogRow, UserLevelRow,
};
use crate::schema::{guild_settings, level_rewards, user_levels, welcome_logs};
use crate::DatabaseResult;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use laurel_core::{
    ExperienceGain, GuildSettings, LevelReward, SettingsUpdate, UserLevel, level_for,
};
use laurel_error::{DatabaseError, LaurelResult};
use laurel_interface::LevelStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Leveling state kept in a SQLite database through Diesel.
///
/// Every operation runs on one connection behind an async mutex, and each
/// read-modify-write runs inside a transaction, so awards to the same member
/// are serialized and never lose an update.
///
/// # Example
/// ```no_run
/// use laurel_database::SqliteLevelStore;
/// use laurel_interface::LevelStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteLevelStore::open("data/laurel.db")?;
///     let gain = store.add_experience("guild", "user", "Ada", 20).await?;
///     println!("level {} with {} xp", gain.level, gain.xp);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SqliteLevelStore {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl SqliteLevelStore {
    /// Wrap an open connection. Migrations are not run.
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open `database_url` and bring its schema up to date.
    pub fn open(database_url: &str) -> DatabaseResult<Self> {
        let mut conn = establish_connection(database_url)?;
        run_migrations(&mut conn)?;
        info!(database_url, "Level store ready");
        Ok(Self::new(conn))
    }

    /// A fresh, migrated in-memory store.
    pub fn in_memory() -> DatabaseResult<Self> {
        Self::open(":memory:")
    }

    /// Number of joins logged for a guild.
    #[instrument(skip(self))]
    pub async fn welcome_log_count(&self, guild_id: &str) -> DatabaseResult<i64> {
        let mut conn = self.conn.lock().await;

        welcome_logs::table
            .filter(welcome_logs::guild_id.eq(guild_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }
}

fn ensure_settings(conn: &mut SqliteConnection, guild_id: &str) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(guild_settings::table)
        .values(guild_settings::guild_id.eq(guild_id))
        .execute(conn)
}

#[async_trait]
impl LevelStore for SqliteLevelStore {
    #[instrument(skip(self))]
    async fn get_user_level(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> LaurelResult<Option<UserLevel>> {
        let mut conn = self.conn.lock().await;

        let row = user_levels::table
            .filter(user_levels::guild_id.eq(guild_id))
            .filter(user_levels::user_id.eq(user_id))
            .select(UserLevelRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(row.map(UserLevel::from))
    }

    #[instrument(skip(self, username))]
    async fn add_experience(
        &self,
        guild_id: &str,
        user_id: &str,
        username: &str,
        amount: i64,
    ) -> LaurelResult<ExperienceGain> {
        let mut conn = self.conn.lock().await;
        let now = Utc::now().naive_utc();

        let gain = conn.immediate_transaction::<_, DatabaseError, _>(|conn| {
            let current: Option<(i64, i32)> = user_levels::table
                .filter(user_levels::guild_id.eq(guild_id))
                .filter(user_levels::user_id.eq(user_id))
                .select((user_levels::xp, user_levels::level))
                .first(conn)
                .optional()?;

            let Some((xp, old_level)) = current else {
                let level = level_for(amount);
                diesel::insert_into(user_levels::table)
                    .values(&NewUserLevelRow {
                        guild_id,
                        user_id,
                        username,
                        xp: amount,
                        level,
                        total_messages: 1,
                        last_xp_time: Some(now),
                    })
                    .execute(conn)?;
                return Ok(ExperienceGain::new(level, amount, level > 1));
            };

            let new_xp = xp + amount;
            let new_level = level_for(new_xp);
            diesel::update(
                user_levels::table
                    .filter(user_levels::guild_id.eq(guild_id))
                    .filter(user_levels::user_id.eq(user_id)),
            )
            .set((
                user_levels::xp.eq(new_xp),
                user_levels::level.eq(new_level),
                user_levels::username.eq(username),
                user_levels::total_messages.eq(user_levels::total_messages + 1),
                user_levels::last_xp_time.eq(Some(now)),
            ))
            .execute(conn)?;

            Ok(ExperienceGain::new(new_level, new_xp, new_level > old_level))
        })?;

        debug!(
            level = gain.level,
            xp = gain.xp,
            leveled_up = gain.leveled_up,
            "Experience added"
        );
        Ok(gain)
    }

    #[instrument(skip(self))]
    async fn get_leaderboard(&self, guild_id: &str, limit: i64) -> LaurelResult<Vec<UserLevel>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.lock().await;

        let rows = user_levels::table
            .filter(user_levels::guild_id.eq(guild_id))
            .order((user_levels::xp.desc(), user_levels::id.asc()))
            .limit(limit)
            .select(UserLevelRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(UserLevel::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_user_rank(&self, guild_id: &str, user_id: &str) -> LaurelResult<Option<i64>> {
        let mut conn = self.conn.lock().await;

        let rank = conn.transaction::<_, DatabaseError, _>(|conn| {
            let xp: Option<i64> = user_levels::table
                .filter(user_levels::guild_id.eq(guild_id))
                .filter(user_levels::user_id.eq(user_id))
                .select(user_levels::xp)
                .first(conn)
                .optional()?;
            let Some(xp) = xp else {
                return Ok(None);
            };

            let ahead: i64 = user_levels::table
                .filter(user_levels::guild_id.eq(guild_id))
                .filter(user_levels::xp.gt(xp))
                .count()
                .get_result(conn)?;
            Ok(Some(ahead + 1))
        })?;

        Ok(rank)
    }

    #[instrument(skip(self))]
    async fn get_guild_settings(&self, guild_id: &str) -> LaurelResult<GuildSettings> {
        let mut conn = self.conn.lock().await;

        let row = conn.transaction::<_, DatabaseError, _>(|conn| {
            if ensure_settings(conn, guild_id)? > 0 {
                debug!("Created default guild settings");
            }
            let row = guild_settings::table
                .find(guild_id)
                .select(GuildSettingsRow::as_select())
                .first(conn)?;
            Ok(row)
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, update), fields(fields = update.field_count()))]
    async fn update_guild_settings(
        &self,
        guild_id: &str,
        update: &SettingsUpdate,
    ) -> LaurelResult<()> {
        let changeset = GuildSettingsChangeset::from(update);
        let mut conn = self.conn.lock().await;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            ensure_settings(conn, guild_id)?;
            // Diesel rejects an empty SET clause
            if !update.is_empty() {
                diesel::update(guild_settings::table.find(guild_id))
                    .set(&changeset)
                    .execute(conn)?;
            }
            Ok(())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_or_replace_level_reward(
        &self,
        guild_id: &str,
        level: i32,
        role_id: &str,
        role_name: &str,
    ) -> LaurelResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(level_rewards::table)
            .values(&NewLevelRewardRow {
                guild_id,
                level,
                role_id,
                role_name,
            })
            .on_conflict((level_rewards::guild_id, level_rewards::level))
            .do_update()
            .set((
                level_rewards::role_id.eq(role_id),
                level_rewards::role_name.eq(role_name),
            ))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_level_reward(
        &self,
        guild_id: &str,
        level: i32,
    ) -> LaurelResult<Option<LevelReward>> {
        let mut conn = self.conn.lock().await;

        let row = level_rewards::table
            .filter(level_rewards::guild_id.eq(guild_id))
            .filter(level_rewards::level.eq(level))
            .select(LevelRewardRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(row.map(LevelReward::from))
    }

    #[instrument(skip(self))]
    async fn get_all_level_rewards(&self, guild_id: &str) -> LaurelResult<Vec<LevelReward>> {
        let mut conn = self.conn.lock().await;

        let rows = level_rewards::table
            .filter(level_rewards::guild_id.eq(guild_id))
            .order(level_rewards::level.asc())
            .select(LevelRewardRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(LevelReward::from).collect())
    }

    #[instrument(skip(self))]
    async fn remove_level_reward(&self, guild_id: &str, level: i32) -> LaurelResult<bool> {
        let mut conn = self.conn.lock().await;

        let deleted = diesel::delete(
            level_rewards::table
                .filter(level_rewards::guild_id.eq(guild_id))
                .filter(level_rewards::level.eq(level)),
        )
        .execute(&mut *conn)
        .map_err(DatabaseError::from)?;

        Ok(deleted > 0)
    }

    #[instrument(skip(self, username))]
    async fn log_welcome(&self, guild_id: &str, user_id: &str, username: &str) -> LaurelResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(welcome_logs::table)
            .values(&NewWelcomeLogRow {
                guild_id,
                user_id,
                username,
            })
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }
}
