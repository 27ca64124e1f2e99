//! Store and front-end traits.

use async_trait::async_trait;
use laurel_core::{ExperienceGain, GuildSettings, LevelReward, Notification, SettingsUpdate, UserLevel};
use laurel_error::{DispatchError, LaurelResult};

/// Durable leveling state.
///
/// Absent rows are reported as `None` or an empty list, never as errors.
/// Errors mean the storage layer itself failed.
///
/// Implementations must make [`LevelStore::add_experience`] atomic per
/// `(guild_id, user_id)`: concurrent awards to the same member never lose an
/// update.
#[async_trait]
pub trait LevelStore: Send + Sync {
    /// Record of a member in a guild.
    async fn get_user_level(&self, guild_id: &str, user_id: &str)
    -> LaurelResult<Option<UserLevel>>;

    /// Add `amount` experience, recompute the level and bump the message count.
    ///
    /// A member without a record starts at 0 xp and level 1, so a first
    /// award that crosses a threshold still reports a level-up.
    async fn add_experience(
        &self,
        guild_id: &str,
        user_id: &str,
        username: &str,
        amount: i64,
    ) -> LaurelResult<ExperienceGain>;

    /// Top `limit` members by experience, ties in insertion order.
    async fn get_leaderboard(&self, guild_id: &str, limit: i64) -> LaurelResult<Vec<UserLevel>>;

    /// 1-based rank: one more than the number of members with strictly more
    /// experience. Members with equal experience share a rank.
    async fn get_user_rank(&self, guild_id: &str, user_id: &str) -> LaurelResult<Option<i64>>;

    /// Settings of a guild, created with defaults on first access.
    async fn get_guild_settings(&self, guild_id: &str) -> LaurelResult<GuildSettings>;

    /// Apply a partial settings update.
    async fn update_guild_settings(
        &self,
        guild_id: &str,
        update: &SettingsUpdate,
    ) -> LaurelResult<()>;

    /// Create or overwrite the reward for `level`.
    async fn add_or_replace_level_reward(
        &self,
        guild_id: &str,
        level: i32,
        role_id: &str,
        role_name: &str,
    ) -> LaurelResult<()>;

    /// Reward configured for exactly `level`.
    async fn get_level_reward(&self, guild_id: &str, level: i32)
    -> LaurelResult<Option<LevelReward>>;

    /// All rewards of a guild in ascending level order.
    async fn get_all_level_rewards(&self, guild_id: &str) -> LaurelResult<Vec<LevelReward>>;

    /// Delete the reward for `level`; `true` when one existed.
    async fn remove_level_reward(&self, guild_id: &str, level: i32) -> LaurelResult<bool>;

    /// Append a join to the welcome log.
    async fn log_welcome(&self, guild_id: &str, user_id: &str, username: &str)
    -> LaurelResult<()>;
}

/// Outbound actions carried out by the chat front-end.
///
/// Callers treat every method as fire-and-forget: a failure is logged where it
/// happens and never alters stored state.
#[async_trait]
pub trait ActionSink: Send + Sync {
    /// Post a notification to a guild channel.
    async fn send_notification(
        &self,
        channel_id: &str,
        notification: &Notification,
    ) -> Result<(), DispatchError>;

    /// Give a member a role.
    async fn grant_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DispatchError>;

    /// Send a direct message to a user.
    async fn send_direct(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> Result<(), DispatchError>;
}
