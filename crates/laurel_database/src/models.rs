//! Row types for the leveling tables.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use laurel_core::{GuildSettings, LevelReward, SettingsUpdate, UserLevel};

use crate::schema::{guild_settings, level_rewards, user_levels, welcome_logs};

/// A stored `user_levels` row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = user_levels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserLevelRow {
    pub id: i32,
    pub guild_id: String,
    pub user_id: String,
    pub username: String,
    pub xp: i64,
    pub level: i32,
    pub total_messages: i64,
    pub last_xp_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// First award of a member in a guild.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_levels)]
pub struct NewUserLevelRow<'a> {
    pub guild_id: &'a str,
    pub user_id: &'a str,
    pub username: &'a str,
    pub xp: i64,
    pub level: i32,
    pub total_messages: i64,
    pub last_xp_time: Option<NaiveDateTime>,
}

/// A stored `guild_settings` row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = guild_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GuildSettingsRow {
    pub guild_id: String,
    pub welcome_channel_id: Option<String>,
    pub welcome_message: Option<String>,
    pub rules_channel_id: Option<String>,
    pub log_channel_id: Option<String>,
    pub level_up_channel_id: Option<String>,
    pub xp_per_message: i32,
    pub xp_cooldown: i32,
}

/// Allow-listed settings columns; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = guild_settings)]
pub struct GuildSettingsChangeset {
    pub welcome_channel_id: Option<String>,
    pub welcome_message: Option<String>,
    pub rules_channel_id: Option<String>,
    pub log_channel_id: Option<String>,
    pub level_up_channel_id: Option<String>,
    pub xp_per_message: Option<i32>,
    pub xp_cooldown: Option<i32>,
}

/// A stored `level_rewards` row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = level_rewards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LevelRewardRow {
    pub id: i32,
    pub guild_id: String,
    pub level: i32,
    pub role_id: String,
    pub role_name: String,
}

/// Insertable reward mapping.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = level_rewards)]
pub struct NewLevelRewardRow<'a> {
    pub guild_id: &'a str,
    pub level: i32,
    pub role_id: &'a str,
    pub role_name: &'a str,
}

/// Insertable join record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = welcome_logs)]
pub struct NewWelcomeLogRow<'a> {
    pub guild_id: &'a str,
    pub user_id: &'a str,
    pub username: &'a str,
}

impl From<UserLevelRow> for UserLevel {
    fn from(row: UserLevelRow) -> Self {
        UserLevel::new(
            row.guild_id,
            row.user_id,
            row.username,
            row.xp,
            row.level,
            row.total_messages,
            row.last_xp_time,
        )
    }
}

impl From<GuildSettingsRow> for GuildSettings {
    fn from(row: GuildSettingsRow) -> Self {
        GuildSettings {
            guild_id: row.guild_id,
            welcome_channel_id: row.welcome_channel_id,
            welcome_message: row.welcome_message,
            rules_channel_id: row.rules_channel_id,
            log_channel_id: row.log_channel_id,
            level_up_channel_id: row.level_up_channel_id,
            xp_per_message: row.xp_per_message,
            xp_cooldown: row.xp_cooldown,
        }
    }
}

impl From<&SettingsUpdate> for GuildSettingsChangeset {
    fn from(update: &SettingsUpdate) -> Self {
        GuildSettingsChangeset {
            welcome_channel_id: update.welcome_channel_id.clone(),
            welcome_message: update.welcome_message.clone(),
            rules_channel_id: update.rules_channel_id.clone(),
            log_channel_id: update.log_channel_id.clone(),
            level_up_channel_id: update.level_up_channel_id.clone(),
            xp_per_message: update.xp_per_message,
            xp_cooldown: update.xp_cooldown,
        }
    }
}

impl From<LevelRewardRow> for LevelReward {
    fn from(row: LevelRewardRow) -> Self {
        LevelReward::new(row.guild_id, row.level, row.role_id, row.role_name)
    }
}
