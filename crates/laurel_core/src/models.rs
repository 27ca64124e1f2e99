//! Persisted leveling records.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One member's standing in one guild.
///
/// `level` always equals [`crate::level_for`] of `xp`; the store recomputes
/// it on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UserLevel {
    /// Guild the record belongs to
    guild_id: String,
    /// Member the record belongs to
    user_id: String,
    /// Display name captured at the last award
    username: String,
    /// Accumulated experience
    xp: i64,
    /// Level derived from `xp`
    level: i32,
    /// Number of messages that earned experience
    total_messages: i64,
    /// When experience was last awarded (UTC)
    last_xp_time: Option<NaiveDateTime>,
}

impl UserLevel {
    /// Assemble a record from its stored columns.
    pub fn new(
        guild_id: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
        xp: i64,
        level: i32,
        total_messages: i64,
        last_xp_time: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            username: username.into(),
            xp,
            level,
            total_messages,
            last_xp_time,
        }
    }
}

/// Result of adding experience to a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceGain {
    /// Level after the award
    pub level: i32,
    /// Experience after the award
    pub xp: i64,
    /// Whether the award moved the member to a higher level
    pub leveled_up: bool,
}

impl ExperienceGain {
    /// Create a gain result.
    pub fn new(level: i32, xp: i64, leveled_up: bool) -> Self {
        Self {
            level,
            xp,
            leveled_up,
        }
    }
}

/// Role handed out when a member reaches a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LevelReward {
    /// Guild the reward belongs to
    guild_id: String,
    /// Level that triggers the reward
    level: i32,
    /// Role granted
    role_id: String,
    /// Role name cached for listings; the role id is authoritative
    role_name: String,
}

impl LevelReward {
    /// Create a reward mapping.
    pub fn new(
        guild_id: impl Into<String>,
        level: i32,
        role_id: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            level,
            role_id: role_id.into(),
            role_name: role_name.into(),
        }
    }
}
