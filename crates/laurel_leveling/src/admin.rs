//! Guild administration: reward roles, channels and experience tuning.

use laurel_core::{LevelReward, SettingsUpdate};
use laurel_error::{LaurelResult, ValidationError, ValidationErrorKind};
use laurel_interface::LevelStore;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, instrument};

/// Accepted base experience per message.
pub const XP_PER_MESSAGE_RANGE: RangeInclusive<i32> = 1..=100;

/// Accepted cooldown in seconds.
pub const XP_COOLDOWN_RANGE: RangeInclusive<i32> = 0..=600;

/// Lowest level a reward can be attached to.
pub const MIN_REWARD_LEVEL: i32 = 1;

#[track_caller]
fn check_range(field: &str, value: i32, range: &RangeInclusive<i32>) -> Result<(), ValidationError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new(ValidationErrorKind::OutOfRange {
        field: field.to_string(),
        min: i64::from(*range.start()),
        max: i64::from(*range.end()),
        value: i64::from(value),
    }))
}

/// Administrative writes to guild configuration.
///
/// Inputs are validated before the store is touched; a rejected call leaves
/// every setting as it was. Callers are responsible for checking that the
/// invoking member is an administrator.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn LevelStore>,
}

impl AdminService {
    /// Wrap a store.
    pub fn new(store: Arc<dyn LevelStore>) -> Self {
        Self { store }
    }

    /// Attach `role_id` to `level`, replacing any earlier reward for it.
    #[instrument(skip(self))]
    pub async fn set_reward(
        &self,
        guild_id: &str,
        level: i32,
        role_id: &str,
        role_name: &str,
    ) -> LaurelResult<()> {
        check_range("level", level, &(MIN_REWARD_LEVEL..=i32::MAX))?;
        self.store
            .add_or_replace_level_reward(guild_id, level, role_id, role_name)
            .await?;
        info!("Level reward set");
        Ok(())
    }

    /// Drop the reward for `level`; `false` when there was none.
    #[instrument(skip(self))]
    pub async fn remove_reward(&self, guild_id: &str, level: i32) -> LaurelResult<bool> {
        self.store.remove_level_reward(guild_id, level).await
    }

    /// Rewards of a guild, lowest level first.
    pub async fn list_rewards(&self, guild_id: &str) -> LaurelResult<Vec<LevelReward>> {
        self.store.get_all_level_rewards(guild_id).await
    }

    /// Route level-up notices to `channel_id`.
    #[instrument(skip(self))]
    pub async fn set_level_channel(&self, guild_id: &str, channel_id: &str) -> LaurelResult<()> {
        let update = SettingsUpdate {
            level_up_channel_id: Some(channel_id.to_string()),
            ..Default::default()
        };
        self.store.update_guild_settings(guild_id, &update).await
    }

    /// Set the base award and, optionally, the cooldown.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `xp_per_message` is outside
    /// [`XP_PER_MESSAGE_RANGE`] or `cooldown` is outside
    /// [`XP_COOLDOWN_RANGE`]. Nothing is written in that case.
    #[instrument(skip(self))]
    pub async fn set_xp(
        &self,
        guild_id: &str,
        xp_per_message: i32,
        cooldown: Option<i32>,
    ) -> LaurelResult<()> {
        check_range("xp_per_message", xp_per_message, &XP_PER_MESSAGE_RANGE)?;
        if let Some(cooldown) = cooldown {
            check_range("xp_cooldown", cooldown, &XP_COOLDOWN_RANGE)?;
        }

        let update = SettingsUpdate {
            xp_per_message: Some(xp_per_message),
            xp_cooldown: cooldown,
            ..Default::default()
        };
        self.store.update_guild_settings(guild_id, &update).await?;
        info!("Experience settings updated");
        Ok(())
    }

    /// Post join greetings in `channel_id`.
    #[instrument(skip(self))]
    pub async fn set_welcome_channel(&self, guild_id: &str, channel_id: &str) -> LaurelResult<()> {
        let update = SettingsUpdate {
            welcome_channel_id: Some(channel_id.to_string()),
            ..Default::default()
        };
        self.store.update_guild_settings(guild_id, &update).await
    }

    /// Point new members at `channel_id` for the rules.
    #[instrument(skip(self))]
    pub async fn set_rules_channel(&self, guild_id: &str, channel_id: &str) -> LaurelResult<()> {
        let update = SettingsUpdate {
            rules_channel_id: Some(channel_id.to_string()),
            ..Default::default()
        };
        self.store.update_guild_settings(guild_id, &update).await
    }

    /// Post leave notices in `channel_id`.
    #[instrument(skip(self))]
    pub async fn set_log_channel(&self, guild_id: &str, channel_id: &str) -> LaurelResult<()> {
        let update = SettingsUpdate {
            log_channel_id: Some(channel_id.to_string()),
            ..Default::default()
        };
        self.store.update_guild_settings(guild_id, &update).await
    }

    /// Replace the greeting template.
    #[instrument(skip(self, template))]
    pub async fn set_welcome_message(&self, guild_id: &str, template: &str) -> LaurelResult<()> {
        let update = SettingsUpdate {
            welcome_message: Some(template.to_string()),
            ..Default::default()
        };
        self.store.update_guild_settings(guild_id, &update).await
    }
}
