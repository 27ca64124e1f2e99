//! Per-guild configuration and the allow-listed partial update.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use tracing::debug;

/// Base experience per qualifying message for a new guild.
pub const DEFAULT_XP_PER_MESSAGE: i32 = 15;

/// Seconds between experience awards for a new guild.
pub const DEFAULT_XP_COOLDOWN: i32 = 60;

/// Settings row of one guild.
///
/// Channel ids left unset mean "use the fallback" for that feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Guild the settings belong to
    pub guild_id: String,
    /// Channel for join greetings
    pub welcome_channel_id: Option<String>,
    /// Greeting template; the built-in one is used when unset
    pub welcome_message: Option<String>,
    /// Channel new members are pointed to by DM
    pub rules_channel_id: Option<String>,
    /// Channel for leave notices
    pub log_channel_id: Option<String>,
    /// Channel for level-up notices; the message's own channel when unset
    pub level_up_channel_id: Option<String>,
    /// Lower bound of the per-message award
    pub xp_per_message: i32,
    /// Seconds between awards for one member
    pub xp_cooldown: i32,
}

impl GuildSettings {
    /// Settings a guild starts with.
    ///
    /// # Examples
    ///
    /// ```
    /// use laurel_core::GuildSettings;
    ///
    /// let settings = GuildSettings::with_defaults("42");
    /// assert_eq!(settings.xp_per_message, 15);
    /// assert_eq!(settings.xp_cooldown, 60);
    /// assert!(settings.level_up_channel_id.is_none());
    /// ```
    pub fn with_defaults(guild_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            welcome_channel_id: None,
            welcome_message: None,
            rules_channel_id: None,
            log_channel_id: None,
            level_up_channel_id: None,
            xp_per_message: DEFAULT_XP_PER_MESSAGE,
            xp_cooldown: DEFAULT_XP_COOLDOWN,
        }
    }
}

/// Settings columns that may be updated. Nothing else is ever written.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum SettingField {
    /// `welcome_channel_id`
    WelcomeChannelId,
    /// `welcome_message`
    WelcomeMessage,
    /// `rules_channel_id`
    RulesChannelId,
    /// `log_channel_id`
    LogChannelId,
    /// `level_up_channel_id`
    LevelUpChannelId,
    /// `xp_per_message`
    XpPerMessage,
    /// `xp_cooldown`
    XpCooldown,
}

/// Partial settings update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// New welcome channel
    pub welcome_channel_id: Option<String>,
    /// New greeting template
    pub welcome_message: Option<String>,
    /// New rules channel
    pub rules_channel_id: Option<String>,
    /// New log channel
    pub log_channel_id: Option<String>,
    /// New level-up channel
    pub level_up_channel_id: Option<String>,
    /// New base award
    pub xp_per_message: Option<i32>,
    /// New cooldown seconds
    pub xp_cooldown: Option<i32>,
}

impl SettingsUpdate {
    /// Build an update from loosely typed `name -> value` pairs.
    ///
    /// Names outside [`SettingField`] are dropped silently, as are values that
    /// do not fit their column (e.g. text for `xp_cooldown`).
    ///
    /// # Examples
    ///
    /// ```
    /// use laurel_core::SettingsUpdate;
    /// use serde_json::json;
    ///
    /// let update = SettingsUpdate::from_fields([
    ///     ("xp_per_message", json!(20)),
    ///     ("bogus_field", json!("x")),
    /// ]);
    /// assert_eq!(update.xp_per_message, Some(20));
    /// assert_eq!(update.field_count(), 1);
    /// ```
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, JsonValue)>,
    {
        let mut update = Self::default();
        for (name, value) in fields {
            let Ok(field) = SettingField::from_str(name) else {
                debug!(field = name, "Ignoring unknown settings field");
                continue;
            };
            if !update.apply(field, &value) {
                debug!(field = name, ?value, "Ignoring settings value of wrong type");
            }
        }
        update
    }

    fn apply(&mut self, field: SettingField, value: &JsonValue) -> bool {
        let applied = match field {
            SettingField::XpPerMessage => json_int(value).map(|v| self.xp_per_message = Some(v)),
            SettingField::XpCooldown => json_int(value).map(|v| self.xp_cooldown = Some(v)),
            SettingField::WelcomeChannelId => {
                json_text(value).map(|v| self.welcome_channel_id = Some(v))
            }
            SettingField::WelcomeMessage => json_text(value).map(|v| self.welcome_message = Some(v)),
            SettingField::RulesChannelId => {
                json_text(value).map(|v| self.rules_channel_id = Some(v))
            }
            SettingField::LogChannelId => json_text(value).map(|v| self.log_channel_id = Some(v)),
            SettingField::LevelUpChannelId => {
                json_text(value).map(|v| self.level_up_channel_id = Some(v))
            }
        };
        applied.is_some()
    }

    /// Number of columns this update writes.
    pub fn field_count(&self) -> usize {
        [
            self.welcome_channel_id.is_some(),
            self.welcome_message.is_some(),
            self.rules_channel_id.is_some(),
            self.log_channel_id.is_some(),
            self.level_up_channel_id.is_some(),
            self.xp_per_message.is_some(),
            self.xp_cooldown.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// True when the update writes nothing.
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

fn json_int(value: &JsonValue) -> Option<i32> {
    match value {
        JsonValue::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Snowflakes may arrive as numbers
fn json_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
