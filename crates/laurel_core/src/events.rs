//! Events exchanged with the chat front-end.

use serde::{Deserialize, Serialize};

/// A chat message as seen by the leveling core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceived {
    /// Guild the message was posted in; `None` for direct messages
    pub guild_id: Option<String>,
    /// Author id
    pub user_id: String,
    /// Author name as shown in the guild
    pub display_name: String,
    /// Channel the message was posted in
    pub channel_id: String,
    /// Whether the author is a bot account
    pub is_bot: bool,
    /// Roles the author currently holds
    pub role_ids: Vec<String>,
}

impl MessageReceived {
    /// Guild the message counts toward, if it can earn experience at all.
    ///
    /// Bot authors and direct messages never qualify.
    ///
    /// # Examples
    ///
    /// ```
    /// use laurel_core::MessageReceived;
    ///
    /// let mut msg = MessageReceived {
    ///     guild_id: Some("g".into()),
    ///     user_id: "u".into(),
    ///     display_name: "Ada".into(),
    ///     channel_id: "c".into(),
    ///     is_bot: false,
    ///     role_ids: vec![],
    /// };
    /// assert_eq!(msg.qualifying_guild(), Some("g"));
    ///
    /// msg.is_bot = true;
    /// assert_eq!(msg.qualifying_guild(), None);
    /// ```
    pub fn qualifying_guild(&self) -> Option<&str> {
        if self.is_bot {
            return None;
        }
        self.guild_id.as_deref()
    }

    /// Whether the author already holds `role_id`.
    pub fn has_role(&self, role_id: &str) -> bool {
        self.role_ids.iter().any(|r| r == role_id)
    }
}

/// A member joined a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberJoined {
    /// Guild joined
    pub guild_id: String,
    /// Guild name, for templates
    pub guild_name: String,
    /// New member id
    pub user_id: String,
    /// Account name
    pub username: String,
    /// Name shown in the guild
    pub display_name: String,
    /// Member count including the newcomer, when the front-end knows it
    pub member_count: Option<u64>,
    /// Whether the member is a bot account
    pub is_bot: bool,
}

/// A member left a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLeft {
    /// Guild left
    pub guild_id: String,
    /// Departed member id
    pub user_id: String,
    /// Account name
    pub username: String,
    /// Name shown in the guild
    pub display_name: String,
    /// Remaining member count, when the front-end knows it
    pub member_count: Option<u64>,
    /// Whether the member is a bot account
    pub is_bot: bool,
}

/// Payload of an outbound message. Rendering is up to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// A member reached a new level.
    LevelUp {
        /// Member who leveled up
        user_id: String,
        /// Level reached
        level: i32,
        /// Experience needed for the level after
        next_level_xp: i64,
    },
    /// A level reward role was granted.
    RoleGranted {
        /// Member who received the role
        user_id: String,
        /// Level that earned it
        level: i32,
        /// Role granted
        role_id: String,
        /// Cached role name
        role_name: String,
    },
    /// Rendered greeting for a new member.
    Welcome {
        /// New member
        user_id: String,
        /// Greeting text after template substitution
        text: String,
        /// Member count including the newcomer, when known
        member_count: Option<u64>,
    },
    /// Direct message pointing a new member at the rules.
    RulesReminder {
        /// Guild joined
        guild_name: String,
        /// Account name of the new member
        username: String,
        /// Rules channel to mention
        rules_channel_id: String,
    },
    /// Notice that a member left.
    MemberLeft {
        /// Departed member
        user_id: String,
        /// Name shown in the guild
        display_name: String,
        /// Account name
        username: String,
        /// Remaining member count, when known
        member_count: Option<u64>,
    },
}
