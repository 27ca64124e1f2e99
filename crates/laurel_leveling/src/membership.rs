//! Join greetings, rules reminders and leave notices.

use laurel_core::{MemberJoined, MemberLeft, Notification};
use laurel_error::LaurelResult;
use laurel_interface::{ActionSink, LevelStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Greeting used when a guild has not set its own.
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "🎉 Welcome {user} to **{server}**! You are member #{member_count}!";

/// Fill a greeting template for a new member.
///
/// Recognized placeholders are `{user}` (a mention), `{username}` (the name
/// shown in the guild), `{server}` and `{member_count}`. Anything else is
/// left as written, and so is `{member_count}` when the count is unknown.
/// Member-supplied text is inserted verbatim, never treated as a template.
///
/// # Examples
///
/// ```
/// use laurel_core::MemberJoined;
/// use laurel_leveling::render_welcome;
///
/// let joined = MemberJoined {
///     guild_id: "1".into(),
///     guild_name: "Rustaceans".into(),
///     user_id: "42".into(),
///     username: "ferris".into(),
///     display_name: "Ferris".into(),
///     member_count: Some(7),
///     is_bot: false,
/// };
/// assert_eq!(
///     render_welcome("Hi {username}, {user}! #{member_count} in {server}", &joined),
///     "Hi Ferris, <@42>! #7 in Rustaceans"
/// );
/// ```
pub fn render_welcome(template: &str, joined: &MemberJoined) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    // Substituted values are never scanned again.
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let token = tail.find('}').map(|close| &tail[..=close]);
        match token.and_then(|t| placeholder_value(t, joined).map(|v| (t.len(), v))) {
            Some((consumed, value)) => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Value for a `{name}` token; `None` leaves the token as written.
fn placeholder_value(token: &str, joined: &MemberJoined) -> Option<String> {
    match token {
        "{user}" => Some(format!("<@{}>", joined.user_id)),
        "{username}" => Some(joined.display_name.clone()),
        "{server}" => Some(joined.guild_name.clone()),
        "{member_count}" => joined.member_count.map(|count| count.to_string()),
        _ => None,
    }
}

/// What a join produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinOutcome {
    /// Bot accounts are not greeted.
    Ignored,
    /// The join was logged.
    Welcomed {
        /// Channel a greeting was sent to
        greeting_channel: Option<String>,
        /// Whether the rules reminder reached the member
        rules_reminder_sent: bool,
    },
}

/// Handles members joining and leaving a guild.
#[derive(Clone)]
pub struct MembershipService {
    store: Arc<dyn LevelStore>,
    sink: Arc<dyn ActionSink>,
}

impl MembershipService {
    /// Create a service over a store and an outbound sink.
    pub fn new(store: Arc<dyn LevelStore>, sink: Arc<dyn ActionSink>) -> Self {
        Self { store, sink }
    }

    /// Log the join, greet the member and send them the rules channel.
    ///
    /// Failed sends are logged and do not fail the call.
    #[instrument(skip(self, joined), fields(guild_id = %joined.guild_id, user_id = %joined.user_id))]
    pub async fn handle_join(&self, joined: &MemberJoined) -> LaurelResult<JoinOutcome> {
        if joined.is_bot {
            return Ok(JoinOutcome::Ignored);
        }

        let settings = self.store.get_guild_settings(&joined.guild_id).await?;
        self.store
            .log_welcome(&joined.guild_id, &joined.user_id, &joined.username)
            .await?;

        let mut greeting_channel = None;
        if let Some(channel_id) = settings.welcome_channel_id.as_deref() {
            let template = settings
                .welcome_message
                .as_deref()
                .unwrap_or(DEFAULT_WELCOME_MESSAGE);
            let notice = Notification::Welcome {
                user_id: joined.user_id.clone(),
                text: render_welcome(template, joined),
                member_count: joined.member_count,
            };
            match self.sink.send_notification(channel_id, &notice).await {
                Ok(()) => greeting_channel = Some(channel_id.to_string()),
                Err(e) => warn!(channel_id, error = %e, "Failed to send welcome"),
            }
        }

        let mut rules_reminder_sent = false;
        if let Some(rules_channel_id) = settings.rules_channel_id {
            let notice = Notification::RulesReminder {
                guild_name: joined.guild_name.clone(),
                username: joined.username.clone(),
                rules_channel_id,
            };
            match self.sink.send_direct(&joined.user_id, &notice).await {
                Ok(()) => rules_reminder_sent = true,
                // Members may have direct messages closed
                Err(e) => debug!(error = %e, "Rules reminder not delivered"),
            }
        }

        Ok(JoinOutcome::Welcomed {
            greeting_channel,
            rules_reminder_sent,
        })
    }

    /// Post a leave notice in the log channel, or the welcome channel when no
    /// log channel is set.
    ///
    /// Returns the channel the notice went to.
    #[instrument(skip(self, left), fields(guild_id = %left.guild_id, user_id = %left.user_id))]
    pub async fn handle_leave(&self, left: &MemberLeft) -> LaurelResult<Option<String>> {
        if left.is_bot {
            return Ok(None);
        }

        let settings = self.store.get_guild_settings(&left.guild_id).await?;
        let Some(channel_id) = settings.log_channel_id.or(settings.welcome_channel_id) else {
            return Ok(None);
        };

        let notice = Notification::MemberLeft {
            user_id: left.user_id.clone(),
            display_name: left.display_name.clone(),
            username: left.username.clone(),
            member_count: left.member_count,
        };
        if let Err(e) = self.sink.send_notification(&channel_id, &notice).await {
            warn!(channel_id = %channel_id, error = %e, "Failed to send leave notice");
            return Ok(None);
        }
        Ok(Some(channel_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined() -> MemberJoined {
        MemberJoined {
            guild_id: "g".into(),
            guild_name: "Guild".into(),
            user_id: "7".into(),
            username: "ada".into(),
            display_name: "Ada".into(),
            member_count: Some(12),
            is_bot: false,
        }
    }

    #[test]
    fn default_template_renders_every_placeholder() {
        let text = render_welcome(DEFAULT_WELCOME_MESSAGE, &joined());
        assert_eq!(text, "🎉 Welcome <@7> to **Guild**! You are member #12!");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        assert_eq!(
            render_welcome("{user} {unknown} {user}", &joined()),
            "<@7> {unknown} <@7>"
        );
    }

    #[test]
    fn member_text_is_not_rescanned() {
        let joined = MemberJoined {
            display_name: "{server} {member_count}".into(),
            guild_name: "{user}".into(),
            ..joined()
        };
        assert_eq!(
            render_welcome("Hi {username}!", &joined),
            "Hi {server} {member_count}!"
        );
        assert_eq!(render_welcome("{server} {user}", &joined), "{user} <@7>");
    }

    #[test]
    fn stray_braces_are_kept() {
        assert_eq!(render_welcome("{{user}} {", &joined()), "{<@7>} {");
        assert_eq!(render_welcome("}{user", &joined()), "}{user");
    }

    #[test]
    fn unknown_count_keeps_placeholder() {
        let joined = MemberJoined {
            member_count: None,
            ..joined()
        };
        assert_eq!(
            render_welcome("#{member_count} in {server}", &joined),
            "#{member_count} in Guild"
        );
    }
}
