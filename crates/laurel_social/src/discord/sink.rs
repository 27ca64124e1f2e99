//! Outbound actions over the Discord HTTP API.

use super::{DiscordError, DiscordErrorKind, DiscordResult};
use crate::render_notification;
use async_trait::async_trait;
use laurel_core::Notification;
use laurel_error::DispatchError;
use laurel_interface::ActionSink;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use std::sync::{Arc, OnceLock};
use tracing::{debug, instrument};

/// Audit log reason attached to reward role grants.
const GRANT_REASON: &str = "Level reward";

/// Parse a snowflake; Discord ids are never zero.
fn snowflake(raw: &str) -> DiscordResult<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| DiscordError::new(DiscordErrorKind::InvalidId(raw.to_string())))
}

/// Sends notifications, direct messages and role grants through Discord.
///
/// The sink is created before the gateway client and attached to the
/// client's HTTP handle afterwards, so outbound actions share its rate
/// limits. Actions fail with [`DiscordErrorKind::ConnectionFailed`] until then.
#[derive(Clone, Default)]
pub struct DiscordSink {
    http: Arc<OnceLock<Arc<Http>>>,
}

impl DiscordSink {
    /// Sink already attached to `http`.
    pub fn new(http: Arc<Http>) -> Self {
        let sink = Self::unattached();
        sink.attach(http);
        sink
    }

    /// Sink waiting for [`DiscordSink::attach`].
    pub fn unattached() -> Self {
        Self::default()
    }

    /// Use `http` for every clone of this sink; `false` if already attached.
    pub fn attach(&self, http: Arc<Http>) -> bool {
        self.http.set(http).is_ok()
    }

    /// Whether an HTTP handle is attached.
    pub fn is_attached(&self) -> bool {
        self.http.get().is_some()
    }

    fn http(&self) -> DiscordResult<&Http> {
        self.http.get().map(|http| http.as_ref()).ok_or_else(|| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(
                "Discord client not attached".to_string(),
            ))
        })
    }

    async fn say(&self, channel_id: ChannelId, notification: &Notification) -> DiscordResult<()> {
        channel_id
            .say(self.http()?, render_notification(notification))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ActionSink for DiscordSink {
    #[instrument(skip(self, notification))]
    async fn send_notification(
        &self,
        channel_id: &str,
        notification: &Notification,
    ) -> Result<(), DispatchError> {
        let channel = ChannelId::new(snowflake(channel_id)?);
        self.say(channel, notification).await?;
        debug!("Notification sent");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn grant_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DispatchError> {
        let guild = GuildId::new(snowflake(guild_id)?);
        let user = UserId::new(snowflake(user_id)?);
        let role = RoleId::new(snowflake(role_id)?);

        self.http()?
            .add_member_role(guild, user, role, Some(GRANT_REASON))
            .await
            .map_err(DiscordError::from)?;
        debug!("Role granted");
        Ok(())
    }

    #[instrument(skip(self, notification))]
    async fn send_direct(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> Result<(), DispatchError> {
        let user = UserId::new(snowflake(user_id)?);
        let dm = user
            .create_dm_channel(self.http()?)
            .await
            .map_err(DiscordError::from)?;
        self.say(dm.id, notification).await?;
        debug!("Direct message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laurel_error::DispatchErrorKind;

    #[test]
    fn snowflakes_must_be_nonzero_numbers() {
        assert_eq!(snowflake("80351110224678912").unwrap(), 80351110224678912);
        assert!(snowflake("0").is_err());
        assert!(snowflake("general").is_err());
        assert!(snowflake("").is_err());
    }

    fn level_up() -> Notification {
        Notification::LevelUp {
            user_id: "1".into(),
            level: 2,
            next_level_xp: 400,
        }
    }

    #[tokio::test]
    async fn unattached_sink_refuses_actions() {
        let sink = DiscordSink::unattached();

        let err = sink
            .send_notification("80351110224678912", &level_up())
            .await
            .unwrap_err();
        assert!(matches!(err.kind, DispatchErrorKind::Platform(_)));
        assert!(sink.grant_role("1", "2", "3").await.is_err());
        assert!(sink.send_direct("2", &level_up()).await.is_err());
    }

    #[test]
    fn clones_share_one_attachment() {
        let sink = DiscordSink::unattached();
        let clone = sink.clone();

        assert!(clone.attach(Arc::new(Http::new("token"))));
        assert!(sink.is_attached());
        assert!(!sink.attach(Arc::new(Http::new("other"))));
    }

    #[tokio::test]
    async fn invalid_ids_fail_before_any_request() {
        let sink = DiscordSink::new(Arc::new(Http::new("token")));

        let err = sink.send_notification("general", &level_up()).await.unwrap_err();
        assert!(matches!(err.kind, DispatchErrorKind::InvalidId(_)));
    }
}
