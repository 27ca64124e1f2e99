//! Discord bot client setup and lifecycle management.

use super::{DiscordError, DiscordErrorKind, LaurelHandler};
use serenity::Client;
use serenity::http::Http;
use std::sync::Arc;
use tracing::{info, instrument};

/// Discord client running the Laurel event handler.
///
/// # Example
/// ```no_run
/// # async fn run(handler: laurel_social::LaurelHandler) -> Result<(), laurel_social::DiscordError> {
/// let token = std::env::var("DISCORD_BOT_TOKEN").unwrap_or_default();
/// let mut bot = laurel_social::LaurelBot::new(&token, handler).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct LaurelBot {
    client: Client,
}

impl LaurelBot {
    /// Build the serenity client.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordErrorKind::ConnectionFailed`] when the client cannot
    /// be built, for example because the token is malformed.
    #[instrument(skip(token, handler), fields(token_len = token.len()))]
    pub async fn new(token: &str, handler: LaurelHandler) -> Result<Self, DiscordError> {
        info!("Initializing Laurel Discord bot");

        let intents = LaurelHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!("Serenity client built successfully");
        Ok(Self { client })
    }

    /// HTTP handle of the gateway client, for [`super::DiscordSink::attach`].
    pub fn http(&self) -> Arc<Http> {
        Arc::clone(&self.client.http)
    }

    /// Connect and process events until the connection ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the client fails to start or hits a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), DiscordError> {
        info!("Starting Discord bot");

        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })?;

        Ok(())
    }
}
