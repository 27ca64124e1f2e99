//! Discord integration for Laurel.
//!
//! This module wires the leveling services to Discord through serenity:
//!
//! - **handler**: serenity `EventHandler` feeding messages, joins and leaves
//!   into the engine, membership service and command router
//! - **sink**: [`laurel_interface::ActionSink`] over the Discord HTTP API
//! - **client**: client setup and lifecycle
//! - **error**: Discord-specific error types
//!
//! # Usage
//!
//! Available with the `discord` feature.
//!
//! ```rust,ignore
//! use laurel_social::{DiscordSink, LaurelBot, LaurelHandler};
//!
//! let sink = DiscordSink::unattached();
//! // build the engine and membership service over `Arc::new(sink.clone())`
//! let handler = LaurelHandler::new(engine, membership, router);
//! let mut bot = LaurelBot::new(&token, handler).await?;
//! sink.attach(bot.http());
//! bot.start().await?;
//! ```

mod client;
mod error;
mod handler;
mod sink;

pub use client::LaurelBot;
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use handler::LaurelHandler;
pub use sink::DiscordSink;
