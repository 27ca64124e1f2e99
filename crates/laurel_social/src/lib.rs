//! Chat front-end for Laurel.
//!
//! # Commands
//!
//! Always available:
//! - [`parse_command`] reads prefix commands such as `!level` or `!setxp 20 30`
//! - [`CommandRouter`] runs them against the leveling services and renders a
//!   plain-text reply
//! - [`render_notification`] turns outbound notifications into message text
//!
//! # Platform Support
//!
//! - `discord` - serenity event handler, outbound sink and client (requires
//!   the `discord` feature)

#![warn(missing_docs)]

mod command;
mod command_error;
mod render;
mod router;

#[cfg(feature = "discord")]
mod discord;

pub use command::{Command, CommandName, DEFAULT_PREFIX, parse_command};
pub use command_error::{CommandError, CommandErrorKind, CommandResult};
pub use render::{
    PROGRESS_BAR_CELLS, group_thousands, progress_bar, render_leaderboard, render_notification,
    render_rank_card, render_rewards, render_welcome_info,
};
pub use router::{CommandContext, CommandRouter};

#[cfg(feature = "discord")]
pub use discord::{DiscordError, DiscordErrorKind, DiscordResult, DiscordSink, LaurelBot, LaurelHandler};
