//! Leveling behavior for Laurel.
//!
//! Everything here works against the [`laurel_interface::LevelStore`] and
//! [`laurel_interface::ActionSink`] traits, so the same services drive the
//! Discord front-end and the tests.
//!
//! - [`CooldownTracker`] limits how often a member can earn experience.
//! - [`AccrualEngine`] turns messages into experience, level-up notices and
//!   reward roles.
//! - [`Leaderboard`] answers ranking queries.
//! - [`AdminService`] validates and applies guild configuration.
//! - [`MembershipService`] greets new members and reports departures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod admin;
mod cooldown;
mod engine;
mod leaderboard;
mod membership;

pub use admin::{AdminService, MIN_REWARD_LEVEL, XP_COOLDOWN_RANGE, XP_PER_MESSAGE_RANGE};
pub use cooldown::{Clock, CooldownTracker, SystemClock};
pub use engine::{AWARD_SPREAD, AccrualEngine, AccrualOutcome, RewardOutcome};
pub use leaderboard::{DEFAULT_LEADERBOARD_SIZE, Leaderboard, RankCard};
pub use membership::{DEFAULT_WELCOME_MESSAGE, JoinOutcome, MembershipService, render_welcome};
