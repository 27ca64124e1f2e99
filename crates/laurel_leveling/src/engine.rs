//! Message-driven experience accrual.

use crate::cooldown::{Clock, CooldownTracker, SystemClock};
use laurel_core::{MessageReceived, Notification, experience_required_for};
use laurel_error::LaurelResult;
use laurel_interface::{ActionSink, LevelStore};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Width of the random bonus on top of the guild's base award.
pub const AWARD_SPREAD: i64 = 10;

/// What happened to a reward role after a level-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardOutcome {
    /// The member already had the role.
    AlreadyHeld {
        /// Reward role
        role_id: String,
    },
    /// The role was granted.
    Granted {
        /// Reward role
        role_id: String,
        /// Cached role name
        role_name: String,
    },
    /// The grant was attempted and failed. Experience stays awarded.
    Failed {
        /// Reward role
        role_id: String,
    },
}

/// Terminal state of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccrualOutcome {
    /// Bot author or a message outside a guild.
    Ignored,
    /// Member is still cooling down.
    Rejected,
    /// Experience awarded without reaching a new level.
    NoLevelChange {
        /// Experience awarded
        awarded: i64,
        /// Total experience afterwards
        xp: i64,
        /// Unchanged level
        level: i32,
    },
    /// Experience awarded and a new level reached.
    LeveledUp {
        /// Experience awarded
        awarded: i64,
        /// Total experience afterwards
        xp: i64,
        /// Level reached
        level: i32,
        /// Reward handling for the level reached, if one is configured
        reward: Option<RewardOutcome>,
    },
}

/// Turns chat messages into experience, level-up notices and reward roles.
///
/// At most one award and one level-up notice result from a message. Only the
/// reward of the level actually reached is considered; skipped levels are not
/// granted after the fact.
pub struct AccrualEngine {
    store: Arc<dyn LevelStore>,
    sink: Arc<dyn ActionSink>,
    cooldowns: Arc<CooldownTracker>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl AccrualEngine {
    /// Engine on the wall clock with an entropy-seeded generator.
    pub fn new(store: Arc<dyn LevelStore>, sink: Arc<dyn ActionSink>) -> Self {
        Self {
            store,
            sink,
            cooldowns: Arc::new(CooldownTracker::new()),
            clock: Arc::new(SystemClock),
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Use `clock` for cooldown checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Draw awards from `rng`.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    /// Share an existing cooldown tracker.
    pub fn with_cooldowns(mut self, cooldowns: Arc<CooldownTracker>) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    /// Tracker holding the cooldown state.
    pub fn cooldowns(&self) -> &Arc<CooldownTracker> {
        &self.cooldowns
    }

    /// Process one message.
    ///
    /// # Errors
    ///
    /// Fails only when reading settings or adding experience fails. Sends and
    /// role grants are logged on failure and never surface here.
    #[instrument(
        skip(self, message),
        fields(guild_id = ?message.guild_id, user_id = %message.user_id)
    )]
    pub async fn handle_message(&self, message: &MessageReceived) -> LaurelResult<AccrualOutcome> {
        let Some(guild_id) = message.qualifying_guild() else {
            return Ok(AccrualOutcome::Ignored);
        };

        let settings = self.store.get_guild_settings(guild_id).await?;
        let now = self.clock.now();
        if !self.cooldowns.try_consume(
            guild_id,
            &message.user_id,
            i64::from(settings.xp_cooldown),
            now,
        ) {
            debug!("Cooldown active, no award");
            return Ok(AccrualOutcome::Rejected);
        }

        let awarded = self.roll_award(settings.xp_per_message);
        let gain = self
            .store
            .add_experience(guild_id, &message.user_id, &message.display_name, awarded)
            .await?;

        if !gain.leveled_up {
            return Ok(AccrualOutcome::NoLevelChange {
                awarded,
                xp: gain.xp,
                level: gain.level,
            });
        }

        info!(level = gain.level, xp = gain.xp, "Member leveled up");
        let channel_id = settings
            .level_up_channel_id
            .as_deref()
            .unwrap_or(&message.channel_id);
        let notice = Notification::LevelUp {
            user_id: message.user_id.clone(),
            level: gain.level,
            next_level_xp: experience_required_for(gain.level.saturating_add(1)),
        };
        if let Err(e) = self.sink.send_notification(channel_id, &notice).await {
            warn!(channel_id, error = %e, "Failed to send level-up notice");
        }

        let reward = self
            .apply_reward(guild_id, message, gain.level, channel_id)
            .await;

        Ok(AccrualOutcome::LeveledUp {
            awarded,
            xp: gain.xp,
            level: gain.level,
            reward,
        })
    }

    /// Uniform draw from `base..=base + AWARD_SPREAD`.
    fn roll_award(&self, base: i32) -> i64 {
        let base = i64::from(base);
        self.rng.lock().gen_range(base..=base + AWARD_SPREAD)
    }

    async fn apply_reward(
        &self,
        guild_id: &str,
        message: &MessageReceived,
        level: i32,
        channel_id: &str,
    ) -> Option<RewardOutcome> {
        let reward = match self.store.get_level_reward(guild_id, level).await {
            Ok(reward) => reward?,
            Err(e) => {
                warn!(level, error = %e, "Failed to look up level reward");
                return None;
            }
        };
        let role_id = reward.role_id().clone();

        if message.has_role(&role_id) {
            debug!(role_id = %role_id, "Reward role already held");
            return Some(RewardOutcome::AlreadyHeld { role_id });
        }

        if let Err(e) = self
            .sink
            .grant_role(guild_id, &message.user_id, &role_id)
            .await
        {
            warn!(role_id = %role_id, error = %e, "Failed to grant reward role");
            return Some(RewardOutcome::Failed { role_id });
        }

        info!(role_id = %role_id, level, "Granted reward role");
        let notice = Notification::RoleGranted {
            user_id: message.user_id.clone(),
            level,
            role_id: role_id.clone(),
            role_name: reward.role_name().clone(),
        };
        if let Err(e) = self.sink.send_notification(channel_id, &notice).await {
            warn!(channel_id, error = %e, "Failed to announce reward role");
        }

        Some(RewardOutcome::Granted {
            role_id,
            role_name: reward.role_name().clone(),
        })
    }
}
