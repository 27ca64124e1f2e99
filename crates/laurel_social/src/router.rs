//! Executes parsed commands against the leveling services.

use crate::render::{
    group_thousands, render_leaderboard, render_rank_card, render_rewards, render_welcome_info,
};
use crate::{Command, CommandError, CommandErrorKind, parse_command};
use laurel_core::MemberJoined;
use laurel_error::{
    LaurelError, LaurelErrorKind, LaurelResult, ValidationError, ValidationErrorKind,
};
use laurel_interface::LevelStore;
use laurel_leveling::{
    AdminService, DEFAULT_LEADERBOARD_SIZE, DEFAULT_WELCOME_MESSAGE, Leaderboard, render_welcome,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Who invoked a command, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Guild the command was sent in
    pub guild_id: String,
    /// Guild name for replies
    pub guild_name: String,
    /// Invoking member
    pub author_id: String,
    /// Name the invoking member shows in the guild
    pub author_display_name: String,
    /// Current member count of the guild
    pub member_count: u64,
    /// Whether the invoking member is a guild administrator
    pub is_admin: bool,
}

/// Turns chat commands into replies.
#[derive(Clone)]
pub struct CommandRouter {
    store: Arc<dyn LevelStore>,
    leaderboard: Leaderboard,
    admin: AdminService,
    prefix: String,
}

impl CommandRouter {
    /// Router over `store` answering commands that start with `prefix`.
    pub fn new(store: Arc<dyn LevelStore>, prefix: impl Into<String>) -> Self {
        Self {
            leaderboard: Leaderboard::new(Arc::clone(&store)),
            admin: AdminService::new(Arc::clone(&store)),
            store,
            prefix: prefix.into(),
        }
    }

    /// Command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Reply to `content`, or `None` when it is not a command.
    ///
    /// Parse errors, rejected input and missing permissions become reply
    /// text. Storage failures are logged and answered with a generic message.
    #[instrument(skip(self, ctx, content), fields(guild_id = %ctx.guild_id, author_id = %ctx.author_id))]
    pub async fn respond(&self, ctx: &CommandContext, content: &str) -> Option<String> {
        match self.parse(content) {
            Ok(Some(command)) => Some(self.run(ctx, command).await),
            Ok(None) => None,
            Err(reply) => Some(reply),
        }
    }

    /// Parse `content` with this router's prefix; errors come back as reply text.
    pub fn parse(&self, content: &str) -> Result<Option<Command>, String> {
        parse_command(&self.prefix, content).map_err(|e| describe_parse_error(&e))
    }

    /// Run a parsed command and render the outcome, failures included.
    pub async fn run(&self, ctx: &CommandContext, command: Command) -> String {
        let name = command.name();
        match self.execute(ctx, command).await {
            Ok(reply) => reply,
            Err(e) => describe_error(&name.to_string(), &e),
        }
    }

    /// Run a parsed command.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when a non-administrator runs an admin
    /// command or input is out of range, and with a database error when the
    /// store fails.
    #[instrument(skip(self, ctx), fields(command = %command.name()))]
    pub async fn execute(&self, ctx: &CommandContext, command: Command) -> LaurelResult<String> {
        if command.requires_admin() && !ctx.is_admin {
            warn!(author_id = %ctx.author_id, "Admin command refused");
            return Err(ValidationError::new(ValidationErrorKind::PermissionRequired(
                command.name().to_string(),
            ))
            .into());
        }
        let guild_id = ctx.guild_id.as_str();

        let reply = match command {
            Command::Level { target_user_id } => {
                let target = target_user_id.as_deref().unwrap_or(&ctx.author_id);
                match self.leaderboard.rank_card(guild_id, target).await? {
                    Some(card) => {
                        let name = if target == ctx.author_id {
                            ctx.author_display_name.clone()
                        } else {
                            card.record().username().clone()
                        };
                        render_rank_card(&name, &card)
                    }
                    None if target == ctx.author_id => format!(
                        "📊 {} has no level data yet, keep chatting!",
                        ctx.author_display_name
                    ),
                    None => format!("📊 <@{target}> has no level data yet, keep chatting!"),
                }
            }
            Command::Rank => {
                let leaders = self.leaderboard.top(guild_id, DEFAULT_LEADERBOARD_SIZE).await?;
                let author_rank = self.leaderboard.rank(guild_id, &ctx.author_id).await?;
                render_leaderboard(&ctx.guild_name, &leaders, author_rank)
            }
            Command::SetLevelReward {
                level,
                role_id,
                role_name,
            } => {
                let role_name = role_name.unwrap_or_else(|| role_id.clone());
                self.admin
                    .set_reward(guild_id, level, &role_id, &role_name)
                    .await?;
                info!(level, role_id = %role_id, "Reward configured by command");
                format!("✅ Members reaching **level {level}** will receive <@&{role_id}>")
            }
            Command::RemoveLevelReward { level } => {
                if self.admin.remove_reward(guild_id, level).await? {
                    format!("✅ Removed the reward for level {level}")
                } else {
                    format!("❌ Level {level} has no reward")
                }
            }
            Command::LevelRewards => render_rewards(&self.admin.list_rewards(guild_id).await?),
            Command::SetLevelChannel { channel_id } => {
                self.admin.set_level_channel(guild_id, &channel_id).await?;
                format!("✅ Level-up notices will be posted in <#{channel_id}>")
            }
            Command::SetXp {
                xp_per_message,
                cooldown,
            } => {
                self.admin.set_xp(guild_id, xp_per_message, cooldown).await?;
                let mut reply = format!("✅ Experience per message set to **{xp_per_message}** XP");
                if let Some(cooldown) = cooldown {
                    reply.push_str(&format!(", cooldown set to **{cooldown}** seconds"));
                }
                reply
            }
            Command::SetWelcome { channel_id } => {
                self.admin.set_welcome_channel(guild_id, &channel_id).await?;
                format!("✅ New members will be greeted in <#{channel_id}>")
            }
            Command::SetRules { channel_id } => {
                self.admin.set_rules_channel(guild_id, &channel_id).await?;
                format!("✅ New members will be pointed to <#{channel_id}>")
            }
            Command::SetLogChannel { channel_id } => {
                self.admin.set_log_channel(guild_id, &channel_id).await?;
                format!("✅ Leave notices will be posted in <#{channel_id}>")
            }
            Command::SetWelcomeMessage { template } => {
                self.admin.set_welcome_message(guild_id, &template).await?;
                let preview = render_welcome(&template, &self.author_as_newcomer(ctx));
                format!("✅ Welcome message updated\n**Preview:**\n{preview}")
            }
            Command::TestWelcome => {
                let settings = self.store.get_guild_settings(guild_id).await?;
                let template = settings
                    .welcome_message
                    .as_deref()
                    .unwrap_or(DEFAULT_WELCOME_MESSAGE);
                let preview = render_welcome(template, &self.author_as_newcomer(ctx));
                format!(
                    "👋 **A new member joined!** (test)\n{preview}\n-# Member #{}\n\n{}",
                    group_thousands(ctx.member_count as i64),
                    render_welcome_info(&ctx.guild_name, &settings)
                )
            }
            Command::WelcomeInfo => {
                let settings = self.store.get_guild_settings(guild_id).await?;
                render_welcome_info(&ctx.guild_name, &settings)
            }
        };

        Ok(reply)
    }

    fn author_as_newcomer(&self, ctx: &CommandContext) -> MemberJoined {
        MemberJoined {
            guild_id: ctx.guild_id.clone(),
            guild_name: ctx.guild_name.clone(),
            user_id: ctx.author_id.clone(),
            username: ctx.author_display_name.clone(),
            display_name: ctx.author_display_name.clone(),
            member_count: Some(ctx.member_count),
            is_bot: false,
        }
    }
}

fn describe_parse_error(err: &CommandError) -> String {
    match &err.kind {
        CommandErrorKind::MissingArgument { command, arg_name } => {
            format!("❌ Missing `{arg_name}` for `{command}`")
        }
        CommandErrorKind::InvalidArgument {
            command,
            arg_name,
            reason,
        } => format!("❌ Invalid `{arg_name}` for `{command}`: {reason}"),
    }
}

fn describe_error(command: &str, err: &LaurelError) -> String {
    match err.kind() {
        LaurelErrorKind::Validation(e) => match &e.kind {
            ValidationErrorKind::PermissionRequired(_) => {
                "❌ You need **Administrator** permission to use this command".to_string()
            }
            ValidationErrorKind::OutOfRange {
                field, min, max, ..
            } => format!("❌ `{field}` must be between {min} and {max}"),
        },
        _ => {
            error!(command, error = %err, "Command failed");
            "❌ Something went wrong, please try again later".to_string()
        }
    }
}
