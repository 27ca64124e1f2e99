//! Serenity event handler for the Laurel bot.
//!
//! Translates gateway events into leveling events and sends command replies
//! back to the channel they came from.

use crate::{Command, CommandContext, CommandRouter};
use laurel_core::{MemberJoined, MemberLeft, MessageReceived};
use laurel_leveling::{AccrualEngine, AccrualOutcome, JoinOutcome, MembershipService};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::guild::Member;
use serenity::model::id::{GuildId, RoleId, UserId};
use serenity::model::user::User;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Guild details copied out of the cache.
///
/// Cache references cannot be held across an await, so the handler takes
/// what it needs up front.
#[derive(Debug, Clone)]
struct GuildSnapshot {
    name: String,
    member_count: u64,
    is_admin: bool,
}

/// Event handler for the Laurel Discord bot.
pub struct LaurelHandler {
    engine: Arc<AccrualEngine>,
    membership: MembershipService,
    router: CommandRouter,
}

impl LaurelHandler {
    /// Create a handler over the leveling services.
    pub fn new(
        engine: Arc<AccrualEngine>,
        membership: MembershipService,
        router: CommandRouter,
    ) -> Self {
        Self {
            engine,
            membership,
            router,
        }
    }

    /// Required gateway intents for the bot.
    ///
    /// Member events need `GUILD_MEMBERS`; command parsing needs `MESSAGE_CONTENT`.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Snapshot a guild for an author holding `author_roles`.
    ///
    /// Owners are always administrators. Everyone else needs a role, the
    /// implicit `@everyone` role included, carrying the administrator bit.
    fn guild_snapshot(
        cache: &Cache,
        guild_id: GuildId,
        author: UserId,
        author_roles: &[RoleId],
    ) -> Option<GuildSnapshot> {
        let guild = cache.guild(guild_id)?;
        let everyone = RoleId::new(guild_id.get());
        let is_admin = guild.owner_id == author
            || author_roles
                .iter()
                .chain(std::iter::once(&everyone))
                .filter_map(|id| guild.roles.get(id))
                .any(|role| role.permissions.administrator());

        Some(GuildSnapshot {
            name: guild.name.clone(),
            member_count: guild.member_count,
            is_admin,
        })
    }

    fn role_name(cache: &Cache, guild_id: GuildId, role_id: &str) -> Option<String> {
        let role_id = role_id.parse::<u64>().ok().filter(|id| *id != 0)?;
        let guild = cache.guild(guild_id)?;
        guild
            .roles
            .get(&RoleId::new(role_id))
            .map(|role| role.name.clone())
    }

    fn name_and_count(cache: &Cache, guild_id: GuildId) -> Option<(String, u64)> {
        cache
            .guild(guild_id)
            .map(|guild| (guild.name.clone(), guild.member_count))
    }

    /// Guild name and member count from the cache, else from the HTTP API.
    ///
    /// The count is `None` when neither source has it; the name then falls
    /// back to the guild id.
    async fn guild_name_and_count(
        &self,
        ctx: &Context,
        guild_id: GuildId,
    ) -> (String, Option<u64>) {
        if let Some((name, count)) = Self::name_and_count(&ctx.cache, guild_id) {
            return (name, Some(count));
        }

        match guild_id.to_partial_guild_with_counts(&ctx.http).await {
            Ok(guild) => (guild.name, guild.approximate_member_count),
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Guild unavailable, greeting without details");
                (guild_id.to_string(), None)
            }
        }
    }

    /// Name a user shows in a guild: nickname, then global name, then account name.
    fn display_name(user: &User, nick: Option<&String>) -> String {
        nick.or(user.global_name.as_ref())
            .unwrap_or(&user.name)
            .clone()
    }

    async fn accrue(&self, msg: &Message) {
        let (nick, role_ids) = match &msg.member {
            Some(member) => (member.nick.as_ref(), member.roles.clone()),
            None => (None, Vec::new()),
        };

        let event = MessageReceived {
            guild_id: msg.guild_id.map(|id| id.to_string()),
            user_id: msg.author.id.to_string(),
            display_name: Self::display_name(&msg.author, nick),
            channel_id: msg.channel_id.to_string(),
            is_bot: msg.author.bot,
            role_ids: role_ids.iter().map(|id| id.to_string()).collect(),
        };

        match self.engine.handle_message(&event).await {
            Ok(AccrualOutcome::LeveledUp { level, .. }) => {
                info!(user_id = %event.user_id, level, "Member leveled up");
            }
            Ok(outcome) => debug!(?outcome, "Message processed"),
            Err(e) => error!(user_id = %event.user_id, error = %e, "Failed to award experience"),
        }
    }

    async fn answer_command(&self, ctx: &Context, msg: &Message, guild_id: GuildId) {
        let command = match self.router.parse(&msg.content) {
            Ok(Some(command)) => command,
            Ok(None) => return,
            Err(reply) => {
                self.reply(ctx, msg, reply).await;
                return;
            }
        };

        let author_roles = msg
            .member
            .as_ref()
            .map(|member| member.roles.clone())
            .unwrap_or_default();
        let Some(guild) = Self::guild_snapshot(&ctx.cache, guild_id, msg.author.id, &author_roles)
        else {
            warn!(guild_id = %guild_id, "Guild missing from cache, command skipped");
            return;
        };

        let command = match command {
            Command::SetLevelReward {
                level,
                role_id,
                role_name: None,
            } => {
                let role_name = Self::role_name(&ctx.cache, guild_id, &role_id);
                Command::SetLevelReward {
                    level,
                    role_id,
                    role_name,
                }
            }
            other => other,
        };

        let nick = msg.member.as_ref().and_then(|member| member.nick.as_ref());
        let command_ctx = CommandContext {
            guild_id: guild_id.to_string(),
            guild_name: guild.name,
            author_id: msg.author.id.to_string(),
            author_display_name: Self::display_name(&msg.author, nick),
            member_count: guild.member_count,
            is_admin: guild.is_admin,
        };

        let reply = self.router.run(&command_ctx, command).await;
        self.reply(ctx, msg, reply).await;
    }

    async fn reply(&self, ctx: &Context, msg: &Message, text: String) {
        if let Err(e) = msg.channel_id.say(&ctx.http, text).await {
            warn!(channel_id = %msg.channel_id, error = %e, "Failed to send command reply");
        }
    }
}

#[async_trait]
impl EventHandler for LaurelHandler {
    /// Called when the bot successfully connects to Discord.
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            prefix = self.router.prefix(),
            "Bot connected to Discord"
        );
    }

    /// Called for every message the bot can see.
    ///
    /// Experience is awarded before the message is checked for a command, so
    /// commands earn experience like any other message.
    async fn message(&self, ctx: Context, msg: Message) {
        self.accrue(&msg).await;

        if msg.author.bot {
            return;
        }
        if let Some(guild_id) = msg.guild_id {
            self.answer_command(&ctx, &msg, guild_id).await;
        }
    }

    /// Called when a new member joins a guild.
    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        let guild_id = new_member.guild_id;
        let (guild_name, member_count) = self.guild_name_and_count(&ctx, guild_id).await;

        let joined = MemberJoined {
            guild_id: guild_id.to_string(),
            guild_name,
            user_id: new_member.user.id.to_string(),
            username: new_member.user.name.clone(),
            display_name: Self::display_name(&new_member.user, new_member.nick.as_ref()),
            member_count,
            is_bot: new_member.user.bot,
        };

        match self.membership.handle_join(&joined).await {
            Ok(JoinOutcome::Welcomed { .. }) => {
                info!(guild_id = %guild_id, user_id = %joined.user_id, "Member welcomed");
            }
            Ok(JoinOutcome::Ignored) => debug!(user_id = %joined.user_id, "Bot join ignored"),
            Err(e) => error!(guild_id = %guild_id, error = %e, "Failed to handle member join"),
        }
    }

    /// Called when a member leaves or is removed from a guild.
    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        member_data_if_available: Option<Member>,
    ) {
        let nick = member_data_if_available
            .as_ref()
            .and_then(|member| member.nick.as_ref());

        let left = MemberLeft {
            guild_id: guild_id.to_string(),
            user_id: user.id.to_string(),
            username: user.name.clone(),
            display_name: Self::display_name(&user, nick),
            member_count: Self::name_and_count(&ctx.cache, guild_id).map(|(_, count)| count),
            is_bot: user.bot,
        };

        match self.membership.handle_leave(&left).await {
            Ok(Some(channel_id)) => {
                info!(guild_id = %guild_id, channel_id = %channel_id, "Leave notice posted");
            }
            Ok(None) => debug!(guild_id = %guild_id, "No leave notice posted"),
            Err(e) => error!(guild_id = %guild_id, error = %e, "Failed to handle member leave"),
        }
    }
}
