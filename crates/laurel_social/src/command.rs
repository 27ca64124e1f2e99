//! Prefix command parsing.
//!
//! Commands look like `!level @someone` or `!setxp 20 30`. Mentions may be
//! written in Discord's markup (`<@id>`, `<#id>`, `<@&id>`) or as bare ids.

use crate::{CommandError, CommandResult};

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "!";

/// Names and aliases a command can be invoked by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum CommandName {
    /// `level`, `lv`
    #[strum(to_string = "level", serialize = "lv")]
    Level,
    /// `rank`, `leaderboard`, `top`
    #[strum(to_string = "rank", serialize = "leaderboard", serialize = "top")]
    Rank,
    /// `setlevelreward`, `slr`
    #[strum(to_string = "setlevelreward", serialize = "slr")]
    SetLevelReward,
    /// `removelevelreward`, `rlr`
    #[strum(to_string = "removelevelreward", serialize = "rlr")]
    RemoveLevelReward,
    /// `levelrewards`, `lr`
    #[strum(to_string = "levelrewards", serialize = "lr")]
    LevelRewards,
    /// `setlevelchannel`, `slc`
    #[strum(to_string = "setlevelchannel", serialize = "slc")]
    SetLevelChannel,
    /// `setxp`
    #[strum(to_string = "setxp")]
    SetXp,
    /// `setwelcome`, `sw`
    #[strum(to_string = "setwelcome", serialize = "sw")]
    SetWelcome,
    /// `setrules`, `sr`
    #[strum(to_string = "setrules", serialize = "sr")]
    SetRules,
    /// `setlogchannel`, `slog`
    #[strum(to_string = "setlogchannel", serialize = "slog")]
    SetLogChannel,
    /// `setwelcomemsg`, `swm`
    #[strum(to_string = "setwelcomemsg", serialize = "swm")]
    SetWelcomeMessage,
    /// `testwelcome`, `tw`
    #[strum(to_string = "testwelcome", serialize = "tw")]
    TestWelcome,
    /// `welcomeinfo`, `wi`
    #[strum(to_string = "welcomeinfo", serialize = "wi")]
    WelcomeInfo,
}

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the level card of the author or of a mentioned member.
    Level {
        /// Mentioned member, the author when `None`
        target_user_id: Option<String>,
    },
    /// Show the top ten.
    Rank,
    /// Attach a role to a level.
    SetLevelReward {
        /// Level that earns the role
        level: i32,
        /// Role to grant
        role_id: String,
        /// Role name typed after the mention, if any
        role_name: Option<String>,
    },
    /// Remove the reward of a level.
    RemoveLevelReward {
        /// Level to clear
        level: i32,
    },
    /// List configured rewards.
    LevelRewards,
    /// Route level-up notices to a channel.
    SetLevelChannel {
        /// Target channel
        channel_id: String,
    },
    /// Tune the base award and optionally the cooldown.
    SetXp {
        /// Base experience per message
        xp_per_message: i32,
        /// Seconds between awards
        cooldown: Option<i32>,
    },
    /// Post greetings in a channel.
    SetWelcome {
        /// Target channel
        channel_id: String,
    },
    /// Point newcomers at a rules channel.
    SetRules {
        /// Target channel
        channel_id: String,
    },
    /// Post leave notices in a channel.
    SetLogChannel {
        /// Target channel
        channel_id: String,
    },
    /// Replace the greeting template.
    SetWelcomeMessage {
        /// New template text
        template: String,
    },
    /// Render the greeting for the author as a preview.
    TestWelcome,
    /// Show the welcome configuration.
    WelcomeInfo,
}

impl Command {
    /// Name the command was registered under.
    pub fn name(&self) -> CommandName {
        match self {
            Command::Level { .. } => CommandName::Level,
            Command::Rank => CommandName::Rank,
            Command::SetLevelReward { .. } => CommandName::SetLevelReward,
            Command::RemoveLevelReward { .. } => CommandName::RemoveLevelReward,
            Command::LevelRewards => CommandName::LevelRewards,
            Command::SetLevelChannel { .. } => CommandName::SetLevelChannel,
            Command::SetXp { .. } => CommandName::SetXp,
            Command::SetWelcome { .. } => CommandName::SetWelcome,
            Command::SetRules { .. } => CommandName::SetRules,
            Command::SetLogChannel { .. } => CommandName::SetLogChannel,
            Command::SetWelcomeMessage { .. } => CommandName::SetWelcomeMessage,
            Command::TestWelcome => CommandName::TestWelcome,
            Command::WelcomeInfo => CommandName::WelcomeInfo,
        }
    }

    /// Whether only guild administrators may run the command.
    pub fn requires_admin(&self) -> bool {
        !matches!(
            self,
            Command::Level { .. } | Command::Rank | Command::LevelRewards | Command::WelcomeInfo
        )
    }
}

/// Parse `content` as a command invoked with `prefix`.
///
/// Returns `Ok(None)` when the text is not addressed to the bot or names an
/// unknown command, so ordinary chat never produces an error.
///
/// # Examples
///
/// ```
/// use laurel_social::{Command, parse_command};
///
/// let cmd = parse_command("!", "!setxp 20 30").unwrap();
/// assert_eq!(cmd, Some(Command::SetXp { xp_per_message: 20, cooldown: Some(30) }));
///
/// assert_eq!(parse_command("!", "hello there").unwrap(), None);
/// ```
pub fn parse_command(prefix: &str, content: &str) -> CommandResult<Option<Command>> {
    let Some(body) = content.trim_start().strip_prefix(prefix) else {
        return Ok(None);
    };
    let mut tokens = body.split_whitespace();
    let Some(raw_name) = tokens.next() else {
        return Ok(None);
    };
    let Ok(name) = raw_name.parse::<CommandName>() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();
    let cmd = name.to_string();

    let command = match name {
        CommandName::Level => Command::Level {
            target_user_id: args
                .first()
                .map(|raw| parse_mention(&cmd, "member", raw, &["<@!", "<@"]))
                .transpose()?,
        },
        CommandName::Rank => Command::Rank,
        CommandName::SetLevelReward => {
            let level = parse_int(&cmd, "level", args.first().copied())?;
            let role = args.get(1).ok_or_else(|| CommandError::missing(&cmd, "role"))?;
            let role_name = args.get(2..).map(|rest| rest.join(" "));
            Command::SetLevelReward {
                level,
                role_id: parse_mention(&cmd, "role", role, &["<@&"])?,
                role_name: role_name.filter(|n| !n.is_empty()),
            }
        }
        CommandName::RemoveLevelReward => Command::RemoveLevelReward {
            level: parse_int(&cmd, "level", args.first().copied())?,
        },
        CommandName::LevelRewards => Command::LevelRewards,
        CommandName::SetLevelChannel => Command::SetLevelChannel {
            channel_id: parse_channel(&cmd, args.first().copied())?,
        },
        CommandName::SetXp => Command::SetXp {
            xp_per_message: parse_int(&cmd, "xp_amount", args.first().copied())?,
            cooldown: args
                .get(1)
                .copied()
                .map(|raw| parse_int(&cmd, "cooldown", Some(raw)))
                .transpose()?,
        },
        CommandName::SetWelcome => Command::SetWelcome {
            channel_id: parse_channel(&cmd, args.first().copied())?,
        },
        CommandName::SetRules => Command::SetRules {
            channel_id: parse_channel(&cmd, args.first().copied())?,
        },
        CommandName::SetLogChannel => Command::SetLogChannel {
            channel_id: parse_channel(&cmd, args.first().copied())?,
        },
        CommandName::SetWelcomeMessage => {
            // Keep the template's own spacing
            let template = body.trim_start()[raw_name.len()..].trim();
            if template.is_empty() {
                return Err(CommandError::missing(&cmd, "message"));
            }
            Command::SetWelcomeMessage {
                template: template.to_string(),
            }
        }
        CommandName::TestWelcome => Command::TestWelcome,
        CommandName::WelcomeInfo => Command::WelcomeInfo,
    };

    Ok(Some(command))
}

#[track_caller]
fn parse_int(command: &str, arg_name: &str, raw: Option<&str>) -> CommandResult<i32> {
    let raw = raw.ok_or_else(|| CommandError::missing(command, arg_name))?;
    raw.parse::<i32>()
        .map_err(|_| CommandError::invalid(command, arg_name, format!("'{raw}' is not a whole number")))
}

#[track_caller]
fn parse_channel(command: &str, raw: Option<&str>) -> CommandResult<String> {
    let raw = raw.ok_or_else(|| CommandError::missing(command, "channel"))?;
    parse_mention(command, "channel", raw, &["<#"])
}

/// Extract the id from a mention in one of `openers` form, or a bare id.
#[track_caller]
fn parse_mention(command: &str, arg_name: &str, raw: &str, openers: &[&str]) -> CommandResult<String> {
    let id = openers
        .iter()
        .find_map(|open| raw.strip_prefix(open).and_then(|r| r.strip_suffix('>')))
        .unwrap_or(raw);

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CommandError::invalid(
            command,
            arg_name,
            format!("'{raw}' is not a {arg_name} mention or id"),
        ));
    }
    Ok(id.to_string())
}
