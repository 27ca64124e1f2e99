//! Plain-text rendering of notifications and command replies.

use laurel_core::{GuildSettings, LevelProgress, LevelReward, Notification, UserLevel};
use laurel_leveling::{DEFAULT_WELCOME_MESSAGE, RankCard};

/// Cells in a progress bar.
pub const PROGRESS_BAR_CELLS: usize = 20;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// `1234567` as `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Text bar such as `█████░░░░░`.
pub fn progress_bar(progress: &LevelProgress, cells: usize) -> String {
    let filled = progress.filled_cells(cells);
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn channel_or_unset(channel_id: Option<&str>) -> String {
    channel_id.map_or_else(|| "❌ not set".to_string(), |id| format!("<#{id}>"))
}

/// Message text for an outbound notification.
pub fn render_notification(notification: &Notification) -> String {
    match notification {
        Notification::LevelUp {
            user_id,
            level,
            next_level_xp,
        } => format!(
            "🎉 **Level up!** Congratulations <@{user_id}>, you reached **level {level}**!\n\
             Next level at {} XP",
            group_thousands(*next_level_xp)
        ),
        Notification::RoleGranted {
            user_id,
            level,
            role_id,
            ..
        } => format!("🏆 <@{user_id}> reached level {level} and earned the <@&{role_id}> role!"),
        Notification::Welcome {
            text, member_count, ..
        } => {
            let mut out = format!("👋 **A new member joined!**\n{text}");
            if let Some(count) = member_count {
                out.push_str(&format!("\n-# Member #{}", group_thousands(*count as i64)));
            }
            out
        }
        Notification::RulesReminder {
            guild_name,
            username,
            rules_channel_id,
        } => format!(
            "📜 **Welcome to {guild_name}!**\n\
             Hi {username}, glad to have you.\n\n\
             Please read the server rules first: <#{rules_channel_id}>\n\n\
             If you have any questions, feel free to ask in the server 😊"
        ),
        Notification::MemberLeft {
            display_name,
            username,
            member_count,
            ..
        } => {
            let mut text = format!("👋 **{display_name}** ({username}) left the server");
            if let Some(count) = member_count {
                text.push_str(&format!("\n-# Members now: {count}"));
            }
            text
        }
    }
}

/// The `level` command reply.
pub fn render_rank_card(display_name: &str, card: &RankCard) -> String {
    let record = card.record();
    let progress = card.progress();
    format!(
        "📊 **{display_name}'s level**\n\
         ⭐ Level: **{level}**\n\
         ✨ Experience: **{xp}** XP\n\
         🏅 Rank: **#{rank}**\n\
         📈 Progress ({gained}/{span}): `{bar}` {percent:.1}%\n\
         💬 Messages: {messages}\n\
         🎯 Next level at: {next} XP",
        level = record.level(),
        xp = group_thousands(*record.xp()),
        rank = card.rank(),
        gained = group_thousands(*progress.gained()),
        span = group_thousands(*progress.span()),
        bar = progress_bar(progress, PROGRESS_BAR_CELLS),
        percent = progress.percent(),
        messages = group_thousands(*record.total_messages()),
        next = group_thousands(*progress.next_level_xp()),
    )
}

/// The `rank` command reply.
pub fn render_leaderboard(guild_name: &str, leaders: &[UserLevel], author_rank: Option<i64>) -> String {
    if leaders.is_empty() {
        return "📊 No rankings yet, start chatting!".to_string();
    }

    let mut lines = vec![format!("🏆 **{guild_name} leaderboard**")];
    for (i, entry) in leaders.iter().enumerate() {
        let place = MEDALS
            .get(i)
            .map_or_else(|| format!("`{}.`", i + 1), |m| (*m).to_string());
        let name = if entry.username().is_empty() {
            "Unknown member"
        } else {
            entry.username().as_str()
        };
        lines.push(format!(
            "{place} **{name}** | Level {} | {} XP",
            entry.level(),
            group_thousands(*entry.xp())
        ));
    }
    if let Some(rank) = author_rank {
        lines.push(format!("-# Your rank: #{rank}"));
    }
    lines.join("\n")
}

/// The `levelrewards` command reply.
pub fn render_rewards(rewards: &[LevelReward]) -> String {
    if rewards.is_empty() {
        return "📋 No level rewards configured yet.\n\
                Use `!setlevelreward <level> @role` to add one."
            .to_string();
    }

    let mut lines = vec!["🏆 **Level rewards**".to_string()];
    lines.extend(rewards.iter().map(|r| {
        format!("⭐ **Level {}** → <@&{}> ({})", r.level(), r.role_id(), r.role_name())
    }));
    lines.join("\n")
}

/// The `welcomeinfo` command reply.
pub fn render_welcome_info(guild_name: &str, settings: &GuildSettings) -> String {
    let template = settings
        .welcome_message
        .as_deref()
        .unwrap_or(DEFAULT_WELCOME_MESSAGE);
    format!(
        "📋 **{guild_name} welcome settings**\n\
         📢 Welcome channel: {welcome}\n\
         📜 Rules channel: {rules}\n\
         📝 Log channel: {log}\n\
         💬 Template: `{template}`\n\
         💡 Placeholders: `{{user}}` mention | `{{username}}` name | `{{server}}` server | `{{member_count}}` members",
        welcome = channel_or_unset(settings.welcome_channel_id.as_deref()),
        rules = channel_or_unset(settings.rules_channel_id.as_deref()),
        log = channel_or_unset(settings.log_channel_id.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-4_500), "-4,500");
    }

    #[test]
    fn bar_has_fixed_width() {
        let bar = progress_bar(&LevelProgress::new(2, 250), PROGRESS_BAR_CELLS);
        assert_eq!(bar.chars().count(), PROGRESS_BAR_CELLS);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn level_up_mentions_member_and_threshold() {
        let text = render_notification(&Notification::LevelUp {
            user_id: "9".into(),
            level: 4,
            next_level_xp: 1_600,
        });
        assert!(text.contains("<@9>"));
        assert!(text.contains("level 4"));
        assert!(text.contains("1,600 XP"));
    }

    #[test]
    fn leave_notice_omits_unknown_count() {
        let text = render_notification(&Notification::MemberLeft {
            user_id: "9".into(),
            display_name: "Ada".into(),
            username: "ada".into(),
            member_count: None,
        });
        assert_eq!(text, "👋 **Ada** (ada) left the server");
    }

    #[test]
    fn welcome_footer_needs_a_count() {
        let known = render_notification(&Notification::Welcome {
            user_id: "9".into(),
            text: "Hello".into(),
            member_count: Some(1_500),
        });
        assert!(known.ends_with("-# Member #1,500"));

        let unknown = render_notification(&Notification::Welcome {
            user_id: "9".into(),
            text: "Hello".into(),
            member_count: None,
        });
        assert_eq!(unknown, "👋 **A new member joined!**\nHello");
    }

    #[test]
    fn leaderboard_uses_medals_then_numbers() {
        let leaders: Vec<_> = (0..4)
            .map(|i| UserLevel::new("g", format!("u{i}"), format!("n{i}"), 100 - i, 1, 1, None))
            .collect();
        let text = render_leaderboard("Guild", &leaders, Some(2));
        assert!(text.contains("🥇 **n0**"));
        assert!(text.contains("🥉 **n2**"));
        assert!(text.contains("`4.` **n3**"));
        assert!(text.ends_with("Your rank: #2"));
    }

    #[test]
    fn welcome_info_shows_defaults() {
        let text = render_welcome_info("Guild", &GuildSettings::with_defaults("g"));
        assert!(text.contains("Welcome channel: ❌ not set"));
        assert!(text.contains(DEFAULT_WELCOME_MESSAGE));
        assert!(text.contains("`{user}` mention"));
    }
}
