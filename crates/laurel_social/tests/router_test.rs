//! Tests for command routing against an in-memory store.

use laurel_database::SqliteLevelStore;
use laurel_interface::LevelStore;
use laurel_social::{Command, CommandContext, CommandRouter, DEFAULT_PREFIX};
use std::sync::Arc;

fn store() -> Arc<dyn LevelStore> {
    Arc::new(SqliteLevelStore::in_memory().expect("in-memory store"))
}

fn member() -> CommandContext {
    CommandContext {
        guild_id: "g".into(),
        guild_name: "Laurel Grove".into(),
        author_id: "100".into(),
        author_display_name: "Ada".into(),
        member_count: 1_234,
        is_admin: false,
    }
}

fn admin() -> CommandContext {
    CommandContext {
        is_admin: true,
        ..member()
    }
}

#[tokio::test]
async fn plain_chat_gets_no_reply() {
    let router = CommandRouter::new(store(), DEFAULT_PREFIX);

    assert_eq!(router.respond(&member(), "good morning").await, None);
    assert_eq!(router.respond(&member(), "!dance").await, None);
}

#[tokio::test]
async fn admin_commands_refuse_members() {
    let store = store();
    let router = CommandRouter::new(Arc::clone(&store), DEFAULT_PREFIX);

    let reply = router.respond(&member(), "!setxp 40").await.unwrap();

    assert!(reply.contains("Administrator"));
    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.xp_per_message, 15);
}

#[tokio::test]
async fn setxp_applies_and_rejects_out_of_range() {
    let store = store();
    let router = CommandRouter::new(Arc::clone(&store), DEFAULT_PREFIX);

    let ok = router.respond(&admin(), "!setxp 40 30").await.unwrap();
    assert!(ok.starts_with("✅"));
    assert!(ok.contains("**40** XP"));
    assert!(ok.contains("**30** seconds"));

    let rejected = router.respond(&admin(), "!setxp 500").await.unwrap();
    assert_eq!(rejected, "❌ `xp_per_message` must be between 1 and 100");

    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.xp_per_message, 40);
    assert_eq!(settings.xp_cooldown, 30);
}

#[tokio::test]
async fn parse_errors_become_replies() {
    let router = CommandRouter::new(store(), DEFAULT_PREFIX);

    let missing = router.respond(&admin(), "!setxp").await.unwrap();
    assert!(missing.starts_with("❌ Missing `xp_amount`"));

    let invalid = router.respond(&admin(), "!setxp lots").await.unwrap();
    assert!(invalid.starts_with("❌ Invalid `xp_amount`"));
}

#[tokio::test]
async fn level_reports_missing_data() {
    let router = CommandRouter::new(store(), DEFAULT_PREFIX);

    let own = router.respond(&member(), "!level").await.unwrap();
    assert_eq!(own, "📊 Ada has no level data yet, keep chatting!");

    let other = router.respond(&member(), "!lv <@200>").await.unwrap();
    assert_eq!(other, "📊 <@200> has no level data yet, keep chatting!");
}

#[tokio::test]
async fn level_shows_rank_card() {
    let store = store();
    store.add_experience("g", "1", "Lead", 1_000).await.unwrap();
    store.add_experience("g", "100", "ada", 250).await.unwrap();
    let router = CommandRouter::new(store, DEFAULT_PREFIX);

    let card = router.respond(&member(), "!level").await.unwrap();

    assert!(card.contains("Ada's level"));
    assert!(card.contains("Level: **2**"));
    assert!(card.contains("Rank: **#2**"));
    assert!(card.contains("50.0%"));
    assert!(card.contains("Next level at: 400 XP"));

    let lead = router.respond(&member(), "!level <@!1>").await.unwrap();
    assert!(lead.contains("Lead's level"));
    assert!(lead.contains("Rank: **#1**"));
}

#[tokio::test]
async fn rank_lists_leaders_and_author_rank() {
    let store = store();
    let router = CommandRouter::new(Arc::clone(&store), DEFAULT_PREFIX);
    assert_eq!(
        router.respond(&member(), "!rank").await.unwrap(),
        "📊 No rankings yet, start chatting!"
    );

    store.add_experience("g", "1", "Lead", 900).await.unwrap();
    store.add_experience("g", "100", "Ada", 120).await.unwrap();

    let board = router.respond(&member(), "!top").await.unwrap();

    assert!(board.starts_with("🏆 **Laurel Grove leaderboard**"));
    assert!(board.contains("🥇 **Lead** | Level 4 | 900 XP"));
    assert!(board.contains("🥈 **Ada**"));
    assert!(board.ends_with("Your rank: #2"));
}

#[tokio::test]
async fn rewards_round_trip_through_commands() {
    let router = CommandRouter::new(store(), DEFAULT_PREFIX);

    let set = router
        .respond(&admin(), "!setlevelreward 5 <@&777> Regular")
        .await
        .unwrap();
    assert!(set.contains("**level 5**"));

    let list = router.respond(&member(), "!levelrewards").await.unwrap();
    assert!(list.contains("⭐ **Level 5** → <@&777> (Regular)"));

    let removed = router.respond(&admin(), "!rlr 5").await.unwrap();
    assert!(removed.starts_with("✅"));
    let again = router.respond(&admin(), "!rlr 5").await.unwrap();
    assert_eq!(again, "❌ Level 5 has no reward");

    let zero = router.respond(&admin(), "!slr 0 <@&777>").await.unwrap();
    assert!(zero.starts_with("❌ `level` must be between 1"));
}

#[tokio::test]
async fn reward_without_name_falls_back_to_role_id() {
    let router = CommandRouter::new(store(), DEFAULT_PREFIX);
    let command = Command::SetLevelReward {
        level: 3,
        role_id: "42".into(),
        role_name: None,
    };

    router.run(&admin(), command).await;

    let list = router.respond(&member(), "!lr").await.unwrap();
    assert!(list.contains("<@&42> (42)"));
}

#[tokio::test]
async fn welcome_settings_show_in_info() {
    let router = CommandRouter::new(store(), DEFAULT_PREFIX);

    router.respond(&admin(), "!setwelcome <#10>").await.unwrap();
    router.respond(&admin(), "!sr 11").await.unwrap();
    let updated = router
        .respond(&admin(), "!swm Hello {user}, welcome to {server}")
        .await
        .unwrap();
    assert!(updated.contains("Hello <@100>, welcome to Laurel Grove"));

    let info = router.respond(&member(), "!welcomeinfo").await.unwrap();
    assert!(info.contains("Welcome channel: <#10>"));
    assert!(info.contains("Rules channel: <#11>"));
    assert!(info.contains("Log channel: ❌ not set"));
    assert!(info.contains("`Hello {user}, welcome to {server}`"));

    let test = router.respond(&admin(), "!testwelcome").await.unwrap();
    assert!(test.contains("Hello <@100>, welcome to Laurel Grove"));
    assert!(test.contains("Member #1,234"));
}

#[tokio::test]
async fn custom_prefix_is_honored() {
    let router = CommandRouter::new(store(), "?");

    assert_eq!(router.prefix(), "?");
    assert!(router.respond(&member(), "!rank").await.is_none());
    assert!(router.respond(&member(), "?rank").await.is_some());
}
