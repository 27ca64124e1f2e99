//! Tests for guild administration.

mod test_utils;

use laurel_error::{LaurelErrorKind, ValidationErrorKind};
use laurel_interface::LevelStore;
use laurel_leveling::AdminService;
use std::sync::Arc;
use test_utils::memory_store;

#[tokio::test]
async fn set_xp_updates_both_values() {
    let store = memory_store();
    let admin = AdminService::new(Arc::clone(&store));

    admin.set_xp("g", 30, Some(120)).await.unwrap();

    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.xp_per_message, 30);
    assert_eq!(settings.xp_cooldown, 120);
}

#[tokio::test]
async fn set_xp_without_cooldown_keeps_it() {
    let store = memory_store();
    let admin = AdminService::new(Arc::clone(&store));

    admin.set_xp("g", 40, None).await.unwrap();

    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.xp_per_message, 40);
    assert_eq!(settings.xp_cooldown, 60);
}

#[tokio::test]
async fn out_of_range_xp_is_rejected_without_writing() {
    let store = memory_store();
    let admin = AdminService::new(Arc::clone(&store));

    for (xp, cooldown) in [(0, None), (101, None), (20, Some(-1)), (20, Some(601))] {
        let err = admin.set_xp("g", xp, cooldown).await.unwrap_err();
        match err.kind() {
            LaurelErrorKind::Validation(e) => {
                assert!(matches!(e.kind, ValidationErrorKind::OutOfRange { .. }))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.xp_per_message, 15);
    assert_eq!(settings.xp_cooldown, 60);
}

#[tokio::test]
async fn reward_level_must_be_positive() {
    let store = memory_store();
    let admin = AdminService::new(Arc::clone(&store));

    assert!(admin.set_reward("g", 0, "r", "Role").await.is_err());
    assert!(admin.list_rewards("g").await.unwrap().is_empty());
}

#[tokio::test]
async fn rewards_round_trip_through_admin() {
    let store = memory_store();
    let admin = AdminService::new(store);

    admin.set_reward("g", 20, "r20", "Elder").await.unwrap();
    admin.set_reward("g", 5, "r5", "Regular").await.unwrap();

    let rewards = admin.list_rewards("g").await.unwrap();
    let summary: Vec<_> = rewards
        .iter()
        .map(|r| (*r.level(), r.role_name().as_str()))
        .collect();
    assert_eq!(summary, [(5, "Regular"), (20, "Elder")]);

    assert!(admin.remove_reward("g", 20).await.unwrap());
    assert!(!admin.remove_reward("g", 20).await.unwrap());
    assert_eq!(admin.list_rewards("g").await.unwrap().len(), 1);
}

#[tokio::test]
async fn channel_setters_touch_only_their_column() {
    let store = memory_store();
    let admin = AdminService::new(Arc::clone(&store));

    admin.set_welcome_channel("g", "welcome").await.unwrap();
    admin.set_rules_channel("g", "rules").await.unwrap();
    admin.set_log_channel("g", "log").await.unwrap();
    admin.set_level_channel("g", "levels").await.unwrap();
    admin
        .set_welcome_message("g", "Hi {user}")
        .await
        .unwrap();

    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.welcome_channel_id.as_deref(), Some("welcome"));
    assert_eq!(settings.rules_channel_id.as_deref(), Some("rules"));
    assert_eq!(settings.log_channel_id.as_deref(), Some("log"));
    assert_eq!(settings.level_up_channel_id.as_deref(), Some("levels"));
    assert_eq!(settings.welcome_message.as_deref(), Some("Hi {user}"));
    assert_eq!(settings.xp_per_message, 15);
}
