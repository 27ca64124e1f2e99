//! Tests for configuration loading and service wiring.

use laurel_bot::{LaurelConfig, Services, open_store};
use laurel_core::Notification;
use laurel_error::DispatchError;
use laurel_interface::{ActionSink, LevelStore};
use laurel_leveling::CooldownTracker;
use laurel_social::CommandContext;
use std::sync::Arc;

struct SilentSink;

#[async_trait::async_trait]
impl ActionSink for SilentSink {
    async fn send_notification(&self, _: &str, _: &Notification) -> Result<(), DispatchError> {
        Ok(())
    }

    async fn grant_role(&self, _: &str, _: &str, _: &str) -> Result<(), DispatchError> {
        Ok(())
    }

    async fn send_direct(&self, _: &str, _: &Notification) -> Result<(), DispatchError> {
        Ok(())
    }
}

fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("laurel-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn file_overrides_only_what_it_names() {
    let path = scratch_file(
        "partial.toml",
        "[bot]\nprefix = \"?\"\n\n[server]\nport = 8080\n",
    );

    let config = LaurelConfig::from_file(&path).unwrap();
    let defaults = LaurelConfig::defaults().unwrap();

    assert_eq!(config.bot.prefix, "?");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, defaults.server.host);
    assert_eq!(config.database, defaults.database);
    assert_eq!(config.cooldowns, defaults.cooldowns);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let path = std::env::temp_dir().join("laurel-config-does-not-exist.toml");
    assert!(LaurelConfig::from_file(path).is_err());
}

#[test]
fn malformed_values_are_rejected() {
    let path = scratch_file("bad.toml", "[server]\nport = \"eighty\"\n");
    let err = LaurelConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to load configuration"));
}

#[tokio::test]
async fn services_share_the_store() {
    let store = open_store(":memory:").unwrap();
    let services = Services::new(
        Arc::clone(&store),
        Arc::new(SilentSink),
        Arc::new(CooldownTracker::new()),
        "!",
    );
    let ctx = CommandContext {
        guild_id: "g".into(),
        guild_name: "Guild".into(),
        author_id: "1".into(),
        author_display_name: "Ada".into(),
        member_count: 3,
        is_admin: true,
    };

    services.router.respond(&ctx, "!setxp 42").await.unwrap();

    let settings = store.get_guild_settings("g").await.unwrap();
    assert_eq!(settings.xp_per_message, 42);
}
