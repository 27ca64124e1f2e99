//! Tests for leaderboard and rank queries.

mod test_utils;

use laurel_interface::LevelStore;
use laurel_leveling::{DEFAULT_LEADERBOARD_SIZE, Leaderboard};
use std::sync::Arc;
use test_utils::memory_store;

#[tokio::test]
async fn empty_guild_has_no_entries() {
    let board = Leaderboard::new(memory_store());

    assert!(board.top("g", DEFAULT_LEADERBOARD_SIZE).await.unwrap().is_empty());
    assert_eq!(board.rank("g", "u").await.unwrap(), None);
    assert!(board.rank_card("g", "u").await.unwrap().is_none());
}

#[tokio::test]
async fn top_is_limited_and_sorted() {
    let store = memory_store();
    for (i, user) in ["a", "b", "c", "d"].iter().enumerate() {
        store
            .add_experience("g", user, user, (i as i64 + 1) * 100)
            .await
            .unwrap();
    }
    let board = Leaderboard::new(Arc::clone(&store));

    let top = board.top("g", 3).await.unwrap();

    let users: Vec<_> = top.iter().map(|r| r.user_id().as_str()).collect();
    assert_eq!(users, ["d", "c", "b"]);
}

#[tokio::test]
async fn rank_card_combines_rank_and_progress() {
    let store = memory_store();
    store.add_experience("g", "lead", "Lead", 1000).await.unwrap();
    store.add_experience("g", "u", "Ada", 250).await.unwrap();
    let board = Leaderboard::new(store);

    let card = board.rank_card("g", "u").await.unwrap().unwrap();

    assert_eq!(*card.rank(), 2);
    assert_eq!(*card.record().level(), 2);
    assert_eq!(*card.progress().next_level_xp(), 400);
    assert_eq!(card.progress().percent(), 50.0);
    assert_eq!(card.progress().filled_cells(20), 10);
}
