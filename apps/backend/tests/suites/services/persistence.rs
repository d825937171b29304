//! A file-backed store keeps the lobby across restarts.

use std::sync::Arc;

use moonrise::db::require_db;
use moonrise::entities::GameStatus;
use moonrise::protocol::intent::Intent;
use moonrise::services::broadcaster::NullBroadcaster;
use moonrise::services::controller::apply_as;
use moonrise::services::views::current_view;
use moonrise::{build_state, AppState, DbProfile};

use crate::support::game_setup::register;

async fn file_state(file: &std::path::Path) -> AppState {
    build_state()
        .with_db(DbProfile::SqliteFile {
            file: file.to_path_buf(),
        })
        .with_broadcaster(Arc::new(NullBroadcaster))
        .build()
        .await
        .expect("build file-backed state")
}

#[tokio::test]
async fn lobby_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("moonrise.db");

    let (game_id, players) = {
        let state = file_state(&file).await;
        let players = register(&state, 2).await;
        let mut game_id = 0;
        for &p in &players {
            game_id = apply_as(&state, p, Intent::JoinLobby)
                .await
                .unwrap()
                .report
                .game_id;
        }
        (game_id, players)
    };

    // Migrations run again on the second boot and find nothing to do.
    let state = file_state(&file).await;
    let db = require_db(&state).unwrap();
    let view = current_view(db, Some(players[0])).await.unwrap().unwrap();
    assert_eq!(view.game_id, game_id);
    assert_eq!(view.status, GameStatus::Lobby);
    let seated: Vec<i64> = view.players.iter().map(|s| s.player_id).collect();
    assert_eq!(seated, players);
}
