//! The stored log alone must reproduce liveness and status.

use moonrise::db::require_db;
use moonrise::domain::replay::replay;
use moonrise::domain::roles::RoleKind::{
    Cupid, Doctor, Hunter, Mason, Seer, Villager, Werewolf, Witch, WolfCub,
};
use moonrise::entities::GameStatus;
use moonrise::protocol::intent::Intent;
use moonrise::repos::{actions, lovers};
use moonrise::services::game_flow::FlowContext;

use crate::support::game_setup::{start_with_roles, test_state, TestGame};

async fn assert_replay_matches(g: &TestGame) {
    let db = require_db(&g.state).unwrap();
    let stored = FlowContext::load(db, g.game_id).await.unwrap();
    let index = lovers::load_index(db, g.game_id).await.unwrap();
    let log = actions::logged(&actions::list_by_game(db, g.game_id).await.unwrap());

    let replayed = replay(g.initial_roster().await, &index, &log);
    assert_eq!(replayed.roster.alive_vector(), stored.roster.alive_vector());
    assert_eq!(replayed.status, stored.game.status);
    assert_eq!(replayed.round, stored.game.round);
    assert_eq!(replayed.winner, stored.game.winner);
}

#[tokio::test]
async fn lovers_and_hunter_replay() {
    let g = start_with_roles(test_state().await, &[Cupid, Hunter, Werewolf, Villager, Mason]).await;
    g.ok(2, Intent::WerewolfVote { target: g.at(4) }).await;
    g.ok(0, Intent::CupidChoose { target: g.at(3) }).await;
    g.ok(0, Intent::CupidChoose { target: g.at(1) }).await;
    assert_replay_matches(&g).await;

    g.ballots(&[(0, None), (1, None), (2, None), (3, None)]).await;
    g.ok(2, Intent::WerewolfVote { target: g.at(3) }).await;
    // Paused on the Hunter's shot.
    assert_replay_matches(&g).await;

    g.ok(1, Intent::HunterRevenge { target: g.at(2) }).await;
    assert_eq!(g.status().await.0, GameStatus::Finished);
    assert_replay_matches(&g).await;
}

#[tokio::test]
async fn multi_round_game_replays() {
    // WC, W, Seer, Doctor, Witch, V, V, V
    let g = start_with_roles(
        test_state().await,
        &[WolfCub, Werewolf, Seer, Doctor, Witch, Villager, Villager, Villager],
    )
    .await;

    // Night 1: the pack takes seat 5, the witch poisons the cub.
    g.ok(0, Intent::WerewolfVote { target: g.at(5) }).await;
    g.ok(1, Intent::WerewolfVote { target: g.at(5) }).await;
    g.ok(2, Intent::SeerInvestigate { target: g.at(1) }).await;
    g.ok(3, Intent::DoctorProtect { target: g.at(6) }).await;
    g.ok(4, Intent::WitchKill { target: g.at(0) }).await;
    let dawn = g.ok(4, Intent::WitchPass).await;
    assert!(dawn.report.died(g.pid(0)));
    assert!(dawn.report.died(g.pid(5)));
    assert_eq!(g.status().await, (GameStatus::Day, 1));
    assert_replay_matches(&g).await;

    // Day 1: six alive, no majority.
    g.ballots(&[
        (1, Some(2)),
        (2, Some(1)),
        (3, Some(1)),
        (4, None),
        (6, Some(2)),
        (7, None),
    ])
    .await;
    assert_eq!(g.status().await, (GameStatus::Night, 2));
    assert_replay_matches(&g).await;

    // Night 2: cub revenge, two victims, one saved.
    g.ok(1, Intent::WerewolfVote { target: g.at(6) }).await;
    g.ok(1, Intent::WerewolfVote2 { target: g.at(7) }).await;
    g.ok(2, Intent::SeerInvestigate { target: g.at(4) }).await;
    g.ok(3, Intent::DoctorProtect { target: g.at(7) }).await;
    let dawn = g.ok(4, Intent::WitchPass).await;
    assert!(dawn.report.died(g.pid(6)));
    assert!(!dawn.report.died(g.pid(7)));
    assert_replay_matches(&g).await;

    // Day 2: the wolf is voted out, the village wins.
    g.ballots(&[(1, Some(2)), (2, Some(1)), (3, Some(1)), (4, Some(1))])
        .await;
    let last = g.ok(7, Intent::DayVote { target: g.at(1) }).await;
    assert!(last.report.died(g.pid(1)));
    assert_eq!(g.game().await.status, GameStatus::Finished);
    assert_replay_matches(&g).await;
}
