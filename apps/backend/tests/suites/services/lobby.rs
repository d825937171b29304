use moonrise::db::require_db;
use moonrise::domain::roles::RoleKind;
use moonrise::entities::GameStatus;
use moonrise::errors::ErrorCode;
use moonrise::protocol::intent::Intent;
use moonrise::repos::{memberships, role_configs};
use moonrise::services::controller::apply_as;
use moonrise::services::views::current_view;
use moonrise::AppState;

use crate::support::game_setup::{register, start_with_roles, test_state};

async fn join_all(state: &AppState, players: &[i64]) -> i64 {
    let mut game_id = 0;
    for &player in players {
        game_id = apply_as(state, player, Intent::JoinLobby)
            .await
            .expect("join")
            .report
            .game_id;
    }
    game_id
}

async fn add_roles(state: &AppState, by: i64, roles: &[RoleKind]) {
    for &role in roles {
        apply_as(state, by, Intent::SetRoleCount { role, delta: 1 })
            .await
            .expect("set role count");
    }
}

#[tokio::test]
async fn first_join_opens_a_lobby() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    assert!(current_view(db, None).await.unwrap().is_none());

    let players = register(&state, 2).await;
    let game_id = join_all(&state, &players).await;
    // Joining twice changes nothing.
    apply_as(&state, players[0], Intent::JoinLobby).await.unwrap();

    let view = current_view(db, Some(players[1])).await.unwrap().unwrap();
    assert_eq!(view.game_id, game_id);
    assert_eq!(view.status, GameStatus::Lobby);
    assert_eq!(view.round, 0);
    let seated: Vec<i64> = view.players.iter().map(|s| s.player_id).collect();
    assert_eq!(seated, players);
    assert_eq!(view.players[0].name, "P0");
    let me = view.me.expect("seated viewer");
    assert!(me.alive);
    assert_eq!(me.role, None);
}

#[tokio::test]
async fn leaving_frees_the_seat() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let players = register(&state, 3).await;
    let game_id = join_all(&state, &players[..2]).await;

    apply_as(&state, players[1], Intent::LeaveLobby).await.unwrap();
    // Not seated: a no-op.
    apply_as(&state, players[2], Intent::LeaveLobby).await.unwrap();

    let members = memberships::list_by_game(db, game_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].player_id, players[0]);
}

#[tokio::test]
async fn role_counts_never_go_negative() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let players = register(&state, 1).await;
    let game_id = join_all(&state, &players).await;

    apply_as(
        &state,
        players[0],
        Intent::SetRoleCount {
            role: RoleKind::Seer,
            delta: -1,
        },
    )
    .await
    .unwrap();
    add_roles(&state, players[0], &[RoleKind::Werewolf, RoleKind::Werewolf]).await;
    apply_as(
        &state,
        players[0],
        Intent::SetRoleCount {
            role: RoleKind::Werewolf,
            delta: -1,
        },
    )
    .await
    .unwrap();

    let counts = role_configs::list_counts(db, game_id).await.unwrap();
    assert!(counts.iter().all(|(_, n)| *n >= 0));
    assert!(counts.contains(&(RoleKind::Werewolf, 1)));
    assert!(!counts.iter().any(|(role, n)| *role == RoleKind::Seer && *n > 0));
}

#[tokio::test]
async fn start_needs_one_role_per_player() {
    let state = test_state().await;
    let players = register(&state, 3).await;
    join_all(&state, &players).await;
    add_roles(&state, players[0], &[RoleKind::Werewolf, RoleKind::Villager]).await;

    let err = apply_as(&state, players[0], Intent::StartGame)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStart);

    add_roles(&state, players[0], &[RoleKind::Villager]).await;
    let started = apply_as(&state, players[0], Intent::StartGame).await.unwrap();
    assert!(started
        .report
        .transitions
        .contains(&moonrise::domain::game_transition::GameTransition::GameStarted));
}

#[tokio::test]
async fn dealt_roles_match_the_configuration() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let mut config = vec![
        RoleKind::Werewolf,
        RoleKind::Werewolf,
        RoleKind::Seer,
        RoleKind::Doctor,
        RoleKind::Villager,
        RoleKind::Villager,
        RoleKind::Villager,
    ];
    let players = register(&state, config.len()).await;
    let game_id = join_all(&state, &players).await;
    add_roles(&state, players[3], &config).await;
    apply_as(&state, players[5], Intent::StartGame).await.unwrap();

    let mut dealt: Vec<RoleKind> = memberships::list_by_game(db, game_id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.role.expect("every seat dealt"))
        .collect();
    dealt.sort();
    config.sort();
    assert_eq!(dealt, config);

    let view = current_view(db, Some(players[0])).await.unwrap().unwrap();
    assert_eq!(view.status, GameStatus::Night);
    assert_eq!(view.round, 1);
}

#[tokio::test]
async fn lobby_is_closed_once_the_game_runs() {
    let g = start_with_roles(
        test_state().await,
        &[RoleKind::Werewolf, RoleKind::Villager, RoleKind::Villager],
    )
    .await;
    let db = require_db(&g.state).unwrap();
    let late = register(&g.state, 1).await[0];

    let outcome = apply_as(&g.state, late, Intent::JoinLobby).await.unwrap();
    assert_eq!(outcome.report.game_id, g.game_id);
    assert!(memberships::find_membership(db, g.game_id, late)
        .await
        .unwrap()
        .is_none());

    g.rejected(1, Intent::LeaveLobby, ErrorCode::PhaseMismatch).await;
}

#[tokio::test]
async fn finished_game_makes_way_for_a_new_lobby() {
    let g = start_with_roles(
        test_state().await,
        &[RoleKind::Werewolf, RoleKind::Villager],
    )
    .await;
    // One wolf, one villager: the first bite ends it.
    g.ok(0, Intent::WerewolfVote { target: g.at(1) }).await;
    assert_eq!(g.status().await.0, GameStatus::Finished);

    let outcome = g.ok(1, Intent::JoinLobby).await;
    assert_ne!(outcome.report.game_id, g.game_id);

    let db = require_db(&g.state).unwrap();
    let view = current_view(db, Some(g.pid(1))).await.unwrap().unwrap();
    assert_eq!(view.game_id, outcome.report.game_id);
    assert_eq!(view.status, GameStatus::Lobby);
    assert_eq!(view.players.len(), 1);

    // Intents for the old game have nowhere to go.
    g.rejected(0, Intent::DayPass, ErrorCode::PhaseMismatch).await;
}
