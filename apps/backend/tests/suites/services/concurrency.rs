//! Simultaneous intents for one game serialize on the game lock: every
//! phase resolves exactly once.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::future::join_all;
use moonrise::db::require_db;
use moonrise::domain::game_transition::GameTransition;
use moonrise::domain::roles::RoleKind::{Doctor, Seer, Villager, Werewolf};
use moonrise::entities::{ActionType, GameStatus};
use moonrise::protocol::intent::Intent;
use moonrise::repos::memberships;
use moonrise::services::controller::{apply_as, IntentOutcome};
use moonrise::AppState;

use crate::support::fakes::RecordingBroadcaster;
use crate::support::game_setup::{register, start_with_roles, test_state_with};

async fn all_at_once(state: &AppState, intents: Vec<(i64, Intent)>) -> Vec<IntentOutcome> {
    let handles = intents.into_iter().map(|(player_id, intent)| {
        let state = state.clone();
        tokio::spawn(async move { apply_as(&state, player_id, intent).await })
    });
    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("intent accepted"))
        .collect()
}

fn count_transitions(outcomes: &[IntentOutcome], wanted: &GameTransition) -> usize {
    outcomes
        .iter()
        .flat_map(|o| o.report.transitions.iter())
        .filter(|t| *t == wanted)
        .count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn night_and_day_resolve_once_under_contention() {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let state = test_state_with(broadcaster.clone(), None).await;
    // W1, W2, Seer, Doctor, V, V
    let g = start_with_roles(state, &[Werewolf, Werewolf, Seer, Doctor, Villager, Villager]).await;

    let night = all_at_once(
        &g.state,
        vec![
            (g.pid(0), Intent::WerewolfVote { target: g.at(4) }),
            (g.pid(1), Intent::WerewolfVote { target: g.at(4) }),
            (g.pid(2), Intent::SeerInvestigate { target: g.at(0) }),
            (g.pid(3), Intent::DoctorProtect { target: g.at(5) }),
        ],
    )
    .await;
    assert_eq!(count_transitions(&night, &GameTransition::DayBroke { round: 1 }), 1);
    assert_eq!(night.iter().filter(|o| o.report.died(g.pid(4))).count(), 1);
    assert_eq!(g.status().await, (GameStatus::Day, 1));

    let voters = [0usize, 1, 2, 3, 5];
    let day = all_at_once(
        &g.state,
        voters
            .iter()
            .map(|&seat| {
                let target = if seat == 0 { g.at(2) } else { g.at(0) };
                (g.pid(seat), Intent::DayVote { target })
            })
            .collect(),
    )
    .await;
    assert_eq!(count_transitions(&day, &GameTransition::NightFell { round: 2 }), 1);
    assert_eq!(g.status().await, (GameStatus::Night, 2));
    let eliminations = g
        .actions()
        .await
        .into_iter()
        .filter(|a| a.action_type == ActionType::Elimination)
        .count();
    assert_eq!(eliminations, 1);
    assert!(!g.is_alive(0).await);

    // One version per committed intent, never reused.
    let versions: Vec<i32> = night.iter().chain(day.iter()).map(|o| o.report.version).collect();
    let distinct: BTreeSet<i32> = versions.iter().copied().collect();
    assert_eq!(distinct.len(), versions.len());
    let published: BTreeSet<i32> = broadcaster.versions().into_iter().collect();
    assert!(distinct.is_subset(&published));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_joins_share_one_lobby() {
    let state = test_state_with(Arc::new(RecordingBroadcaster::new()), None).await;
    let players = register(&state, 8).await;

    let outcomes = all_at_once(
        &state,
        players.iter().map(|&p| (p, Intent::JoinLobby)).collect(),
    )
    .await;
    let games: BTreeSet<i64> = outcomes.iter().map(|o| o.report.game_id).collect();
    assert_eq!(games.len(), 1);

    let game_id = *games.iter().next().unwrap();
    let db = require_db(&state).unwrap();
    let members = memberships::list_by_game(db, game_id).await.unwrap();
    assert_eq!(members.len(), players.len());
}
