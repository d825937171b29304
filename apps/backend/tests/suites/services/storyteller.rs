use std::sync::Arc;
use std::time::Duration;

use moonrise::domain::roles::RoleKind::{Doctor, Villager, Werewolf};
use moonrise::entities::{ActionType, GameStatus, Visibility};
use moonrise::protocol::intent::Intent;
use moonrise::services::storyteller::Storyteller;

use crate::support::fakes::{
    BrokenStoryteller, RecordingBroadcaster, ScriptedStoryteller, StalledStoryteller,
};
use crate::support::game_setup::{start_with_roles, test_state_with, TestGame};

async fn narrated_game(storyteller: Arc<dyn Storyteller>) -> (TestGame, Arc<RecordingBroadcaster>) {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let state = test_state_with(broadcaster.clone(), Some(storyteller)).await;
    let g = start_with_roles(state, &[Werewolf, Villager, Villager]).await;
    (g, broadcaster)
}

async fn finish(handle: Option<tokio::task::JoinHandle<()>>) {
    let handle = handle.expect("narration spawned");
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("narration finished")
        .expect("narration task");
}

fn stories(actions: &[moonrise::repos::actions::ActionRecord]) -> Vec<String> {
    actions
        .iter()
        .filter(|a| a.action_type == ActionType::Story)
        .map(|a| a.description.clone())
        .collect()
}

#[tokio::test]
async fn deaths_are_narrated_and_stored() {
    let teller = Arc::new(ScriptedStoryteller::new(vec!["The moon ", "rose red."]));
    let (g, broadcaster) = narrated_game(teller.clone()).await;

    let bite = g.ok(0, Intent::WerewolfVote { target: g.at(1) }).await;
    let committed = bite.report.version;
    finish(bite.narration).await;

    assert_eq!(broadcaster.story_chunks(), vec!["The moon ", "rose red."]);
    let histories = teller.histories();
    assert_eq!(histories.len(), 1);
    assert!(histories[0].iter().any(|line| line.contains("P1")));

    let actions = g.actions().await;
    assert_eq!(stories(&actions), vec!["The moon rose red.".to_string()]);
    let story = actions
        .iter()
        .find(|a| a.action_type == ActionType::Story)
        .unwrap();
    assert_eq!(story.visibility, Visibility::Public);
    assert_eq!(story.actor_id, None);

    let version = g.game().await.lock_version;
    assert!(version > committed);
    assert_eq!(broadcaster.versions().last(), Some(&version));

    // Everyone can read it, and play carries on.
    assert!(g
        .view(2)
        .await
        .actions
        .iter()
        .any(|a| a.action_type == ActionType::Story));
    g.ballots(&[(0, Some(2)), (2, Some(0))]).await;
    assert_eq!(g.status().await, (GameStatus::Night, 2));
}

#[tokio::test]
async fn quiet_nights_are_not_narrated() {
    let teller = Arc::new(ScriptedStoryteller::new(vec!["Nothing happened."]));
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let state = test_state_with(broadcaster.clone(), Some(teller.clone())).await;
    let g = start_with_roles(state, &[Werewolf, Doctor, Villager]).await;

    g.ok(1, Intent::DoctorProtect { target: g.at(2) }).await;
    let dawn = g.ok(0, Intent::WerewolfVote { target: g.at(2) }).await;
    assert!(dawn.narration.is_none());
    assert!(teller.histories().is_empty());
    assert!(broadcaster.story_chunks().is_empty());
}

#[tokio::test]
async fn late_storyteller_is_dropped() {
    let teller = Arc::new(StalledStoryteller {
        deadline: Duration::from_millis(50),
    });
    let (g, broadcaster) = narrated_game(teller).await;

    let bite = g.ok(0, Intent::WerewolfVote { target: g.at(1) }).await;
    let committed = bite.report.version;
    finish(bite.narration).await;

    // The partial text reached clients but nothing was stored.
    assert_eq!(broadcaster.story_chunks(), vec!["Once upon a "]);
    assert!(stories(&g.actions().await).is_empty());
    assert_eq!(g.game().await.lock_version, committed);
    assert_eq!(g.status().await, (GameStatus::Day, 1));
}

#[tokio::test]
async fn failing_storyteller_leaves_the_game_alone() {
    let (g, _broadcaster) = narrated_game(Arc::new(BrokenStoryteller)).await;

    let bite = g.ok(0, Intent::WerewolfVote { target: g.at(1) }).await;
    let committed = bite.report.version;
    finish(bite.narration).await;

    assert!(stories(&g.actions().await).is_empty());
    assert_eq!(g.game().await.lock_version, committed);
}

#[tokio::test]
async fn narrating_the_final_death_releases_the_game_lock() {
    let teller = Arc::new(ScriptedStoryteller::new(vec!["The last light went out."]));
    let state = test_state_with(Arc::new(RecordingBroadcaster::new()), Some(teller)).await;
    let g = start_with_roles(state, &[Werewolf, Villager]).await;

    let bite = g.ok(0, Intent::WerewolfVote { target: g.at(1) }).await;
    finish(bite.narration).await;

    assert_eq!(g.status().await.0, GameStatus::Finished);
    assert_eq!(
        stories(&g.actions().await),
        vec!["The last light went out.".to_string()]
    );
    assert!(!g.state.locks().is_tracked(g.game_id));
}
