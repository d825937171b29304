//! Intent entry point shared by HTTP and websocket transports.
//!
//! Order of operations: register the sender, pick the current game under
//! the lobby lock, run the whole cascade under the game lock in one
//! transaction, then broadcast and narrate after commit.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::db::txn::with_txn;
use crate::domain::game_transition::GameTransition;
use crate::domain::roster::PlayerId;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::infra::game_locks::LOBBY_KEY;
use crate::protocol::intent::Intent;
use crate::repos::games as games_repo;
use crate::repos::players::{self, Player};
use crate::services::broadcaster::GameEvent;
use crate::services::game_flow::{FlowReport, GameFlowService};
use crate::services::storyteller::spawn_narration;
use crate::state::app_state::AppState;

/// Who is talking, as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub external_id: String,
    pub display_name: Option<String>,
}

#[derive(Debug)]
pub struct IntentOutcome {
    pub player_id: PlayerId,
    pub report: FlowReport,
    /// Running narration, when deaths occurred and a storyteller is set.
    pub narration: Option<JoinHandle<()>>,
}

/// Register (or rename) the caller and return their player record.
pub async fn identify(state: &AppState, identity: &PlayerIdentity) -> Result<Player, AppError> {
    let external_id = identity.external_id.clone();
    let display_name = identity.display_name.clone();
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            Ok(players::ensure_player(txn, &external_id, display_name.as_deref()).await?)
        })
    })
    .await
}

pub async fn submit_intent(
    state: &AppState,
    identity: &PlayerIdentity,
    intent: Intent,
) -> Result<IntentOutcome, AppError> {
    let player = identify(state, identity).await?;
    apply_as(state, player.id, intent).await
}

/// Apply `intent` for an already registered player.
pub async fn apply_as(
    state: &AppState,
    player_id: PlayerId,
    intent: Intent,
) -> Result<IntentOutcome, AppError> {
    let locks = state.locks();
    let service = GameFlowService::new();

    let (game_id, guard) = {
        let _lobby = locks.acquire(LOBBY_KEY).await;
        let lobby_intent = intent.is_lobby();
        let game_id = with_txn(None, state, move |txn| {
            Box::pin(async move {
                let game = if lobby_intent {
                    Some(service.ensure_current_game(txn).await?)
                } else {
                    games_repo::find_latest(txn).await?
                };
                game.map(|g| g.id).ok_or_else(|| {
                    DomainError::validation(ValidationKind::PhaseMismatch, "No game is running")
                        .into()
                })
            })
        })
        .await?;
        // Take the game lock before releasing the lobby so nobody can
        // open a new lobby in between.
        (game_id, locks.acquire(game_id).await)
    };

    let report = match with_txn(None, state, move |txn| {
        Box::pin(async move {
            service
                .apply_intent(txn, game_id, player_id, intent)
                .await
        })
    })
    .await
    {
        Ok(report) => report,
        Err(err) => {
            if err.code().is_intent_rejection() {
                info!(game_id, player_id, intent = intent.name(), error = %err, "Intent rejected");
            } else {
                warn!(game_id, player_id, intent = intent.name(), error = %err, "Intent failed");
            }
            return Err(err);
        }
    };
    drop(guard);

    if report
        .transitions
        .iter()
        .any(|t| matches!(t, GameTransition::GameEnded { .. }))
    {
        locks.forget(game_id);
    }

    state.broadcaster().publish(GameEvent::Changed {
        game_id,
        version: report.version,
    });

    let narration = if report.had_deaths() {
        spawn_narration(state.clone(), game_id, report.death_notices.clone())
    } else {
        None
    };

    Ok(IntentOutcome {
        player_id,
        report,
        narration,
    })
}
