//! Game flow orchestration service - bridges the pure rules with DB persistence.
//!
//! Every entry point takes the intent's transaction; callers hold the game
//! lock around it so the whole cascade (record, resolve, deaths, chain, win,
//! transition) commits or nothing does.

mod context;
mod day_actions;
mod day_resolver;
mod deaths;
mod lobby;
mod night_actions;
mod night_resolver;

use sea_orm::DatabaseTransaction;
use tracing::debug;

use crate::domain::game_transition::{derive_game_transitions, GameTransition};
use crate::domain::roster::{Death, PlayerId};
use crate::error::AppError;
use crate::protocol::intent::Intent;
use crate::repos::games as games_repo;

pub use context::FlowContext;

/// Game flow service. Stateless; all state lives in the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct GameFlowService;

/// What an intent did, for broadcasting and narration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowReport {
    pub game_id: i64,
    /// `lock_version` after the intent; the broadcast sequence number.
    pub version: i32,
    /// Everyone who died during this intent, in order, heartbreaks included.
    pub deaths: Vec<Death>,
    /// Human-readable death notices for the narrator.
    pub death_notices: Vec<String>,
    pub transitions: Vec<GameTransition>,
}

impl FlowReport {
    fn new(game_id: i64) -> Self {
        Self {
            game_id,
            ..Self::default()
        }
    }

    pub fn had_deaths(&self) -> bool {
        !self.deaths.is_empty()
    }

    pub fn died(&self, player_id: PlayerId) -> bool {
        self.deaths.iter().any(|d| d.player_id == player_id)
    }
}

impl GameFlowService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and apply one intent to `game_id` on behalf of `player_id`.
    pub async fn apply_intent(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        player_id: PlayerId,
        intent: Intent,
    ) -> Result<FlowReport, AppError> {
        let mut ctx = FlowContext::load(txn, game_id).await?;
        let before = ctx.game.lifecycle();
        let mut report = FlowReport::new(game_id);

        debug!(
            game_id,
            player_id,
            intent = intent.name(),
            status = ?ctx.game.status,
            round = ctx.game.round,
            "Applying intent"
        );

        match intent {
            Intent::JoinLobby => self.join_lobby(txn, &mut ctx, player_id).await?,
            Intent::LeaveLobby => self.leave_lobby(txn, &mut ctx, player_id).await?,
            Intent::SetRoleCount { role, delta } => {
                self.set_role_count(txn, &ctx, role, delta).await?
            }
            Intent::StartGame => self.start_game(txn, &mut ctx).await?,
            Intent::WerewolfVote { target } => {
                self.werewolf_vote(txn, &mut ctx, player_id, target, false, &mut report)
                    .await?
            }
            Intent::WerewolfVote2 { target } => {
                self.werewolf_vote(txn, &mut ctx, player_id, target, true, &mut report)
                    .await?
            }
            Intent::SeerInvestigate { target } => {
                self.seer_investigate(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
            Intent::DoctorProtect { target } => {
                self.doctor_protect(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
            Intent::GuardProtect { target } => {
                self.guard_protect(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
            Intent::WitchHeal { target } => {
                self.witch_heal(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
            Intent::WitchKill { target } => {
                self.witch_kill(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
            Intent::WitchPass => self.witch_pass(txn, &mut ctx, player_id, &mut report).await?,
            Intent::CupidChoose { target } => {
                self.cupid_choose(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
            Intent::DayVote { target } => {
                self.day_ballot(txn, &mut ctx, player_id, target, false, &mut report)
                    .await?
            }
            Intent::DayPass => {
                self.day_ballot(txn, &mut ctx, player_id, None, true, &mut report)
                    .await?
            }
            Intent::DayEndVote => self.day_end_vote(txn, &mut ctx, player_id, &mut report).await?,
            Intent::HunterRevenge { target } => {
                self.hunter_revenge(txn, &mut ctx, player_id, target, &mut report)
                    .await?
            }
        }

        // Every successful intent moves the broadcast version at least once.
        if ctx.game.lock_version == before.version {
            ctx.game = games_repo::touch_game(txn, game_id, ctx.game.lock_version).await?;
        }

        report.version = ctx.game.lock_version;
        report.transitions = derive_game_transitions(&before, &ctx.game.lifecycle());
        Ok(report)
    }
}
