//! Per-intent snapshot of a game and the validation helpers shared by the
//! intent handlers.

use sea_orm::ConnectionTrait;

use crate::domain::ledger::LoverIndex;
use crate::domain::roles::RoleKind;
use crate::domain::roster::{Participant, PlayerId, Roster};
use crate::entities::{ActionType, GameStatus, Phase, Visibility};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::actions::{self as actions_repo, ActionCreate, ActionRecord};
use crate::repos::games::{self as games_repo, Game};
use crate::repos::{lovers, memberships, players};

/// Game row, participants and lover index, loaded inside the intent's
/// transaction and kept in step with every write the handlers make.
#[derive(Debug, Clone)]
pub struct FlowContext {
    pub game: Game,
    pub roster: Roster,
    pub lovers: LoverIndex,
}

pub(super) fn reject(kind: ValidationKind, detail: impl Into<String>) -> DomainError {
    DomainError::validation(kind, detail)
}

/// Who may read an action's description.
pub(super) fn visibility_of(action_type: ActionType) -> Visibility {
    match action_type {
        ActionType::DayVote
        | ActionType::Elimination
        | ActionType::HunterRevenge
        | ActionType::LoverHeartbreak
        | ActionType::Story => Visibility::Public,
        ActionType::WerewolfKill | ActionType::WerewolfKill2 => Visibility::TeamWerewolf,
        ActionType::SeerInvestigate
        | ActionType::DoctorProtect
        | ActionType::GuardProtect
        | ActionType::WitchHeal
        | ActionType::WitchKill
        | ActionType::WitchPass
        | ActionType::CupidLink => Visibility::Actor,
    }
}

impl FlowContext {
    pub async fn load<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        game_id: i64,
    ) -> Result<Self, AppError> {
        let game = games_repo::require_game(conn, game_id).await?;
        let members = memberships::list_by_game(conn, game_id).await?;
        let names =
            players::display_names(conn, members.iter().map(|m| m.player_id).collect()).await?;
        let roster = Roster::new(members.into_iter().map(|m| {
            let name = names
                .get(&m.player_id)
                .cloned()
                .unwrap_or_else(|| format!("Player {}", m.player_id));
            m.into_participant(name)
        }));
        let lovers = lovers::load_index(conn, game_id).await?;
        Ok(Self {
            game,
            roster,
            lovers,
        })
    }

    pub fn game_id(&self) -> i64 {
        self.game.id
    }

    pub fn round(&self) -> i32 {
        self.game.round
    }

    pub fn name(&self, player_id: PlayerId) -> String {
        self.roster.name_of(player_id).to_string()
    }

    pub(super) fn require_status(&self, status: GameStatus, intent: &str) -> Result<(), DomainError> {
        if self.game.status == status {
            Ok(())
        } else {
            Err(reject(
                ValidationKind::PhaseMismatch,
                format!("{intent} is not allowed while the game is {:?}", self.game.status),
            ))
        }
    }

    pub(super) fn require_member(&self, player_id: PlayerId) -> Result<&Participant, DomainError> {
        self.roster.get(player_id).ok_or_else(|| {
            reject(
                ValidationKind::NotInGame,
                "You are not a player in this game",
            )
        })
    }

    pub(super) fn require_living_actor(
        &self,
        player_id: PlayerId,
    ) -> Result<&Participant, DomainError> {
        let actor = self.require_member(player_id)?;
        if !actor.alive {
            return Err(reject(ValidationKind::DeadActor, "The dead cannot act"));
        }
        Ok(actor)
    }

    /// Living actor whose role permits `action_type` at night.
    pub(super) fn require_night_actor(
        &self,
        player_id: PlayerId,
        action_type: ActionType,
    ) -> Result<RoleKind, DomainError> {
        let actor = self.require_living_actor(player_id)?;
        match actor.role {
            Some(role) if role.permits(action_type) => Ok(role),
            _ => Err(reject(
                ValidationKind::WrongRole,
                "Your role cannot do that",
            )),
        }
    }

    /// A present, living participant.
    pub(super) fn require_living_target(
        &self,
        target: Option<PlayerId>,
    ) -> Result<PlayerId, DomainError> {
        let target =
            target.ok_or_else(|| reject(ValidationKind::InvalidTarget, "A target is required"))?;
        match self.roster.get(target) {
            Some(p) if p.alive => Ok(target),
            Some(_) => Err(reject(ValidationKind::InvalidTarget, "Target is dead")),
            None => Err(reject(
                ValidationKind::InvalidTarget,
                "Target is not in this game",
            )),
        }
    }

    /// Action-log phase for the current status.
    pub(super) fn phase(&self) -> Result<Phase, DomainError> {
        self.game.phase().ok_or_else(|| {
            reject(
                ValidationKind::PhaseMismatch,
                "The game is not being played",
            )
        })
    }

    pub(super) async fn phase_actions<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        phase: Phase,
    ) -> Result<Vec<ActionRecord>, AppError> {
        Ok(actions_repo::list_phase(conn, self.game_id(), self.round(), phase).await?)
    }

    /// Record (or re-target) the actor's action in the current round.
    pub(super) async fn record<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        phase: Phase,
        actor: PlayerId,
        action_type: ActionType,
        target: Option<PlayerId>,
        description: String,
    ) -> Result<ActionRecord, AppError> {
        let dto = ActionCreate {
            game_id: self.game_id(),
            round: self.round(),
            phase,
            actor_id: Some(actor),
            action_type,
            target_id: target,
            visibility: visibility_of(action_type),
            description,
        };
        Ok(actions_repo::record(conn, dto).await?)
    }
}
