//! Per-player rendering of a game, shared by `GET /api/game/view` and
//! websocket `view` pushes.

use serde::{Deserialize, Serialize};

use crate::domain::roster::PlayerId;
use crate::entities::{ActionType, GameStatus, Phase, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub game_id: i64,
    pub version: i32,
    pub status: GameStatus,
    pub round: i32,
    pub winner: Option<Team>,
    /// Absent when the viewer is not seated in this game.
    pub me: Option<SelfView>,
    pub players: Vec<SeatView>,
    pub role_counts: Vec<RoleCountView>,
    pub actions: Vec<ActionView>,
    /// Hunters who died this round and still owe their shot.
    pub pending_hunters: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfView {
    pub player_id: PlayerId,
    pub role: Option<String>,
    pub team: Option<Team>,
    pub alive: bool,
    /// The bound pair, shown to the lovers themselves and to Cupid.
    pub lovers: Option<(PlayerId, PlayerId)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub player_id: PlayerId,
    pub name: String,
    pub alive: bool,
    /// Only set when the viewer is entitled to know it.
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCountView {
    pub role_id: i64,
    pub role: String,
    /// What the role does, for the lobby's role picker.
    pub summary: String,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub id: i64,
    pub round: i32,
    pub phase: Phase,
    pub action_type: ActionType,
    pub actor_id: Option<PlayerId>,
    pub target_id: Option<PlayerId>,
    pub description: String,
}
