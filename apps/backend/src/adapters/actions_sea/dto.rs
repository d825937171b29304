//! DTOs for actions_sea adapter.

use crate::entities::{ActionType, Phase, Visibility};

/// One action-log row to record.
#[derive(Debug, Clone)]
pub struct ActionCreate {
    pub game_id: i64,
    pub round: i32,
    pub phase: Phase,
    pub actor_id: Option<i64>,
    pub action_type: ActionType,
    pub target_id: Option<i64>,
    pub visibility: Visibility,
    pub description: String,
}
