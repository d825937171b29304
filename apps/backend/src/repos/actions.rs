//! Action log repository.

use sea_orm::ConnectionTrait;

use crate::adapters::actions_sea as actions_adapter;
use crate::domain::ledger::LoggedAction;
use crate::entities::{actions, ActionType, Phase, Visibility};
use crate::errors::domain::DomainError;

pub use actions_adapter::ActionCreate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub id: i64,
    pub game_id: i64,
    pub round: i32,
    pub phase: Phase,
    pub actor_id: Option<i64>,
    pub action_type: ActionType,
    pub target_id: Option<i64>,
    pub visibility: Visibility,
    pub description: String,
}

impl ActionRecord {
    pub fn logged(&self) -> LoggedAction {
        LoggedAction {
            id: self.id,
            round: self.round,
            phase: self.phase,
            actor: self.actor_id,
            action_type: self.action_type,
            target: self.target_id,
        }
    }
}

impl From<actions::Model> for ActionRecord {
    fn from(model: actions::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            round: model.round,
            phase: model.phase,
            actor_id: model.actor_id,
            action_type: model.action_type,
            target_id: model.target_id,
            visibility: model.visibility,
            description: model.description,
        }
    }
}

pub fn logged(records: &[ActionRecord]) -> Vec<LoggedAction> {
    records.iter().map(ActionRecord::logged).collect()
}

pub async fn find_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
    phase: Phase,
    actor_id: i64,
    action_type: ActionType,
) -> Result<Option<ActionRecord>, DomainError> {
    let model =
        actions_adapter::find_action(conn, game_id, round, phase, actor_id, action_type).await?;
    Ok(model.map(ActionRecord::from))
}

/// Record an actor's action, replacing the target of an earlier submission
/// with the same key.
pub async fn record<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<ActionRecord, DomainError> {
    Ok(actions_adapter::upsert_action(conn, dto).await?.into())
}

/// Record unless an action with the same key exists. Returns whether a
/// row was written.
pub async fn record_once<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<bool, DomainError> {
    Ok(actions_adapter::insert_if_absent(conn, dto).await?)
}

/// Append a row with no uniqueness expectations.
pub async fn append<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<ActionRecord, DomainError> {
    Ok(actions_adapter::insert_action(conn, dto).await?.into())
}

pub async fn list_phase<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
    phase: Phase,
) -> Result<Vec<ActionRecord>, DomainError> {
    let rows = actions_adapter::list_phase(conn, game_id, round, phase).await?;
    Ok(rows.into_iter().map(ActionRecord::from).collect())
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<ActionRecord>, DomainError> {
    let rows = actions_adapter::list_by_game(conn, game_id).await?;
    Ok(rows.into_iter().map(ActionRecord::from).collect())
}

pub async fn list_by_type<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    action_type: ActionType,
) -> Result<Vec<ActionRecord>, DomainError> {
    let rows = actions_adapter::list_by_type(conn, game_id, action_type).await?;
    Ok(rows.into_iter().map(ActionRecord::from).collect())
}
