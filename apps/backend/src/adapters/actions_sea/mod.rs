//! SeaORM adapter for the action log.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::actions;
use crate::entities::{ActionType, Phase};

pub mod dto;

pub use dto::ActionCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

fn to_active(dto: ActionCreate) -> actions::ActiveModel {
    let now = time::OffsetDateTime::now_utc();
    actions::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        round: Set(dto.round),
        phase: Set(dto.phase),
        actor_id: Set(dto.actor_id),
        action_type: Set(dto.action_type),
        target_id: Set(dto.target_id),
        visibility: Set(dto.visibility),
        description: Set(dto.description),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn unique_key() -> [actions::Column; 5] {
    [
        actions::Column::GameId,
        actions::Column::Round,
        actions::Column::Phase,
        actions::Column::ActorId,
        actions::Column::ActionType,
    ]
}

pub async fn find_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
    phase: Phase,
    actor_id: i64,
    action_type: ActionType,
) -> Result<Option<actions::Model>, sea_orm::DbErr> {
    actions::Entity::find()
        .filter(actions::Column::GameId.eq(game_id))
        .filter(actions::Column::Round.eq(round))
        .filter(actions::Column::Phase.eq(phase))
        .filter(actions::Column::ActorId.eq(actor_id))
        .filter(actions::Column::ActionType.eq(action_type))
        .one(conn)
        .await
}

/// Insert or replace the target of the row keyed by
/// `(game, round, phase, actor, type)`. Requires an actor.
pub async fn upsert_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<actions::Model, sea_orm::DbErr> {
    let actor_id = dto
        .actor_id
        .ok_or_else(|| sea_orm::DbErr::Custom("upsert requires an actor".to_string()))?;
    let key = (dto.game_id, dto.round, dto.phase, dto.action_type);

    actions::Entity::insert(to_active(dto))
        .on_conflict(
            OnConflict::columns(unique_key())
                .update_columns([
                    actions::Column::TargetId,
                    actions::Column::Visibility,
                    actions::Column::Description,
                    actions::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_action(conn, key.0, key.1, key.2, actor_id, key.3)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Action not found".to_string()))
}

/// Insert unless a row with the same key exists. Returns whether a row
/// was written.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<bool, sea_orm::DbErr> {
    let written = actions::Entity::insert(to_active(dto))
        .on_conflict(OnConflict::columns(unique_key()).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;
    Ok(written > 0)
}

/// Plain insert; used for rows without an actor such as `story`.
pub async fn insert_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<actions::Model, sea_orm::DbErr> {
    to_active(dto).insert(conn).await
}

pub async fn list_phase<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
    phase: Phase,
) -> Result<Vec<actions::Model>, sea_orm::DbErr> {
    actions::Entity::find()
        .filter(actions::Column::GameId.eq(game_id))
        .filter(actions::Column::Round.eq(round))
        .filter(actions::Column::Phase.eq(phase))
        .order_by_asc(actions::Column::Id)
        .all(conn)
        .await
}

/// Every action of the game in ordinal order.
pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<actions::Model>, sea_orm::DbErr> {
    actions::Entity::find()
        .filter(actions::Column::GameId.eq(game_id))
        .order_by_asc(actions::Column::Id)
        .all(conn)
        .await
}

/// All actions of one type across the game, e.g. spent one-shot potions.
pub async fn list_by_type<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    action_type: ActionType,
) -> Result<Vec<actions::Model>, sea_orm::DbErr> {
    actions::Entity::find()
        .filter(actions::Column::GameId.eq(game_id))
        .filter(actions::Column::ActionType.eq(action_type))
        .order_by_asc(actions::Column::Id)
        .all(conn)
        .await
}
