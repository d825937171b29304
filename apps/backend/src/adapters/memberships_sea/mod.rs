//! SeaORM adapter for game membership (`game_players`).

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::game_players;
use crate::entities::ActionType;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<Option<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::PlayerId.eq(player_id))
        .one(conn)
        .await
}

/// Members of a game in join order.
pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .order_by_asc(game_players::Column::Id)
        .all(conn)
        .await
}

pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<game_players::Model, sea_orm::DbErr> {
    let membership = game_players::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        player_id: Set(player_id),
        role_id: Set(None),
        is_alive: Set(true),
        died_round: Set(None),
        death_cause: Set(None),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    membership.insert(conn).await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_players::Entity::delete_many()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    role_id: i64,
) -> Result<(), sea_orm::DbErr> {
    game_players::Entity::update_many()
        .col_expr(game_players::Column::RoleId, Expr::value(role_id))
        .filter(game_players::Column::Id.eq(membership_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Flip `is_alive` to false for a living member. The `is_alive = true`
/// filter keeps the transition one-way; returns whether a row changed.
pub async fn mark_dead<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
    round: i32,
    cause: ActionType,
) -> Result<bool, sea_orm::DbErr> {
    let result = game_players::Entity::update_many()
        .col_expr(game_players::Column::IsAlive, Expr::value(false))
        .col_expr(game_players::Column::DiedRound, Expr::value(round))
        .col_expr(game_players::Column::DeathCause, Expr::value(cause))
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::PlayerId.eq(player_id))
        .filter(game_players::Column::IsAlive.eq(true))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}
