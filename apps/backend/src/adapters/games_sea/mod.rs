//! SeaORM adapter for games - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::games::{self, GameStatus};

pub mod dto;

pub use dto::GameUpdate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// Apply an update guarded by `lock_version`, bump the version, then refetch.
///
/// Zero affected rows means either the game is gone (`RecordNotFound`) or
/// someone else moved it first (`OPTIMISTIC_LOCK` custom error).
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    current_lock_version: i32,
    configure_update: F,
) -> Result<games::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<games::Entity>) -> sea_orm::UpdateMany<games::Entity>,
{
    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(games::Entity::update_many())
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::LockVersion.eq(current_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let game = games::Entity::find_by_id(id).one(conn).await?;
        if let Some(game) = game {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                current_lock_version, game.lock_version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        }
        return Err(sea_orm::DbErr::RecordNotFound("Game not found".to_string()));
    }

    require_game(conn, id).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Find game by ID or return RecordNotFound error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Game not found".to_string()))
}

/// The most recently created game, finished or not.
pub async fn find_latest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .order_by_desc(games::Column::Id)
        .one(conn)
        .await
}

/// Number of games that have not finished. Used as a sanity check; at most
/// one should exist.
pub async fn count_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    use sea_orm::PaginatorTrait;

    games::Entity::find()
        .filter(games::Column::Status.ne(GameStatus::Finished))
        .count(conn)
        .await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        status: Set(GameStatus::Lobby),
        round: Set(0),
        winner: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        started_at: Set(None),
        ended_at: Set(None),
        lock_version: Set(1),
    };

    game_active.insert(conn).await
}

pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    let GameUpdate {
        id,
        status,
        round,
        winner,
        started_at,
        ended_at,
        expected_version,
    } = dto;

    optimistic_update_then_fetch(conn, id, expected_version, move |mut update| {
        if let Some(status) = status {
            update = update.col_expr(games::Column::Status, Expr::value(status));
        }
        if let Some(round) = round {
            update = update.col_expr(games::Column::Round, Expr::value(round));
        }
        if let Some(winner) = winner {
            update = update.col_expr(games::Column::Winner, Expr::value(winner));
        }
        if let Some(at) = started_at {
            update = update.col_expr(games::Column::StartedAt, Expr::value(at));
        }
        if let Some(at) = ended_at {
            update = update.col_expr(games::Column::EndedAt, Expr::value(at));
        }
        update
    })
    .await
}

/// Bump `lock_version` without changing any game fields, so views refresh
/// after lobby or action changes.
pub async fn touch_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    current_lock_version: i32,
) -> Result<games::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, id, current_lock_version, |update| update).await
}
