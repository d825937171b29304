//! SeaORM adapter for per-game role counts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::role_configs;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<role_configs::Model>, sea_orm::DbErr> {
    role_configs::Entity::find()
        .filter(role_configs::Column::GameId.eq(game_id))
        .order_by_asc(role_configs::Column::RoleId)
        .all(conn)
        .await
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    role_id: i64,
) -> Result<Option<role_configs::Model>, sea_orm::DbErr> {
    role_configs::Entity::find()
        .filter(role_configs::Column::GameId.eq(game_id))
        .filter(role_configs::Column::RoleId.eq(role_id))
        .one(conn)
        .await
}

/// Store `count` for the role. A count of zero removes the row.
pub async fn set_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    role_id: i64,
    count: i32,
) -> Result<(), sea_orm::DbErr> {
    let existing = find(conn, game_id, role_id).await?;
    match (existing, count) {
        (Some(row), 0) => {
            role_configs::Entity::delete_by_id(row.id).exec(conn).await?;
        }
        (Some(row), n) => {
            let mut active: role_configs::ActiveModel = row.into();
            active.count = Set(n);
            active.update(conn).await?;
        }
        (None, 0) => {}
        (None, n) => {
            role_configs::ActiveModel {
                id: NotSet,
                game_id: Set(game_id),
                role_id: Set(role_id),
                count: Set(n),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}
