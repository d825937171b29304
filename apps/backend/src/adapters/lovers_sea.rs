//! SeaORM adapter for lover pairs.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use crate::entities::lover_pairs;

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<lover_pairs::Model>, sea_orm::DbErr> {
    lover_pairs::Entity::find()
        .filter(lover_pairs::Column::GameId.eq(game_id))
        .order_by_asc(lover_pairs::Column::Id)
        .all(conn)
        .await
}

/// Insert `(a, b)` and `(b, a)`.
pub async fn insert_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    a: i64,
    b: i64,
) -> Result<(), sea_orm::DbErr> {
    let row = |from: i64, to: i64| lover_pairs::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        player_a: Set(from),
        player_b: Set(to),
    };
    lover_pairs::Entity::insert_many([row(a, b), row(b, a)])
        .exec(conn)
        .await?;
    Ok(())
}
