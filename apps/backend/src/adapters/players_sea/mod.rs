//! SeaORM adapter for the player registry.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::players;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_external_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    external_id: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::ExternalId.eq(external_id))
        .one(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Id.is_in(ids))
        .all(conn)
        .await
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    external_id: &str,
    display_name: &str,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player = players::ActiveModel {
        id: NotSet,
        external_id: Set(external_id.to_string()),
        display_name: Set(display_name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    player.insert(conn).await
}

pub async fn rename_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: players::Model,
    display_name: &str,
) -> Result<players::Model, sea_orm::DbErr> {
    let mut active: players::ActiveModel = model.into();
    active.display_name = Set(display_name.to_string());
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}
