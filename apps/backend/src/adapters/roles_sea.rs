//! SeaORM adapter for the seeded role table.

use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};

use crate::entities::roles;

pub async fn list_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<roles::Model>, sea_orm::DbErr> {
    roles::Entity::find()
        .order_by_asc(roles::Column::Id)
        .all(conn)
        .await
}
