//! Per-game role counts.

use sea_orm::ConnectionTrait;

use crate::adapters::role_configs_sea as role_configs_adapter;
use crate::domain::roles::RoleKind;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// `(role, count)` pairs in catalogue order; zero counts are absent.
pub async fn list_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<(RoleKind, i32)>, DomainError> {
    role_configs_adapter::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|row| {
            RoleKind::from_id(row.role_id)
                .map(|kind| (kind, row.count))
                .ok_or_else(|| {
                    DomainError::infra(
                        InfraErrorKind::DataCorruption,
                        format!("Unknown role id {} in role config", row.role_id),
                    )
                })
        })
        .collect()
}

/// Add `delta` to the role's count, clamped at zero. Returns the new count.
pub async fn adjust_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    role: RoleKind,
    delta: i32,
) -> Result<i32, DomainError> {
    let current = role_configs_adapter::find(conn, game_id, role.id())
        .await?
        .map_or(0, |row| row.count);
    let next = current.saturating_add(delta).max(0);
    if next != current {
        role_configs_adapter::set_count(conn, game_id, role.id(), next).await?;
    }
    Ok(next)
}
