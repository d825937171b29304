//! Role table access. The table is seeded from the same catalogue the
//! rules use; [`verify_catalogue`] checks the two agree.

use sea_orm::ConnectionTrait;

use crate::adapters::roles_sea as roles_adapter;
use crate::domain::roles::RoleKind;
use crate::errors::domain::{DomainError, InfraErrorKind};

pub async fn verify_catalogue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(), DomainError> {
    let rows = roles_adapter::list_roles(conn).await?;
    if rows.len() != RoleKind::ALL.len() {
        return Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!(
                "roles table has {} rows, catalogue has {}",
                rows.len(),
                RoleKind::ALL.len()
            ),
        ));
    }
    for row in rows {
        let matches = RoleKind::from_id(row.id)
            .is_some_and(|kind| kind.name() == row.name && kind.team() == row.team);
        if !matches {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("roles row {} ({}) does not match catalogue", row.id, row.name),
            ));
        }
    }
    Ok(())
}
