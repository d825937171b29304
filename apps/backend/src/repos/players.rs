//! Player registry. Players outlive games.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            external_id: model.external_id,
            display_name: model.display_name,
        }
    }
}

/// Find the player by external id or register them. A supplied display
/// name replaces the stored one; new players without a name are called by
/// their external id.
pub async fn ensure_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    external_id: &str,
    display_name: Option<&str>,
) -> Result<Player, DomainError> {
    let existing = players_adapter::find_by_external_id(conn, external_id).await?;
    let model = match (existing, display_name) {
        (Some(model), Some(name)) if model.display_name != name => {
            players_adapter::rename_player(conn, model, name).await?
        }
        (Some(model), _) => model,
        (None, name) => {
            players_adapter::create_player(conn, external_id, name.unwrap_or(external_id))
                .await?
        }
    };
    Ok(Player::from(model))
}

pub async fn find_by_external_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    external_id: &str,
) -> Result<Option<Player>, DomainError> {
    let model = players_adapter::find_by_external_id(conn, external_id).await?;
    Ok(model.map(Player::from))
}

/// Display names keyed by player id.
pub async fn display_names<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<HashMap<i64, String>, DomainError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = players_adapter::find_by_ids(conn, ids).await?;
    Ok(rows.into_iter().map(|p| (p.id, p.display_name)).collect())
}
