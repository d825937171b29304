//! Membership repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::memberships_sea as memberships_adapter;
use crate::domain::roles::RoleKind;
use crate::domain::roster::Participant;
use crate::entities::{game_players, ActionType};
use crate::errors::domain::{DomainError, InfraErrorKind};

/// A player's seat in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: i64,
    pub game_id: i64,
    pub player_id: i64,
    pub role: Option<RoleKind>,
    pub is_alive: bool,
    pub died_round: Option<i32>,
    pub death_cause: Option<ActionType>,
}

impl Membership {
    pub fn into_participant(self, name: String) -> Participant {
        Participant {
            player_id: self.player_id,
            name,
            role: self.role,
            alive: self.is_alive,
            died_round: self.died_round,
            death_cause: self.death_cause,
        }
    }
}

impl TryFrom<game_players::Model> for Membership {
    type Error = DomainError;

    fn try_from(model: game_players::Model) -> Result<Self, Self::Error> {
        let role = match model.role_id {
            Some(id) => Some(RoleKind::from_id(id).ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Unknown role id {id} on membership {}", model.id),
                )
            })?),
            None => None,
        };
        Ok(Self {
            id: model.id,
            game_id: model.game_id,
            player_id: model.player_id,
            role,
            is_alive: model.is_alive,
            died_round: model.died_round,
            death_cause: model.death_cause,
        })
    }
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<Option<Membership>, DomainError> {
    memberships_adapter::find_membership(conn, game_id, player_id)
        .await?
        .map(Membership::try_from)
        .transpose()
}

/// Members in join order.
pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Membership>, DomainError> {
    memberships_adapter::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(Membership::try_from)
        .collect()
}

pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<Membership, DomainError> {
    let model = memberships_adapter::create_membership(conn, game_id, player_id).await?;
    Membership::try_from(model)
}

/// Returns whether a membership was removed.
pub async fn delete_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<bool, DomainError> {
    let removed = memberships_adapter::delete_membership(conn, game_id, player_id).await?;
    Ok(removed > 0)
}

pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    role: RoleKind,
) -> Result<(), DomainError> {
    memberships_adapter::set_role(conn, membership_id, role.id()).await?;
    Ok(())
}

/// Returns false if the player was already dead.
pub async fn mark_dead<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
    round: i32,
    cause: ActionType,
) -> Result<bool, DomainError> {
    Ok(memberships_adapter::mark_dead(conn, game_id, player_id, round, cause).await?)
}
