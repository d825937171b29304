//! Game repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
use crate::domain::game_transition::GameLifecycleView;
use crate::entities::games::{self, GameStatus};
use crate::entities::{Phase, Team};
use crate::errors::domain::DomainError;

pub use games_adapter::GameUpdate;

/// Game domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub status: GameStatus,
    pub round: i32,
    pub winner: Option<Team>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub ended_at: Option<OffsetDateTime>,
    pub lock_version: i32,
}

impl Game {
    /// The action-log phase for the current status; `None` in lobby or
    /// after the game ended.
    pub fn phase(&self) -> Option<Phase> {
        match self.status {
            GameStatus::Night => Some(Phase::Night),
            GameStatus::Day => Some(Phase::Day),
            GameStatus::Lobby | GameStatus::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn lifecycle(&self) -> GameLifecycleView {
        GameLifecycleView {
            version: self.lock_version,
            status: self.status,
            round: self.round,
            winner: self.winner,
        }
    }
}

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
            round: model.round,
            winner: model.winner,
            created_at: model.created_at,
            updated_at: model.updated_at,
            started_at: model.started_at,
            ended_at: model.ended_at,
            lock_version: model.lock_version,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(Game::from))
}

pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    let game = games_adapter::require_game(conn, game_id).await?;
    Ok(Game::from(game))
}

/// The current game is the latest one; it may already be finished.
pub async fn find_latest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_latest(conn).await?;
    Ok(game.map(Game::from))
}

pub async fn count_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    Ok(games_adapter::count_active(conn).await?)
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Game, DomainError> {
    let game = games_adapter::create_game(conn).await?;
    Ok(Game::from(game))
}

/// Apply `dto` with optimistic locking. Returns the updated game.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<Game, DomainError> {
    let game = games_adapter::update_game(conn, dto).await?;
    Ok(Game::from(game))
}

/// Increment `lock_version` without changing any game fields.
pub async fn touch_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    expected_lock_version: i32,
) -> Result<Game, DomainError> {
    let game = games_adapter::touch_game(conn, id, expected_lock_version).await?;
    Ok(Game::from(game))
}
