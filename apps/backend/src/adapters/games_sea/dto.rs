//! DTOs for games_sea adapter.

use time::OffsetDateTime;

use crate::entities::games::GameStatus;
use crate::entities::Team;

/// Field changes applied to a game with one version increment.
///
/// `expected_version` must match the stored `lock_version`.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub id: i64,
    pub status: Option<GameStatus>,
    pub round: Option<i32>,
    pub winner: Option<Team>,
    pub started_at: Option<OffsetDateTime>,
    pub ended_at: Option<OffsetDateTime>,
    pub expected_version: i32,
}

impl GameUpdate {
    pub fn new(id: i64, expected_version: i32) -> Self {
        Self {
            id,
            status: None,
            round: None,
            winner: None,
            started_at: None,
            ended_at: None,
            expected_version,
        }
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_round(mut self, round: i32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_winner(mut self, winner: Team) -> Self {
        self.winner = Some(winner);
        self
    }

    pub fn with_started_at(mut self, at: OffsetDateTime) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn with_ended_at(mut self, at: OffsetDateTime) -> Self {
        self.ended_at = Some(at);
        self
    }
}
