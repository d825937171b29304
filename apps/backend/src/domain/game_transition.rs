use crate::entities::{GameStatus, Team};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLifecycleView {
    pub version: i32,
    pub status: GameStatus,
    pub round: i32,
    pub winner: Option<Team>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTransition {
    /// Lobby -> first night
    GameStarted,
    /// Night -> Day within a round
    DayBroke { round: i32 },
    /// Day -> Night, round advanced
    NightFell { round: i32 },
    /// Anything -> Finished
    GameEnded { winner: Option<Team> },
}

/// Derive transitions from before/after lifecycle state.
pub fn derive_game_transitions(
    before: &GameLifecycleView,
    after: &GameLifecycleView,
) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    if before.status == GameStatus::Lobby && after.status != GameStatus::Lobby {
        transitions.push(GameTransition::GameStarted);
    }

    if before.status == GameStatus::Night
        && matches!(after.status, GameStatus::Day | GameStatus::Finished)
        && after.round == before.round
    {
        transitions.push(GameTransition::DayBroke { round: after.round });
    }

    if after.status == GameStatus::Night && after.round > before.round && before.round > 0 {
        transitions.push(GameTransition::NightFell { round: after.round });
    }

    if before.status != GameStatus::Finished && after.status == GameStatus::Finished {
        transitions.push(GameTransition::GameEnded {
            winner: after.winner,
        });
    }

    transitions
}
