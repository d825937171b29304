//! Small builders for rule tests.

use crate::domain::ledger::LoggedAction;
use crate::domain::roles::RoleKind;
use crate::domain::roster::{Participant, Roster};
use crate::entities::{ActionType, Phase};

/// Roster with players numbered 1.. in the given role order.
pub fn roster_of(roles: &[RoleKind]) -> Roster {
    Roster::new(roles.iter().enumerate().map(|(i, &role)| {
        let id = i as i64 + 1;
        Participant::living(id, format!("P{id}"), role)
    }))
}

/// Builds an ordered action list with sequential ids.
#[derive(Default)]
pub struct LogBuilder {
    actions: Vec<LoggedAction>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        mut self,
        round: i32,
        phase: Phase,
        actor: i64,
        action_type: ActionType,
        target: Option<i64>,
    ) -> Self {
        let id = self.actions.len() as i64 + 1;
        self.actions.push(LoggedAction {
            id,
            round,
            phase,
            actor: Some(actor),
            action_type,
            target,
        });
        self
    }

    pub fn night(self, round: i32, actor: i64, action_type: ActionType, target: i64) -> Self {
        self.push(round, Phase::Night, actor, action_type, Some(target))
    }

    pub fn witch_pass(self, round: i32, actor: i64) -> Self {
        self.push(round, Phase::Night, actor, ActionType::WitchPass, None)
    }

    pub fn vote(self, round: i32, actor: i64, target: Option<i64>) -> Self {
        self.push(round, Phase::Day, actor, ActionType::DayVote, target)
    }

    pub fn day(self, round: i32, actor: i64, action_type: ActionType, target: i64) -> Self {
        self.push(round, Phase::Day, actor, action_type, Some(target))
    }

    pub fn build(self) -> Vec<LoggedAction> {
        self.actions
    }
}
