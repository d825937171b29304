//! Rebuild liveness and status from the action log.
//!
//! Replay re-runs the night and day rules over each round's stored actions
//! in ordinal order. Because resolution depends only on the log, the result
//! must match what the live controller committed.

use crate::domain::chain::propagate;
use crate::domain::day::{pending_hunters, tally, DayVerdict};
use crate::domain::ledger::{LoggedAction, LoverIndex, PhaseLog};
use crate::domain::night::{self, NightContext};
use crate::domain::roster::{PlayerId, Roster};
use crate::domain::win;
use crate::entities::{ActionType, GameStatus, Phase, Team};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayState {
    pub roster: Roster,
    pub status: GameStatus,
    pub round: i32,
    pub winner: Option<Team>,
}

struct Replayer<'a> {
    roster: Roster,
    lovers: &'a LoverIndex,
    shooters: Vec<PlayerId>,
}

impl Replayer<'_> {
    fn kill(&mut self, player_id: PlayerId, round: i32, cause: ActionType) {
        if self.roster.mark_dead(player_id, round, cause) {
            propagate(&mut self.roster, self.lovers, &[player_id], round);
        }
    }

    fn hunters_owed(&self, round: i32) -> bool {
        !pending_hunters(&self.roster, round, &self.shooters).is_empty()
    }

    fn finish(self, round: i32, status: GameStatus, winner: Option<Team>) -> ReplayState {
        ReplayState {
            roster: self.roster,
            status,
            round,
            winner,
        }
    }
}

fn slice(actions: &[LoggedAction], round: i32, phase: Phase) -> Vec<LoggedAction> {
    let mut out: Vec<LoggedAction> = actions
        .iter()
        .filter(|a| a.round == round && a.phase == phase && a.action_type != ActionType::Story)
        .copied()
        .collect();
    out.sort_by_key(|a| a.id);
    out
}

/// Replay a started game. `initial` must hold every participant alive with
/// their dealt role.
pub fn replay(initial: Roster, lovers: &LoverIndex, actions: &[LoggedAction]) -> ReplayState {
    let last_round = actions.iter().map(|a| a.round).max().unwrap_or(1);
    let mut r = Replayer {
        roster: initial,
        lovers,
        shooters: Vec::new(),
    };
    let mut round = 1;

    loop {
        // Night
        let night_actions = slice(actions, round, Phase::Night);
        let ctx = NightContext {
            round,
            roster: &r.roster,
            log: PhaseLog::new(&night_actions),
            lovers,
        };
        if round > last_round || night::unmet_gate(&ctx).is_some() {
            return r.finish(round, GameStatus::Night, None);
        }
        let outcome = night::resolve(&ctx);
        for death in &outcome.deaths {
            r.roster.mark_dead(death.player_id, round, death.cause);
        }
        let killed: Vec<PlayerId> = outcome.deaths.iter().map(|d| d.player_id).collect();
        propagate(&mut r.roster, lovers, &killed, round);
        if let Some(team) = win::evaluate(&r.roster) {
            return r.finish(round, GameStatus::Finished, Some(team));
        }

        // Day
        let day_actions = slice(actions, round, Phase::Day);
        let elimination = day_actions
            .iter()
            .find(|a| a.action_type == ActionType::Elimination)
            .copied();
        let revenges: Vec<LoggedAction> = day_actions
            .iter()
            .filter(|a| a.action_type == ActionType::HunterRevenge)
            .copied()
            .collect();

        let (before, after): (Vec<_>, Vec<_>) = revenges
            .into_iter()
            .partition(|a| elimination.map_or(true, |e| a.id < e.id));

        for shot in before {
            if let (Some(hunter), Some(target)) = (shot.actor, shot.target) {
                r.shooters.push(hunter);
                r.kill(target, round, ActionType::HunterRevenge);
            }
            if !r.hunters_owed(round) {
                if let Some(team) = win::evaluate(&r.roster) {
                    return r.finish(round, GameStatus::Finished, Some(team));
                }
            }
        }

        match elimination {
            Some(elim) => {
                if let Some(target) = elim.target {
                    r.kill(target, round, ActionType::Elimination);
                }
                if !r.hunters_owed(round) {
                    if let Some(team) = win::evaluate(&r.roster) {
                        return r.finish(round, GameStatus::Finished, Some(team));
                    }
                }
                for shot in after {
                    if let (Some(hunter), Some(target)) = (shot.actor, shot.target) {
                        r.shooters.push(hunter);
                        r.kill(target, round, ActionType::HunterRevenge);
                    }
                    if !r.hunters_owed(round) {
                        if let Some(team) = win::evaluate(&r.roster) {
                            return r.finish(round, GameStatus::Finished, Some(team));
                        }
                    }
                }
                if r.hunters_owed(round) {
                    return r.finish(round, GameStatus::Day, None);
                }
            }
            None => {
                if r.hunters_owed(round) {
                    return r.finish(round, GameStatus::Day, None);
                }
                let log = PhaseLog::new(&day_actions);
                if let DayVerdict::Incomplete { .. } = tally(&r.roster, &log) {
                    return r.finish(round, GameStatus::Day, None);
                }
            }
        }

        round += 1;
    }
}
