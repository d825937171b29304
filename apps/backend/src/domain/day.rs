//! Day vote tally and Hunter bookkeeping.

use crate::domain::ledger::PhaseLog;
use crate::domain::roles::RoleKind;
use crate::domain::roster::{PlayerId, Roster};
use crate::domain::tally::strict_majority;
use crate::entities::ActionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoEliminationReason {
    /// More than half of the living passed.
    PassMajority,
    /// Nobody reached a strict majority.
    NoMajority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayVerdict {
    Incomplete { missing: usize },
    NoElimination { pass_count: usize, reason: NoEliminationReason },
    Eliminate { target: PlayerId, votes: usize },
}

/// Tally the day's ballots. A ballot is a `day_vote` row; a null target is
/// a pass. Only ballots cast by living players count.
pub fn tally(roster: &Roster, log: &PhaseLog<'_>) -> DayVerdict {
    let alive = roster.alive_count();
    let ballots: Vec<_> = log
        .of_type(ActionType::DayVote)
        .filter(|a| a.actor.is_some_and(|id| roster.is_alive(id)))
        .collect();

    if ballots.len() < alive {
        return DayVerdict::Incomplete {
            missing: alive - ballots.len(),
        };
    }

    let real_votes: Vec<PlayerId> = ballots
        .iter()
        .filter_map(|a| a.target)
        .filter(|&t| roster.is_alive(t))
        .collect();
    let pass_count = ballots.len() - real_votes.len();

    if pass_count > alive / 2 {
        return DayVerdict::NoElimination {
            pass_count,
            reason: NoEliminationReason::PassMajority,
        };
    }

    match strict_majority(real_votes, alive) {
        Some((target, votes)) => DayVerdict::Eliminate { target, votes },
        None => DayVerdict::NoElimination {
            pass_count,
            reason: NoEliminationReason::NoMajority,
        },
    }
}

/// Hunters who died this round and still owe their shot, in id order.
/// Nobody owes a shot once there is no one left alive to aim at.
pub fn pending_hunters(roster: &Roster, round: i32, shooters: &[PlayerId]) -> Vec<PlayerId> {
    if roster.alive_count() == 0 {
        return Vec::new();
    }
    roster
        .participants()
        .filter(|p| {
            p.has_role(RoleKind::Hunter)
                && !p.alive
                && p.died_round == Some(round)
                && !shooters.contains(&p.player_id)
        })
        .map(|p| p.player_id)
        .collect()
}
