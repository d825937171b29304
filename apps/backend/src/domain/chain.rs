//! Heartbreak propagation.

use std::collections::VecDeque;

use crate::domain::ledger::LoverIndex;
use crate::domain::roster::{PlayerId, Roster};
use crate::entities::ActionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbreak {
    /// The lover whose death caused this one.
    pub from: PlayerId,
    pub to: PlayerId,
}

/// Kill living partners of `killed` until nothing changes.
///
/// Returns heartbreaks in worklist order so callers can spot Hunters among
/// the victims. Each player dies at most once, so the loop is bounded by
/// the roster size.
pub fn propagate(
    roster: &mut Roster,
    lovers: &LoverIndex,
    killed: &[PlayerId],
    round: i32,
) -> Vec<Heartbreak> {
    let mut queue: VecDeque<PlayerId> = killed.iter().copied().collect();
    let mut broken = Vec::new();
    while let Some(k) = queue.pop_front() {
        let Some(partner) = lovers.partner_of(k) else {
            continue;
        };
        if roster.mark_dead(partner, round, ActionType::LoverHeartbreak) {
            broken.push(Heartbreak { from: k, to: partner });
            queue.push_back(partner);
        }
    }
    broken
}
