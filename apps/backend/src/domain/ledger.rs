//! Read-side view of the action log used by the resolvers.

use std::collections::HashMap;

use crate::domain::roster::PlayerId;
use crate::entities::{ActionType, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedAction {
    /// Monotonic ordinal assigned by the store.
    pub id: i64,
    pub round: i32,
    pub phase: Phase,
    pub actor: Option<PlayerId>,
    pub action_type: ActionType,
    pub target: Option<PlayerId>,
}

/// Actions of one `(round, phase)` slice with lookup helpers.
#[derive(Debug, Clone, Copy)]
pub struct PhaseLog<'a> {
    actions: &'a [LoggedAction],
}

impl<'a> PhaseLog<'a> {
    pub fn new(actions: &'a [LoggedAction]) -> Self {
        Self { actions }
    }

    pub fn of_type(&self, action_type: ActionType) -> impl Iterator<Item = &'a LoggedAction> {
        self.actions
            .iter()
            .filter(move |a| a.action_type == action_type)
    }

    /// The action `actor` submitted of the given type, if any.
    pub fn by(&self, actor: PlayerId, action_type: ActionType) -> Option<&'a LoggedAction> {
        self.of_type(action_type).find(|a| a.actor == Some(actor))
    }

    pub fn has(&self, actor: PlayerId, action_type: ActionType) -> bool {
        self.by(actor, action_type).is_some()
    }

    /// Whether any action of the given type targets `target`.
    pub fn targets(&self, action_type: ActionType, target: PlayerId) -> bool {
        self.of_type(action_type).any(|a| a.target == Some(target))
    }
}

/// Lover partner lookup, O(1) per query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoverIndex {
    partner: HashMap<PlayerId, PlayerId>,
}

impl LoverIndex {
    /// Build from stored rows; each row is one direction of a pair.
    pub fn from_rows(rows: impl IntoIterator<Item = (PlayerId, PlayerId)>) -> Self {
        let mut partner = HashMap::new();
        for (a, b) in rows {
            partner.insert(a, b);
            partner.insert(b, a);
        }
        Self { partner }
    }

    pub fn partner_of(&self, player_id: PlayerId) -> Option<PlayerId> {
        self.partner.get(&player_id).copied()
    }

    pub fn is_linked(&self) -> bool {
        !self.partner.is_empty()
    }

    /// The pair with the smaller id first.
    pub fn pair(&self) -> Option<(PlayerId, PlayerId)> {
        self.partner
            .iter()
            .map(|(&a, &b)| (a.min(b), a.max(b)))
            .min()
    }
}
