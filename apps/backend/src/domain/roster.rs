//! In-memory view of a game's participants.

use std::collections::BTreeMap;

use crate::domain::roles::RoleKind;
use crate::entities::{ActionType, Team};

pub type PlayerId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub player_id: PlayerId,
    pub name: String,
    pub role: Option<RoleKind>,
    pub alive: bool,
    pub died_round: Option<i32>,
    pub death_cause: Option<ActionType>,
}

impl Participant {
    pub fn living(player_id: PlayerId, name: impl Into<String>, role: RoleKind) -> Self {
        Self {
            player_id,
            name: name.into(),
            role: Some(role),
            alive: true,
            died_round: None,
            death_cause: None,
        }
    }

    pub fn team(&self) -> Option<Team> {
        self.role.map(RoleKind::team)
    }

    pub fn has_role(&self, kind: RoleKind) -> bool {
        self.role == Some(kind)
    }
}

/// A death applied to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub player_id: PlayerId,
    pub cause: ActionType,
}

/// Participants keyed by player id. Iteration order is by id, which keeps
/// every derived list deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    by_id: BTreeMap<PlayerId, Participant>,
}

impl Roster {
    pub fn new(participants: impl IntoIterator<Item = Participant>) -> Self {
        Self {
            by_id: participants
                .into_iter()
                .map(|p| (p.player_id, p))
                .collect(),
        }
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&Participant> {
        self.by_id.get(&player_id)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.by_id.contains_key(&player_id)
    }

    pub fn is_alive(&self, player_id: PlayerId) -> bool {
        self.get(player_id).is_some_and(|p| p.alive)
    }

    pub fn role_of(&self, player_id: PlayerId) -> Option<RoleKind> {
        self.get(player_id).and_then(|p| p.role)
    }

    pub fn team_of(&self, player_id: PlayerId) -> Option<Team> {
        self.role_of(player_id).map(RoleKind::team)
    }

    pub fn name_of(&self, player_id: PlayerId) -> &str {
        self.get(player_id).map_or("someone", |p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.by_id.values()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Participant> {
        self.by_id.values().filter(|p| p.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn alive_on_team(&self, team: Team) -> impl Iterator<Item = &Participant> {
        self.alive().filter(move |p| p.team() == Some(team))
    }

    pub fn alive_with_role(&self, kind: RoleKind) -> impl Iterator<Item = &Participant> {
        self.alive().filter(move |p| p.has_role(kind))
    }

    /// Mark a living player dead. Returns false when the player was already
    /// dead or unknown; the dead are never revived.
    pub fn mark_dead(&mut self, player_id: PlayerId, round: i32, cause: ActionType) -> bool {
        match self.by_id.get_mut(&player_id) {
            Some(p) if p.alive => {
                p.alive = false;
                p.died_round = Some(round);
                p.death_cause = Some(cause);
                true
            }
            _ => false,
        }
    }

    /// `(player_id, alive)` pairs in id order.
    pub fn alive_vector(&self) -> Vec<(PlayerId, bool)> {
        self.by_id.values().map(|p| (p.player_id, p.alive)).collect()
    }
}
