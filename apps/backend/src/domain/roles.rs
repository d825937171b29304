//! Static role catalogue.
//!
//! Roles are data: each entry names its team and the night actions it may
//! submit. Adding a role means adding a row here and a gate in the night
//! resolver, not branching throughout the controller.

use serde::{Deserialize, Serialize};

use crate::entities::{ActionType, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleKind {
    Villager,
    Werewolf,
    Seer,
    Doctor,
    Witch,
    Hunter,
    Cupid,
    Guard,
    Mason,
    WolfCub,
}

/// One catalogue row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub kind: RoleKind,
    pub name: &'static str,
    pub team: Team,
    /// Actions this role may submit while alive during the night.
    pub night_actions: &'static [ActionType],
    pub summary: &'static str,
}

const PACK_ACTIONS: &[ActionType] = &[ActionType::WerewolfKill, ActionType::WerewolfKill2];

static CATALOGUE: [RoleSpec; 10] = [
    RoleSpec {
        kind: RoleKind::Villager,
        name: "Villager",
        team: Team::Villager,
        night_actions: &[],
        summary: "Votes during the day.",
    },
    RoleSpec {
        kind: RoleKind::Werewolf,
        name: "Werewolf",
        team: Team::Werewolf,
        night_actions: PACK_ACTIONS,
        summary: "Chooses a victim with the pack each night.",
    },
    RoleSpec {
        kind: RoleKind::Seer,
        name: "Seer",
        team: Team::Villager,
        night_actions: &[ActionType::SeerInvestigate],
        summary: "Learns the team of one player each night.",
    },
    RoleSpec {
        kind: RoleKind::Doctor,
        name: "Doctor",
        team: Team::Villager,
        night_actions: &[ActionType::DoctorProtect],
        summary: "Protects one player each night, possibly themself.",
    },
    RoleSpec {
        kind: RoleKind::Witch,
        name: "Witch",
        team: Team::Villager,
        night_actions: &[ActionType::WitchHeal, ActionType::WitchKill, ActionType::WitchPass],
        summary: "Holds one healing potion and one poison; ends each night with a pass.",
    },
    RoleSpec {
        kind: RoleKind::Hunter,
        name: "Hunter",
        team: Team::Villager,
        night_actions: &[],
        summary: "Takes one player down with them upon death.",
    },
    RoleSpec {
        kind: RoleKind::Cupid,
        name: "Cupid",
        team: Team::Villager,
        night_actions: &[ActionType::CupidLink],
        summary: "Binds two lovers on the first night.",
    },
    RoleSpec {
        kind: RoleKind::Guard,
        name: "Guard",
        team: Team::Villager,
        night_actions: &[ActionType::GuardProtect],
        summary: "Protects another player, never the same one two nights running.",
    },
    RoleSpec {
        kind: RoleKind::Mason,
        name: "Mason",
        team: Team::Villager,
        night_actions: &[],
        summary: "Knows the other Masons.",
    },
    RoleSpec {
        kind: RoleKind::WolfCub,
        name: "Wolf Cub",
        team: Team::Werewolf,
        night_actions: PACK_ACTIONS,
        summary: "Hunts with the pack; its death grants a second kill the next night.",
    },
];

impl RoleKind {
    pub const ALL: [RoleKind; 10] = [
        RoleKind::Villager,
        RoleKind::Werewolf,
        RoleKind::Seer,
        RoleKind::Doctor,
        RoleKind::Witch,
        RoleKind::Hunter,
        RoleKind::Cupid,
        RoleKind::Guard,
        RoleKind::Mason,
        RoleKind::WolfCub,
    ];

    pub fn spec(self) -> &'static RoleSpec {
        // Catalogue order matches `ALL`.
        &CATALOGUE[self as usize]
    }

    /// Stable catalogue id, shared with the seeded `roles` table.
    pub fn id(self) -> i64 {
        self as i64 + 1
    }

    pub fn from_id(id: i64) -> Option<Self> {
        usize::try_from(id - 1)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn team(self) -> Team {
        self.spec().team
    }

    pub fn from_name(name: &str) -> Option<Self> {
        CATALOGUE
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name.trim()))
            .map(|spec| spec.kind)
    }

    /// Whether this role may submit `action` during the night.
    pub fn permits(self, action: ActionType) -> bool {
        self.spec().night_actions.contains(&action)
    }

    pub fn is_werewolf(self) -> bool {
        self.team() == Team::Werewolf
    }
}

pub fn catalogue() -> &'static [RoleSpec] {
    &CATALOGUE
}
