//! Proptest strategies and a scripted game driver for rule properties.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::day::{pending_hunters, tally, DayVerdict};
use crate::domain::ledger::{LoggedAction, LoverIndex, PhaseLog};
use crate::domain::night::cub_revenge_active;
use crate::domain::replay::{replay, ReplayState};
use crate::domain::roles::RoleKind;
use crate::domain::roster::{Participant, PlayerId, Roster};
use crate::entities::{ActionType, GameStatus, Phase, Team};

pub fn role_kind() -> impl Strategy<Value = RoleKind> {
    prop::sample::select(RoleKind::ALL.to_vec())
}

/// Role compositions of 4 to 15 seats with at least one Werewolf.
pub fn composition() -> impl Strategy<Value = Vec<RoleKind>> {
    prop::collection::vec(role_kind(), 3..=14)
        .prop_flat_map(|rest| {
            let len = rest.len() + 1;
            (Just(rest), 0..len)
        })
        .prop_map(|(mut rest, at)| {
            rest.insert(at, RoleKind::Werewolf);
            rest
        })
}

/// Drives a game through the pure rules by appending plausible intents to
/// an action log and replaying it after every step.
pub struct ScriptedGame {
    rng: ChaCha20Rng,
    initial: Roster,
    lovers: LoverIndex,
    actions: Vec<LoggedAction>,
    shooters: Vec<PlayerId>,
    heal_used: bool,
    poison_used: bool,
}

impl ScriptedGame {
    pub fn new(roles: &[RoleKind], seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let initial = Roster::new(roles.iter().enumerate().map(|(i, &role)| {
            let id = i as PlayerId + 1;
            Participant::living(id, format!("P{id}"), role)
        }));
        let lovers = if roles.contains(&RoleKind::Cupid) {
            let a = rng.random_range(1..=roles.len() as PlayerId);
            let mut b = rng.random_range(1..=roles.len() as PlayerId);
            if a == b {
                b = a % roles.len() as PlayerId + 1;
            }
            LoverIndex::from_rows([(a, b), (b, a)])
        } else {
            LoverIndex::default()
        };
        Self {
            rng,
            initial,
            lovers,
            actions: Vec::new(),
            shooters: Vec::new(),
            heal_used: false,
            poison_used: false,
        }
    }

    pub fn lovers(&self) -> &LoverIndex {
        &self.lovers
    }

    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    pub fn state(&self) -> ReplayState {
        replay(self.initial.clone(), &self.lovers, &self.actions)
    }

    fn push(
        &mut self,
        round: i32,
        phase: Phase,
        actor: PlayerId,
        action_type: ActionType,
        target: Option<PlayerId>,
    ) {
        let id = self.actions.len() as i64 + 1;
        self.actions.push(LoggedAction {
            id,
            round,
            phase,
            actor: Some(actor),
            action_type,
            target,
        });
    }

    fn pick(&mut self, from: &[PlayerId]) -> Option<PlayerId> {
        if from.is_empty() {
            None
        } else {
            Some(from[self.rng.random_range(0..from.len())])
        }
    }

    /// Submit every night action the gates ask for.
    pub fn play_night(&mut self, round: i32) {
        let roster = self.state().roster;
        let wolves: Vec<PlayerId> = roster
            .alive_on_team(Team::Werewolf)
            .map(|p| p.player_id)
            .collect();
        let prey: Vec<PlayerId> = roster
            .alive_on_team(Team::Villager)
            .map(|p| p.player_id)
            .collect();
        let alive: Vec<PlayerId> = roster.alive().map(|p| p.player_id).collect();

        let victim1 = self.pick(&prey);
        for &w in &wolves {
            self.push(round, Phase::Night, w, ActionType::WerewolfKill, victim1);
        }
        if cub_revenge_active(&roster, round) {
            let victim2 = self.pick(&prey);
            for &w in &wolves {
                self.push(round, Phase::Night, w, ActionType::WerewolfKill2, victim2);
            }
        }

        let seats: Vec<(PlayerId, RoleKind)> = roster
            .alive()
            .filter_map(|p| p.role.map(|r| (p.player_id, r)))
            .collect();
        for (me, role) in seats {
            let others: Vec<PlayerId> = alive.iter().copied().filter(|&id| id != me).collect();
            match role {
                RoleKind::Seer => {
                    let t = self.pick(&others);
                    self.push(round, Phase::Night, me, ActionType::SeerInvestigate, t);
                }
                RoleKind::Doctor => {
                    let t = self.pick(&alive);
                    self.push(round, Phase::Night, me, ActionType::DoctorProtect, t);
                }
                RoleKind::Guard => {
                    let t = self.pick(&others);
                    self.push(round, Phase::Night, me, ActionType::GuardProtect, t);
                }
                RoleKind::Witch => {
                    if let Some(v) = victim1.filter(|&v| v != me) {
                        if !self.heal_used && self.rng.random_bool(0.3) {
                            self.heal_used = true;
                            self.push(round, Phase::Night, me, ActionType::WitchHeal, Some(v));
                        }
                    }
                    if !self.poison_used && self.rng.random_bool(0.3) {
                        if let Some(t) = self.pick(&others) {
                            self.poison_used = true;
                            self.push(round, Phase::Night, me, ActionType::WitchKill, Some(t));
                        }
                    }
                    self.push(round, Phase::Night, me, ActionType::WitchPass, None);
                }
                _ => {}
            }
        }
    }

    /// Fire every owed Hunter shot, replaying between shots.
    pub fn settle_hunters(&mut self, round: i32) {
        loop {
            let state = self.state();
            if state.status == GameStatus::Finished {
                return;
            }
            let owed = pending_hunters(&state.roster, round, &self.shooters);
            let Some(&hunter) = owed.first() else {
                return;
            };
            let alive: Vec<PlayerId> = state.roster.alive().map(|p| p.player_id).collect();
            let target = self.pick(&alive);
            self.shooters.push(hunter);
            self.push(round, Phase::Day, hunter, ActionType::HunterRevenge, target);
        }
    }

    /// Everyone alive votes or passes; an elimination is logged on majority.
    /// Returns the verdict.
    pub fn play_day(&mut self, round: i32) -> DayVerdict {
        let roster = self.state().roster;
        let alive: Vec<PlayerId> = roster.alive().map(|p| p.player_id).collect();
        for &me in &alive {
            let ballot = if self.rng.random_bool(0.25) {
                None
            } else {
                let others: Vec<PlayerId> =
                    alive.iter().copied().filter(|&id| id != me).collect();
                self.pick(&others)
            };
            self.push(round, Phase::Day, me, ActionType::DayVote, ballot);
        }

        let day: Vec<LoggedAction> = self
            .actions
            .iter()
            .filter(|a| a.round == round && a.phase == Phase::Day)
            .copied()
            .collect();
        let verdict = tally(&roster, &PhaseLog::new(&day));
        if let DayVerdict::Eliminate { target, .. } = verdict {
            self.push(round, Phase::Day, target, ActionType::Elimination, Some(target));
        }
        verdict
    }
}
