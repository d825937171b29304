//! Night completion gates and resolution.
//!
//! Everything here is a function of the roster, the lover index and the
//! current round's night actions, so the resolver can be re-run at any
//! time with the same answer.

use crate::domain::ledger::{LoverIndex, PhaseLog};
use crate::domain::roles::RoleKind;
use crate::domain::roster::{Death, PlayerId, Roster};
use crate::domain::tally::strict_majority;
use crate::entities::{ActionType, Team};

/// Causes of a Wolf Cub death that earn the pack a second kill.
const CUB_REVENGE_CAUSES: [ActionType; 4] = [
    ActionType::WerewolfKill,
    ActionType::Elimination,
    ActionType::HunterRevenge,
    ActionType::WitchKill,
];

#[derive(Debug, Clone, Copy)]
pub struct NightContext<'a> {
    pub round: i32,
    pub roster: &'a Roster,
    pub log: PhaseLog<'a>,
    pub lovers: &'a LoverIndex,
}

/// First unmet completion gate, reported for logging and views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightGate {
    PackVote,
    PackSecondVote,
    CupidLink,
    RoleAction(RoleKind),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightOutcome {
    pub victim1: Option<PlayerId>,
    pub victim2: Option<PlayerId>,
    /// Newly dead in resolution order: victim1, poison, victim2.
    pub deaths: Vec<Death>,
}

/// A Wolf Cub died last round by pack, vote, Hunter, or poison.
pub fn cub_revenge_active(roster: &Roster, round: i32) -> bool {
    roster.participants().any(|p| {
        p.has_role(RoleKind::WolfCub)
            && !p.alive
            && p.died_round == Some(round - 1)
            && p.death_cause.is_some_and(|c| CUB_REVENGE_CAUSES.contains(&c))
    })
}

fn pack_choice(ctx: &NightContext<'_>, kind: ActionType) -> Option<PlayerId> {
    let pack: Vec<PlayerId> = ctx
        .roster
        .alive_on_team(Team::Werewolf)
        .map(|p| p.player_id)
        .collect();
    let votes = ctx
        .log
        .of_type(kind)
        .filter(|a| a.actor.is_some_and(|id| pack.contains(&id)))
        .filter_map(|a| a.target);
    strict_majority(votes, pack.len()).map(|(target, _)| target)
}

fn pack_has_all_voted(ctx: &NightContext<'_>, kind: ActionType) -> bool {
    ctx.roster
        .alive_on_team(Team::Werewolf)
        .all(|p| ctx.log.has(p.player_id, kind))
}

/// Current majority victims `(victim1, victim2)`. `victim2` is only
/// considered while Wolf Cub revenge is active.
pub fn current_victims(ctx: &NightContext<'_>) -> (Option<PlayerId>, Option<PlayerId>) {
    let victim1 = pack_choice(ctx, ActionType::WerewolfKill);
    let victim2 = if cub_revenge_active(ctx.roster, ctx.round) {
        pack_choice(ctx, ActionType::WerewolfKill2)
    } else {
        None
    };
    (victim1, victim2)
}

pub fn unmet_gate(ctx: &NightContext<'_>) -> Option<NightGate> {
    let pack_alive = ctx.roster.alive_on_team(Team::Werewolf).next().is_some();
    if pack_alive {
        if !pack_has_all_voted(ctx, ActionType::WerewolfKill)
            || pack_choice(ctx, ActionType::WerewolfKill).is_none()
        {
            return Some(NightGate::PackVote);
        }
        if cub_revenge_active(ctx.roster, ctx.round)
            && (!pack_has_all_voted(ctx, ActionType::WerewolfKill2)
                || pack_choice(ctx, ActionType::WerewolfKill2).is_none())
        {
            return Some(NightGate::PackSecondVote);
        }
    }

    if ctx.round == 1
        && ctx.roster.alive_with_role(RoleKind::Cupid).next().is_some()
        && !ctx.lovers.is_linked()
    {
        return Some(NightGate::CupidLink);
    }

    let duties = [
        (RoleKind::Seer, ActionType::SeerInvestigate),
        (RoleKind::Doctor, ActionType::DoctorProtect),
        (RoleKind::Guard, ActionType::GuardProtect),
        (RoleKind::Witch, ActionType::WitchPass),
    ];
    for (role, duty) in duties {
        if ctx
            .roster
            .alive_with_role(role)
            .any(|p| !ctx.log.has(p.player_id, duty))
        {
            return Some(NightGate::RoleAction(role));
        }
    }
    None
}

/// Whether `target` is covered by a Doctor, Guard, or Witch heal tonight.
pub fn is_protected(log: &PhaseLog<'_>, target: PlayerId) -> bool {
    log.targets(ActionType::DoctorProtect, target)
        || log.targets(ActionType::GuardProtect, target)
        || log.targets(ActionType::WitchHeal, target)
}

/// Compute who dies tonight. Callers check [`unmet_gate`] first.
pub fn resolve(ctx: &NightContext<'_>) -> NightOutcome {
    let (victim1, victim2) = current_victims(ctx);
    let mut deaths: Vec<Death> = Vec::new();
    let mut kill = |player_id: PlayerId, cause: ActionType| {
        if ctx.roster.is_alive(player_id) && !deaths.iter().any(|d| d.player_id == player_id) {
            deaths.push(Death { player_id, cause });
        }
    };

    if let Some(v) = victim1.filter(|&v| !is_protected(&ctx.log, v)) {
        kill(v, ActionType::WerewolfKill);
    }
    for poisoned in ctx.log.of_type(ActionType::WitchKill).filter_map(|a| a.target) {
        kill(poisoned, ActionType::WitchKill);
    }
    if let Some(v) = victim2.filter(|&v| !is_protected(&ctx.log, v)) {
        kill(v, ActionType::WerewolfKill2);
    }

    NightOutcome {
        victim1,
        victim2,
        deaths,
    }
}
