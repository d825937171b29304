use crate::domain::fixtures::{roster_of, LogBuilder};
use crate::domain::ledger::{LoverIndex, PhaseLog};
use crate::domain::night::{cub_revenge_active, current_victims, resolve, unmet_gate, NightContext, NightGate};
use crate::domain::roles::RoleKind::*;
use crate::domain::roster::Death;
use crate::entities::ActionType;

fn ctx<'a>(
    round: i32,
    roster: &'a crate::domain::Roster,
    actions: &'a [crate::domain::LoggedAction],
    lovers: &'a LoverIndex,
) -> NightContext<'a> {
    NightContext {
        round,
        roster,
        log: PhaseLog::new(actions),
        lovers,
    }
}

#[test]
fn pack_must_agree_before_dawn() {
    // 1,2 wolves; 3,4 villagers
    let roster = roster_of(&[Werewolf, Werewolf, Villager, Villager]);
    let lovers = LoverIndex::default();

    let split = LogBuilder::new()
        .night(1, 1, ActionType::WerewolfKill, 3)
        .night(1, 2, ActionType::WerewolfKill, 4)
        .build();
    assert_eq!(unmet_gate(&ctx(1, &roster, &split, &lovers)), Some(NightGate::PackVote));

    let agreed = LogBuilder::new()
        .night(1, 1, ActionType::WerewolfKill, 3)
        .night(1, 2, ActionType::WerewolfKill, 3)
        .build();
    let c = ctx(1, &roster, &agreed, &lovers);
    assert_eq!(unmet_gate(&c), None);
    assert_eq!(
        resolve(&c).deaths,
        vec![Death {
            player_id: 3,
            cause: ActionType::WerewolfKill
        }]
    );
}

#[test]
fn every_power_role_gates_the_night() {
    // 1 wolf, 2 seer, 3 doctor, 4 guard, 5 witch, 6 villager
    let roster = roster_of(&[Werewolf, Seer, Doctor, Guard, Witch, Villager]);
    let lovers = LoverIndex::default();
    let mut log = LogBuilder::new().night(1, 1, ActionType::WerewolfKill, 6);
    assert_eq!(
        unmet_gate(&ctx(1, &roster, &log.build(), &lovers)),
        Some(NightGate::RoleAction(Seer))
    );

    log = LogBuilder::new()
        .night(1, 1, ActionType::WerewolfKill, 6)
        .night(1, 2, ActionType::SeerInvestigate, 1)
        .night(1, 3, ActionType::DoctorProtect, 3)
        .night(1, 4, ActionType::GuardProtect, 2);
    assert_eq!(
        unmet_gate(&ctx(1, &roster, &log.build(), &lovers)),
        Some(NightGate::RoleAction(Witch))
    );

    let done = LogBuilder::new()
        .night(1, 1, ActionType::WerewolfKill, 6)
        .night(1, 2, ActionType::SeerInvestigate, 1)
        .night(1, 3, ActionType::DoctorProtect, 3)
        .night(1, 4, ActionType::GuardProtect, 2)
        .witch_pass(1, 5)
        .build();
    assert_eq!(unmet_gate(&ctx(1, &roster, &done, &lovers)), None);
}

#[test]
fn cupid_gate_only_on_first_night() {
    let roster = roster_of(&[Werewolf, Cupid, Villager, Villager]);
    let none = LoverIndex::default();
    let actions = LogBuilder::new()
        .night(1, 1, ActionType::WerewolfKill, 3)
        .build();
    assert_eq!(unmet_gate(&ctx(1, &roster, &actions, &none)), Some(NightGate::CupidLink));

    let linked = LoverIndex::from_rows([(3, 4)]);
    assert_eq!(unmet_gate(&ctx(1, &roster, &actions, &linked)), None);

    let later = LogBuilder::new()
        .night(2, 1, ActionType::WerewolfKill, 3)
        .build();
    assert_eq!(unmet_gate(&ctx(2, &roster, &later, &none)), None);
}

#[test]
fn any_protection_spares_victim_one() {
    for protection in [
        ActionType::DoctorProtect,
        ActionType::GuardProtect,
        ActionType::WitchHeal,
    ] {
        let roster = roster_of(&[Werewolf, Villager, Villager, Villager]);
        let lovers = LoverIndex::default();
        let actions = LogBuilder::new()
            .night(1, 1, ActionType::WerewolfKill, 2)
            .night(1, 3, protection, 2)
            .build();
        let outcome = resolve(&ctx(1, &roster, &actions, &lovers));
        assert_eq!(outcome.victim1, Some(2));
        assert!(outcome.deaths.is_empty(), "{protection:?} should spare");
    }
}

#[test]
fn poison_ignores_protection() {
    let roster = roster_of(&[Werewolf, Witch, Doctor, Villager, Villager]);
    let lovers = LoverIndex::default();
    let actions = LogBuilder::new()
        .night(1, 1, ActionType::WerewolfKill, 4)
        .night(1, 2, ActionType::WitchHeal, 4)
        .night(1, 2, ActionType::WitchKill, 5)
        .night(1, 3, ActionType::DoctorProtect, 5)
        .witch_pass(1, 2)
        .build();
    let c = ctx(1, &roster, &actions, &lovers);
    assert_eq!(unmet_gate(&c), None);
    assert_eq!(
        resolve(&c).deaths,
        vec![Death {
            player_id: 5,
            cause: ActionType::WitchKill
        }]
    );
}

#[test]
fn wolf_cub_revenge_requires_second_vote() {
    // 1 wolf, 2 cub (already dead by vote last round), 3,4,5 villagers
    let mut roster = roster_of(&[Werewolf, WolfCub, Villager, Villager, Villager]);
    roster.mark_dead(2, 1, ActionType::Elimination);
    assert!(cub_revenge_active(&roster, 2));
    assert!(!cub_revenge_active(&roster, 3));

    let lovers = LoverIndex::default();
    let first_only = LogBuilder::new()
        .night(2, 1, ActionType::WerewolfKill, 3)
        .build();
    assert_eq!(
        unmet_gate(&ctx(2, &roster, &first_only, &lovers)),
        Some(NightGate::PackSecondVote)
    );

    let both = LogBuilder::new()
        .night(2, 1, ActionType::WerewolfKill, 3)
        .night(2, 1, ActionType::WerewolfKill2, 4)
        .build();
    let c = ctx(2, &roster, &both, &lovers);
    assert_eq!(current_victims(&c), (Some(3), Some(4)));
    let dead: Vec<i64> = resolve(&c).deaths.iter().map(|d| d.player_id).collect();
    assert_eq!(dead, vec![3, 4]);
}

#[test]
fn cub_heartbreak_does_not_trigger_revenge() {
    let mut roster = roster_of(&[Werewolf, WolfCub, Villager, Villager]);
    roster.mark_dead(2, 1, ActionType::LoverHeartbreak);
    assert!(!cub_revenge_active(&roster, 2));
}

#[test]
fn votes_of_dead_wolves_are_ignored() {
    let mut roster = roster_of(&[Werewolf, Werewolf, Villager, Villager, Villager]);
    roster.mark_dead(2, 1, ActionType::Elimination);
    let lovers = LoverIndex::default();
    let actions = LogBuilder::new()
        .night(2, 1, ActionType::WerewolfKill, 3)
        .night(2, 2, ActionType::WerewolfKill, 4)
        .build();
    assert_eq!(current_victims(&ctx(2, &roster, &actions, &lovers)).0, Some(3));
}
