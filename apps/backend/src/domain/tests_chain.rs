use crate::domain::chain::{propagate, Heartbreak};
use crate::domain::fixtures::roster_of;
use crate::domain::ledger::LoverIndex;
use crate::domain::roles::RoleKind::*;
use crate::entities::ActionType;

#[test]
fn partner_follows_into_death() {
    let mut roster = roster_of(&[Werewolf, Villager, Hunter, Villager]);
    let lovers = LoverIndex::from_rows([(2, 3), (3, 2)]);
    roster.mark_dead(2, 1, ActionType::WerewolfKill);

    let broken = propagate(&mut roster, &lovers, &[2], 1);
    assert_eq!(broken, vec![Heartbreak { from: 2, to: 3 }]);
    let hunter = roster.get(3).unwrap();
    assert!(!hunter.alive);
    assert_eq!(hunter.death_cause, Some(ActionType::LoverHeartbreak));
}

#[test]
fn both_lovers_dying_together_breaks_no_heart() {
    let mut roster = roster_of(&[Werewolf, Villager, Villager, Villager]);
    let lovers = LoverIndex::from_rows([(2, 3)]);
    roster.mark_dead(2, 1, ActionType::WerewolfKill);
    roster.mark_dead(3, 1, ActionType::WitchKill);

    assert!(propagate(&mut roster, &lovers, &[2, 3], 1).is_empty());
    assert_eq!(
        roster.get(3).unwrap().death_cause,
        Some(ActionType::WitchKill)
    );
}

#[test]
fn unlinked_deaths_do_nothing() {
    let mut roster = roster_of(&[Werewolf, Villager, Villager]);
    roster.mark_dead(2, 1, ActionType::Elimination);
    let before = roster.clone();
    assert!(propagate(&mut roster, &LoverIndex::default(), &[2], 1).is_empty());
    assert_eq!(roster, before);
}
