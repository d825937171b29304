use crate::domain::day::{pending_hunters, tally, DayVerdict, NoEliminationReason};
use crate::domain::fixtures::{roster_of, LogBuilder};
use crate::domain::ledger::PhaseLog;
use crate::domain::roles::RoleKind::*;
use crate::entities::ActionType;

#[test]
fn incomplete_until_everyone_votes() {
    let roster = roster_of(&[Werewolf, Villager, Villager]);
    let actions = LogBuilder::new().vote(1, 1, Some(2)).vote(1, 2, None).build();
    assert_eq!(
        tally(&roster, &PhaseLog::new(&actions)),
        DayVerdict::Incomplete { missing: 1 }
    );
}

#[test]
fn strict_majority_eliminates() {
    // 5 alive: 3 votes for 1 is > floor(5/2)
    let roster = roster_of(&[Werewolf, Villager, Villager, Villager, Villager]);
    let actions = LogBuilder::new()
        .vote(1, 1, Some(2))
        .vote(1, 2, Some(1))
        .vote(1, 3, Some(1))
        .vote(1, 4, Some(1))
        .vote(1, 5, None)
        .build();
    assert_eq!(
        tally(&roster, &PhaseLog::new(&actions)),
        DayVerdict::Eliminate { target: 1, votes: 3 }
    );
}

#[test]
fn tie_means_no_elimination() {
    let roster = roster_of(&[Werewolf, Villager, Villager, Villager]);
    let actions = LogBuilder::new()
        .vote(1, 1, Some(2))
        .vote(1, 2, Some(1))
        .vote(1, 3, Some(1))
        .vote(1, 4, Some(2))
        .build();
    assert_eq!(
        tally(&roster, &PhaseLog::new(&actions)),
        DayVerdict::NoElimination {
            pass_count: 0,
            reason: NoEliminationReason::NoMajority
        }
    );
}

#[test]
fn pass_majority_wins_over_votes() {
    // 5 alive, 3 pass: 3 > 2
    let roster = roster_of(&[Werewolf, Villager, Villager, Villager, Villager]);
    let actions = LogBuilder::new()
        .vote(1, 1, Some(2))
        .vote(1, 2, Some(1))
        .vote(1, 3, None)
        .vote(1, 4, None)
        .vote(1, 5, None)
        .build();
    assert_eq!(
        tally(&roster, &PhaseLog::new(&actions)),
        DayVerdict::NoElimination {
            pass_count: 3,
            reason: NoEliminationReason::PassMajority
        }
    );
}

#[test]
fn dead_ballots_do_not_count() {
    let mut roster = roster_of(&[Werewolf, Villager, Villager, Villager]);
    roster.mark_dead(4, 1, ActionType::WerewolfKill);
    let actions = LogBuilder::new()
        .vote(1, 4, Some(1))
        .vote(1, 1, Some(2))
        .vote(1, 2, Some(1))
        .vote(1, 3, Some(1))
        .build();
    assert_eq!(
        tally(&roster, &PhaseLog::new(&actions)),
        DayVerdict::Eliminate { target: 1, votes: 2 }
    );
}

#[test]
fn hunters_owe_a_shot_only_in_their_death_round() {
    let mut roster = roster_of(&[Werewolf, Hunter, Hunter, Villager]);
    roster.mark_dead(2, 1, ActionType::WerewolfKill);
    roster.mark_dead(3, 2, ActionType::Elimination);
    assert_eq!(pending_hunters(&roster, 2, &[]), vec![3]);
    assert!(pending_hunters(&roster, 2, &[3]).is_empty());
    assert_eq!(pending_hunters(&roster, 1, &[]), vec![2]);
}
