//! Rule invariants over random role compositions and scripted play.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::day::DayVerdict;
use crate::domain::dealing::{deal, role_multiset};
use crate::domain::roles::RoleKind;
use crate::domain::roster::Roster;
use crate::domain::tally::majority_threshold;
use crate::domain::test_gens::{composition, ScriptedGame};
use crate::domain::test_prelude;
use crate::entities::{ActionType, GameStatus, Team};

const MAX_ROUNDS: i32 = 20;

fn assert_no_revival(before: &Roster, after: &Roster) {
    for p in before.participants() {
        if !p.alive {
            assert!(
                !after.is_alive(p.player_id),
                "player {} came back to life",
                p.player_id
            );
        }
    }
}

fn assert_team_bound(roster: &Roster) {
    let w = roster.alive_on_team(Team::Werewolf).count();
    let v = roster.alive_on_team(Team::Villager).count();
    assert!(w + v <= roster.len());
}

fn assert_heartbreaks_linked(game: &ScriptedGame, roster: &Roster) {
    for p in roster.participants() {
        if p.death_cause == Some(ActionType::LoverHeartbreak) {
            let partner = game
                .lovers()
                .partner_of(p.player_id)
                .expect("heartbreak without a lover");
            assert!(!roster.is_alive(partner));
            assert!(!p.alive);
        }
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn dealt_roles_match_configuration(roles in composition(), seed in any::<u64>()) {
        let mut counts: Vec<(RoleKind, i32)> = Vec::new();
        for &r in &roles {
            match counts.iter_mut().find(|(k, _)| *k == r) {
                Some((_, n)) => *n += 1,
                None => counts.push((r, 1)),
            }
        }
        let players: Vec<i64> = (1..=roles.len() as i64).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let dealt = deal(&players, role_multiset(&counts), &mut rng).unwrap();

        let mut got: Vec<RoleKind> = dealt.into_iter().map(|(_, r)| r).collect();
        let mut want = roles.clone();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn scripted_games_respect_invariants(roles in composition(), seed in any::<u64>()) {
        let mut game = ScriptedGame::new(&roles, seed);
        let mut last = game.state();
        prop_assert_eq!(last.status, GameStatus::Night);
        prop_assert_eq!(last.round, 1);

        for round in 1..=MAX_ROUNDS {
            game.play_night(round);
            let after_night = game.state();
            assert_no_revival(&last.roster, &after_night.roster);
            prop_assert_eq!(after_night.round, round);
            prop_assert!(matches!(after_night.status, GameStatus::Day | GameStatus::Finished));
            last = after_night;
            if last.status == GameStatus::Finished {
                break;
            }

            game.settle_hunters(round);
            let before_votes = game.state();
            assert_no_revival(&last.roster, &before_votes.roster);
            last = before_votes;
            if last.status == GameStatus::Finished {
                break;
            }

            let electorate = last.roster.alive_count();
            let verdict = game.play_day(round);
            if let DayVerdict::Eliminate { votes, .. } = verdict {
                prop_assert!(votes >= majority_threshold(electorate));
            }
            game.settle_hunters(round);

            let after_day = game.state();
            assert_no_revival(&last.roster, &after_day.roster);
            assert_team_bound(&after_day.roster);
            assert_heartbreaks_linked(&game, &after_day.roster);
            match after_day.status {
                GameStatus::Finished => break,
                GameStatus::Night => prop_assert_eq!(after_day.round, round + 1),
                other => prop_assert!(false, "unexpected status {:?} after day", other),
            }
            last = after_day;
        }

        let shooters: Vec<i64> = game
            .actions()
            .iter()
            .filter(|a| a.action_type == ActionType::HunterRevenge)
            .filter_map(|a| a.actor)
            .collect();
        let mut unique = shooters.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), shooters.len(), "a Hunter shot twice");
    }

    #[test]
    fn finished_games_have_one_side_wiped(roles in composition(), seed in any::<u64>()) {
        let mut game = ScriptedGame::new(&roles, seed);
        for round in 1..=MAX_ROUNDS {
            game.play_night(round);
            game.settle_hunters(round);
            if game.state().status == GameStatus::Finished {
                break;
            }
            game.play_day(round);
            game.settle_hunters(round);
            if game.state().status == GameStatus::Finished {
                break;
            }
        }
        let end = game.state();
        if end.status == GameStatus::Finished {
            let winner = end.winner.expect("finished game has a winner");
            let loser = match winner {
                Team::Villager => Team::Werewolf,
                Team::Werewolf => Team::Villager,
            };
            prop_assert_eq!(end.roster.alive_on_team(loser).count(), 0);
        }
    }
}
