use crate::domain::roster::Roster;
use crate::entities::Team;

/// Victory check after a batch of deaths.
///
/// The villager check runs first; lovers on opposite teams are not a
/// faction of their own.
pub fn evaluate(roster: &Roster) -> Option<Team> {
    let werewolves = roster.alive_on_team(Team::Werewolf).count();
    let villagers = roster.alive_on_team(Team::Villager).count();
    if werewolves == 0 {
        Some(Team::Villager)
    } else if villagers == 0 {
        Some(Team::Werewolf)
    } else {
        None
    }
}
