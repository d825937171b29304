//! Domain layer: pure game rules, no I/O.

pub mod chain;
pub mod day;
pub mod dealing;
pub mod game_transition;
pub mod ledger;
pub mod night;
pub mod replay;
pub mod roles;
pub mod roster;
pub mod tally;
pub mod win;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_chain;
#[cfg(test)]
mod tests_day;
#[cfg(test)]
mod tests_night;
#[cfg(test)]
mod tests_props_rules;

// Re-exports for ergonomics
pub use ledger::{LoggedAction, LoverIndex, PhaseLog};
pub use roles::{RoleKind, RoleSpec};
pub use roster::{Death, Participant, PlayerId, Roster};
