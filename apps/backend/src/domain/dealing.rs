//! Role dealing: multiset construction and a CSPRNG-driven Fisher-Yates shuffle.

use rand::{CryptoRng, Rng};

use crate::domain::roster::PlayerId;
use crate::errors::domain::{DomainError, ValidationKind};

/// Check the start preconditions: at least one player, no negative counts,
/// and exactly one role per player.
pub fn validate_start(player_count: usize, counts: &[(i64, i32)]) -> Result<(), DomainError> {
    if player_count == 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidStart,
            "No players in the lobby",
        ));
    }
    if let Some((role_id, count)) = counts.iter().find(|(_, c)| *c < 0) {
        return Err(DomainError::validation(
            ValidationKind::InvalidStart,
            format!("Role {role_id} has negative count {count}"),
        ));
    }
    let total: i64 = counts.iter().map(|(_, c)| i64::from(*c)).sum();
    if total != player_count as i64 {
        return Err(DomainError::validation(
            ValidationKind::InvalidStart,
            format!("Configured {total} roles for {player_count} players"),
        ));
    }
    Ok(())
}

/// Expand `(role, count)` pairs into one entry per seat, in input order.
pub fn role_multiset<T: Copy>(counts: &[(T, i32)]) -> Vec<T> {
    counts
        .iter()
        .flat_map(|&(role, count)| std::iter::repeat(role).take(count.max(0) as usize))
        .collect()
}

/// Fisher-Yates shuffle. Only accepts cryptographically strong generators.
pub fn shuffle<T, R: CryptoRng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffle `roles` and hand them out in player-list order.
pub fn deal<T, R: CryptoRng + ?Sized>(
    players: &[PlayerId],
    mut roles: Vec<T>,
    rng: &mut R,
) -> Result<Vec<(PlayerId, T)>, DomainError> {
    if players.len() != roles.len() {
        return Err(DomainError::validation(
            ValidationKind::InvalidStart,
            format!(
                "Cannot deal {} roles to {} players",
                roles.len(),
                players.len()
            ),
        ));
    }
    shuffle(&mut roles, rng);
    Ok(players.iter().copied().zip(roles).collect())
}
