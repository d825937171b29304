//! Majority counting shared by the night and day resolvers.

use std::collections::BTreeMap;

use crate::domain::roster::PlayerId;

/// Votes needed to win among `electorate` voters: strictly more than
/// `floor(electorate / 2)`.
pub fn majority_threshold(electorate: usize) -> usize {
    electorate / 2 + 1
}

/// Per-target vote counts, ordered by target id.
pub fn count_votes(votes: impl IntoIterator<Item = PlayerId>) -> BTreeMap<PlayerId, usize> {
    let mut counts = BTreeMap::new();
    for target in votes {
        *counts.entry(target).or_insert(0) += 1;
    }
    counts
}

/// The target holding a strict majority of `electorate`, if any.
///
/// At most one target can clear the threshold, so ties never elect.
pub fn strict_majority(
    votes: impl IntoIterator<Item = PlayerId>,
    electorate: usize,
) -> Option<(PlayerId, usize)> {
    if electorate == 0 {
        return None;
    }
    let needed = majority_threshold(electorate);
    count_votes(votes)
        .into_iter()
        .find(|&(_, count)| count >= needed)
}
