//! Unique identities so tests sharing a process never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("wolf");
/// assert_ne!(a, unique_str("wolf"));
/// assert!(a.starts_with("wolf-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// External ids for `n` fresh players, in order.
pub fn unique_players(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| unique_str(&format!("{prefix}{i}"))).collect()
}
