//! Shared helpers for the moonrise backend test suites: quiet logging,
//! problem-details assertions and unique test identities.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
