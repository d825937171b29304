//! Adapters for external dependencies.

pub mod actions_sea;
pub mod games_sea;
pub mod lovers_sea;
pub mod memberships_sea;
pub mod players_sea;
pub mod role_configs_sea;
pub mod roles_sea;
