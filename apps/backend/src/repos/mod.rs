//! Repository functions for the domain layer.
//!
//! Repos wrap the SeaORM adapters, convert rows into domain structs and
//! map `DbErr` into `DomainError`.

pub mod actions;
pub mod games;
pub mod lovers;
pub mod memberships;
pub mod players;
pub mod role_configs;
pub mod roles;
