//! Infrastructure layer - database, locking, state management, and error handling.

pub mod db;
pub mod db_errors;
pub mod game_locks;
pub mod state;
