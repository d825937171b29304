//! Per-game mutual exclusion.
//!
//! Every intent for a game runs its whole cascade while holding that game's
//! lock, so resolvers never observe a half-applied sibling intent.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Key used while deciding which game is current (and creating one).
pub const LOBBY_KEY: i64 = 0;

#[derive(Debug, Default, Clone)]
pub struct GameLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `game_id`.
    pub async fn acquire(&self, game_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock entry of a finished game once nobody holds it.
    pub fn forget(&self, game_id: i64) {
        self.locks
            .remove_if(&game_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn is_tracked(&self, game_id: i64) -> bool {
        self.locks.contains_key(&game_id)
    }
}
