use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::game_locks::GameLocks;
use crate::services::broadcaster::Broadcaster;
use crate::services::storyteller::Storyteller;
use crate::ws::hub::SessionRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Per-game critical sections
    locks: GameLocks,
    /// Live websocket sessions
    sessions: Arc<SessionRegistry>,
    /// Receives a tick after every committed intent
    broadcaster: Arc<dyn Broadcaster>,
    /// Narrator; `None` disables stories
    storyteller: Option<Arc<dyn Storyteller>>,
}

impl AppState {
    /// Create a new AppState with the given database connection.
    /// Broadcasts go to the websocket session registry.
    pub fn new(db: DatabaseConnection) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        Self {
            db: Some(db),
            locks: GameLocks::new(),
            broadcaster: sessions.clone(),
            sessions,
            storyteller: None,
        }
    }

    /// Create a new AppState without a database connection (for testing)
    pub fn without_db() -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        Self {
            db: None,
            locks: GameLocks::new(),
            broadcaster: sessions.clone(),
            sessions,
            storyteller: None,
        }
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_storyteller(mut self, storyteller: Arc<dyn Storyteller>) -> Self {
        self.storyteller = Some(storyteller);
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn locks(&self) -> &GameLocks {
        &self.locks
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        self.sessions.clone()
    }

    pub fn broadcaster(&self) -> Arc<dyn Broadcaster> {
        self.broadcaster.clone()
    }

    pub fn storyteller(&self) -> Option<Arc<dyn Storyteller>> {
        self.storyteller.clone()
    }
}
