use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::services::broadcaster::{Broadcaster, GameEvent};

/// Delivered to every live session.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct SessionEvent(pub GameEvent);

/// Live websocket sessions keyed by connection id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Recipient<SessionEvent>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, conn_id: Uuid, recipient: Recipient<SessionEvent>) {
        self.sessions.insert(conn_id, recipient);
    }

    pub fn unregister(&self, conn_id: Uuid) {
        self.sessions.remove(&conn_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Broadcaster for SessionRegistry {
    fn publish(&self, event: GameEvent) {
        debug!(game_id = event.game_id(), sessions = self.sessions.len(), "Broadcasting");
        for entry in self.sessions.iter() {
            entry.value().do_send(SessionEvent(event.clone()));
        }
    }
}
