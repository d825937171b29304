//! Outbound notifications to connected players.
//!
//! The controller only says *that* something changed; each session renders
//! its own view from the store when told.

/// What connected clients need to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The game moved to `version`; views must be re-rendered.
    Changed { game_id: i64, version: i32 },
    /// A fragment of narration in progress.
    StoryChunk { game_id: i64, text: String },
}

impl GameEvent {
    pub fn game_id(&self) -> i64 {
        match self {
            GameEvent::Changed { game_id, .. } | GameEvent::StoryChunk { game_id, .. } => *game_id,
        }
    }
}

/// Fan-out sink. Implementations must not block: they run right after a
/// commit on the intent's task.
pub trait Broadcaster: Send + Sync {
    fn publish(&self, event: GameEvent);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn publish(&self, _event: GameEvent) {}
}
