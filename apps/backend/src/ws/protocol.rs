use serde::Serialize;

use crate::protocol::view::PlayerView;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// First message on every connection.
    Hello { player_id: i64 },

    /// The viewer's rendering of the current game; `None` before any game
    /// exists.
    View { view: Option<PlayerView> },

    StoryChunk { game_id: i64, text: String },

    /// Rejection of the sender's own intent.
    Error { code: String, message: String },
}
