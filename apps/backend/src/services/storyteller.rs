//! Narration of the game so far by an external language model.
//!
//! Narration runs after the intent's transaction commits and outside every
//! game lock. A slow or failing narrator never affects game state: past the
//! deadline the partial text is dropped.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::storyteller::{StorytellerConfig, STORY_DEADLINE};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::{ActionType, GameStatus, Phase, Visibility};
use crate::error::AppError;
use crate::repos::actions::{self as actions_repo, ActionCreate};
use crate::repos::games as games_repo;
use crate::services::broadcaster::GameEvent;
use crate::state::app_state::AppState;

/// Receives text fragments as they are generated.
pub type ChunkSink = Box<dyn FnMut(&str) + Send>;

#[async_trait]
pub trait Storyteller: Send + Sync {
    /// Narrate `history` (public action descriptions, oldest first),
    /// feeding fragments to `on_chunk`. Returns the whole text.
    async fn tell(&self, history: Vec<String>, on_chunk: ChunkSink) -> Result<String, AppError>;

    fn deadline(&self) -> Duration {
        STORY_DEADLINE
    }
}

const SYSTEM_PROMPT: &str = "You are the narrator of a village haunted by werewolves. \
Retell the latest events as a short, atmospheric story of at most three paragraphs. \
Never reveal secret roles.";

/// Streams from an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiStoryteller {
    config: StorytellerConfig,
    http: reqwest::Client,
}

impl OpenAiStoryteller {
    pub fn new(config: StorytellerConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamFrame {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Extract the content fragment of one server-sent-events line. `None` for
/// keep-alives, comments, `[DONE]` and frames without content.
fn parse_sse_line(line: &str) -> Option<String> {
    let data = line.trim().strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    let frame: StreamFrame = serde_json::from_str(data).ok()?;
    frame
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|s| !s.is_empty())
}

/// Splits a byte stream into lines. Bytes are only decoded once a whole line
/// has arrived, so a character split across network chunks stays intact.
#[derive(Debug, Default)]
struct SseLines {
    buf: Vec<u8>,
}

impl SseLines {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(newline) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=newline).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever is left once the stream ends.
    fn finish(self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}

#[async_trait]
impl Storyteller for OpenAiStoryteller {
    async fn tell(
        &self,
        history: Vec<String>,
        mut on_chunk: ChunkSink,
    ) -> Result<String, AppError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "stream": true,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": history.join("\n") }
            ]
        });

        let mut request = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::internal(format!("storyteller request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::internal(format!(
                "storyteller returned {status}: {text}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut lines = SseLines::default();
        let mut story = String::new();
        let mut emit = |line: &str| {
            if let Some(fragment) = parse_sse_line(line) {
                on_chunk(&fragment);
                story.push_str(&fragment);
            }
        };
        while let Some(chunk) = stream.next().await {
            let bytes =
                chunk.map_err(|e| AppError::internal(format!("storyteller stream failed: {e}")))?;
            for line in lines.push(&bytes) {
                emit(&line);
            }
        }
        emit(&lines.finish());

        debug!(length = story.len(), "Story generated");
        Ok(story)
    }

    fn deadline(&self) -> Duration {
        self.config.deadline
    }
}

async fn public_history(state: &AppState, game_id: i64) -> Result<Vec<String>, AppError> {
    let db = require_db(state)?;
    let records = actions_repo::list_by_game(db, game_id).await?;
    Ok(records
        .into_iter()
        .filter(|r| r.visibility == Visibility::Public && r.action_type != ActionType::Story)
        .map(|r| r.description)
        .collect())
}

/// Narrate after a death-producing intent. Returns `None` when no
/// storyteller is configured; the handle lets callers await completion.
pub fn spawn_narration(
    state: AppState,
    game_id: i64,
    death_notices: Vec<String>,
) -> Option<JoinHandle<()>> {
    let teller = state.storyteller()?;
    Some(tokio::spawn(async move {
        if let Err(err) = narrate(&state, teller.as_ref(), game_id, death_notices).await {
            warn!(game_id, error = %err, "Narration dropped");
        }
    }))
}

async fn narrate(
    state: &AppState,
    teller: &dyn Storyteller,
    game_id: i64,
    death_notices: Vec<String>,
) -> Result<(), AppError> {
    let mut history = public_history(state, game_id).await?;
    history.extend(death_notices);

    let broadcaster = state.broadcaster();
    let sink: ChunkSink = Box::new(move |text: &str| {
        broadcaster.publish(GameEvent::StoryChunk {
            game_id,
            text: text.to_string(),
        });
    });

    let deadline = teller.deadline();
    let story = match tokio::time::timeout(deadline, teller.tell(history, sink)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(game_id, deadline_secs = deadline.as_secs(), "Storyteller missed its deadline");
            return Ok(());
        }
    };
    if story.trim().is_empty() {
        return Ok(());
    }

    let (version, finished) = {
        let _guard = state.locks().acquire(game_id).await;
        with_txn(None, state, move |txn| {
            Box::pin(async move {
                let game = games_repo::require_game(txn, game_id).await?;
                let phase = match game.status {
                    GameStatus::Night => Phase::Night,
                    _ => Phase::Day,
                };
                actions_repo::append(
                    txn,
                    ActionCreate {
                        game_id,
                        round: game.round,
                        phase,
                        actor_id: None,
                        action_type: ActionType::Story,
                        target_id: None,
                        visibility: Visibility::Public,
                        description: story,
                    },
                )
                .await?;
                let game = games_repo::touch_game(txn, game_id, game.lock_version).await?;
                Ok((game.lock_version, game.is_finished()))
            })
        })
        .await?
    };
    // The controller already dropped the entry of a finished game; our
    // acquire above brought it back.
    if finished {
        state.locks().forget(game_id);
    }

    info!(game_id, version, "Story recorded");
    state
        .broadcaster()
        .publish(GameEvent::Changed { game_id, version });
    Ok(())
}
