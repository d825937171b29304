use std::sync::Arc;

use crate::config::db::DbProfile;
use crate::config::storyteller::StorytellerConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::roles;
use crate::services::broadcaster::Broadcaster;
use crate::services::storyteller::{OpenAiStoryteller, Storyteller};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
#[derive(Default)]
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    broadcaster: Option<Arc<dyn Broadcaster>>,
    storyteller: Option<Arc<dyn Storyteller>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Replace the websocket registry as the broadcast sink.
    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn with_storyteller(mut self, storyteller: Arc<dyn Storyteller>) -> Self {
        self.storyteller = Some(storyteller);
        self
    }

    /// Configure the OpenAI-compatible storyteller when the environment
    /// names an endpoint; otherwise leave narration off.
    pub fn with_storyteller_from_env(self) -> Self {
        match StorytellerConfig::from_env() {
            Some(config) => self.with_storyteller(Arc::new(OpenAiStoryteller::new(config))),
            None => self,
        }
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let mut state = match self.db_profile {
            Some(profile) => {
                // single entrypoint: connect + migrate, then check the seeded roles
                let conn = bootstrap_db(profile).await?;
                roles::verify_catalogue(&conn).await?;
                AppState::new(conn)
            }
            None => AppState::without_db(),
        };
        if let Some(broadcaster) = self.broadcaster {
            state = state.with_broadcaster(broadcaster);
        }
        if let Some(storyteller) = self.storyteller {
            state = state.with_storyteller(storyteller);
        }
        Ok(state)
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
