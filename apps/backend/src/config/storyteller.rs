use std::env;
use std::time::Duration;

/// Hard deadline for one narrative generation.
pub const STORY_DEADLINE: Duration = Duration::from_secs(30);

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StorytellerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub deadline: Duration,
}

impl StorytellerConfig {
    /// Read `MOONRISE_STORYTELLER_*` variables. Returns `None` when no
    /// endpoint is configured, which disables narration.
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("MOONRISE_STORYTELLER_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())?;
        let api_key = env::var("MOONRISE_STORYTELLER_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        let model = env::var("MOONRISE_STORYTELLER_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Some(Self {
            base_url,
            api_key,
            model,
            deadline: STORY_DEADLINE,
        })
    }
}
