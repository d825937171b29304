//! Intent messages: `{ "action", "role_id"?, "delta"?, "target_player_id"? }`.

use serde::Deserialize;

use crate::domain::roles::RoleKind;
use crate::domain::roster::PlayerId;
use crate::errors::domain::{DomainError, ValidationKind};

/// A field that clients send either as a JSON string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().trim_start_matches('+').parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntentMessage {
    pub action: String,
    #[serde(default)]
    pub role_id: Option<Scalar>,
    #[serde(default)]
    pub delta: Option<Scalar>,
    #[serde(default)]
    pub target_player_id: Option<Scalar>,
}

/// A parsed player intent. Targets stay optional here: a missing target is
/// an `InvalidTarget` decided by the rules, not a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    JoinLobby,
    LeaveLobby,
    SetRoleCount { role: RoleKind, delta: i32 },
    StartGame,
    WerewolfVote { target: Option<PlayerId> },
    WerewolfVote2 { target: Option<PlayerId> },
    SeerInvestigate { target: Option<PlayerId> },
    DoctorProtect { target: Option<PlayerId> },
    GuardProtect { target: Option<PlayerId> },
    WitchHeal { target: Option<PlayerId> },
    WitchKill { target: Option<PlayerId> },
    WitchPass,
    CupidChoose { target: Option<PlayerId> },
    DayVote { target: Option<PlayerId> },
    DayPass,
    DayEndVote,
    HunterRevenge { target: Option<PlayerId> },
}

fn malformed(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::MalformedIntent, detail)
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::JoinLobby => "join_lobby",
            Intent::LeaveLobby => "leave_lobby",
            Intent::SetRoleCount { .. } => "set_role_count",
            Intent::StartGame => "start_game",
            Intent::WerewolfVote { .. } => "werewolf_vote",
            Intent::WerewolfVote2 { .. } => "werewolf_vote2",
            Intent::SeerInvestigate { .. } => "seer_investigate",
            Intent::DoctorProtect { .. } => "doctor_protect",
            Intent::GuardProtect { .. } => "guard_protect",
            Intent::WitchHeal { .. } => "witch_heal",
            Intent::WitchKill { .. } => "witch_kill",
            Intent::WitchPass => "witch_pass",
            Intent::CupidChoose { .. } => "cupid_choose",
            Intent::DayVote { .. } => "day_vote",
            Intent::DayPass => "day_pass",
            Intent::DayEndVote => "day_end_vote",
            Intent::HunterRevenge { .. } => "hunter_revenge",
        }
    }

    /// Lobby intents may create a fresh game when none is open.
    pub fn is_lobby(&self) -> bool {
        matches!(
            self,
            Intent::JoinLobby
                | Intent::LeaveLobby
                | Intent::SetRoleCount { .. }
                | Intent::StartGame
        )
    }

    pub fn parse(msg: &IntentMessage) -> Result<Self, DomainError> {
        let target = match &msg.target_player_id {
            None => None,
            Some(raw) => Some(
                raw.as_i64()
                    .ok_or_else(|| malformed("target_player_id must be a player id"))?,
            ),
        };

        let intent = match msg.action.trim() {
            "join_lobby" => Intent::JoinLobby,
            "leave_lobby" => Intent::LeaveLobby,
            "set_role_count" => {
                let role = match &msg.role_id {
                    Some(Scalar::Number(id)) => RoleKind::from_id(*id),
                    Some(Scalar::Text(text)) => text
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(RoleKind::from_id)
                        .or_else(|| RoleKind::from_name(text)),
                    None => None,
                }
                .ok_or_else(|| malformed("role_id does not name a role"))?;
                let delta = msg
                    .delta
                    .as_ref()
                    .and_then(Scalar::as_i64)
                    .filter(|d| *d == 1 || *d == -1)
                    .ok_or_else(|| malformed("delta must be 1 or -1"))?;
                Intent::SetRoleCount {
                    role,
                    delta: delta as i32,
                }
            }
            "start_game" => Intent::StartGame,
            "werewolf_vote" => Intent::WerewolfVote { target },
            "werewolf_vote2" => Intent::WerewolfVote2 { target },
            "seer_investigate" => Intent::SeerInvestigate { target },
            "doctor_protect" => Intent::DoctorProtect { target },
            "guard_protect" => Intent::GuardProtect { target },
            "witch_heal" => Intent::WitchHeal { target },
            "witch_kill" => Intent::WitchKill { target },
            "witch_pass" => Intent::WitchPass,
            "cupid_choose" => Intent::CupidChoose { target },
            "day_vote" => Intent::DayVote { target },
            "day_pass" => Intent::DayPass,
            "day_end_vote" => Intent::DayEndVote,
            "hunter_revenge" => Intent::HunterRevenge { target },
            other => return Err(malformed(format!("Unknown action '{other}'"))),
        };
        Ok(intent)
    }

    /// Parse raw JSON text, as received on the websocket.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let msg: IntentMessage =
            serde_json::from_str(text).map_err(|e| malformed(format!("Invalid intent: {e}")))?;
        Self::parse(&msg)
    }
}
