use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::Serialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::controller::{self, PlayerIdentity};
use crate::state::app_state::AppState;

pub const PLAYER_ID_HEADER: &str = "x-player-id";
pub const PLAYER_NAME_HEADER: &str = "x-player-name";

const MAX_HEADER_LEN: usize = 128;

/// The registered player behind the identity headers.
///
/// The first request from an unknown external id registers the player;
/// a supplied `X-Player-Name` renames them.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPlayer {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
}

fn header(req: &HttpRequest, name: &str) -> Result<Option<String>, AppError> {
    let Some(value) = req.headers().get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidHeader, format!("{name} must be ASCII")))?
        .trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.len() > MAX_HEADER_LEN {
        return Err(AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("{name} is longer than {MAX_HEADER_LEN} characters"),
        ));
    }
    Ok(Some(value.to_string()))
}

/// Parse the identity headers without touching the store.
pub fn identity_from_headers(req: &HttpRequest) -> Result<PlayerIdentity, AppError> {
    let external_id = header(req, PLAYER_ID_HEADER)?.ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidHeader, "Missing X-Player-Id header")
    })?;
    Ok(PlayerIdentity {
        external_id,
        display_name: header(req, PLAYER_NAME_HEADER)?,
    })
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let identity = identity_from_headers(&req)?;
            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState missing from request"))?;

            let player = controller::identify(app_state, &identity).await?;
            Ok(CurrentPlayer {
                id: player.id,
                external_id: player.external_id,
                display_name: player.display_name,
            })
        })
    }
}
