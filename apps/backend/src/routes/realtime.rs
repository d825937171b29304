use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::current_player::identity_from_headers;
use crate::services::controller::{self, PlayerIdentity};
use crate::state::app_state::AppState;
use crate::ws::session;

/// Browsers cannot set headers on a websocket handshake, so the identity
/// may also come from the query string.
#[derive(Debug, Deserialize)]
struct WsParams {
    player_id: Option<String>,
    name: Option<String>,
}

fn identity(req: &HttpRequest, params: WsParams) -> Result<PlayerIdentity, AppError> {
    match params.player_id.filter(|id| !id.trim().is_empty()) {
        Some(external_id) => Ok(PlayerIdentity {
            external_id: external_id.trim().to_string(),
            display_name: params.name.filter(|n| !n.trim().is_empty()),
        }),
        None => identity_from_headers(req),
    }
}

/// GET /api/ws
async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    params: web::Query<WsParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let identity = identity(&req, params.into_inner())?;
    let player = controller::identify(&app_state, &identity).await?;
    session::upgrade(&req, stream, player.id, app_state)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(upgrade));
}
