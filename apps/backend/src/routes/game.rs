//! Game HTTP routes: intent submission and per-player views.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentPlayer, ValidatedJson};
use crate::protocol::intent::{Intent, IntentMessage};
use crate::protocol::view::PlayerView;
use crate::services::{controller, views};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct IntentResponse {
    version: i32,
    view: PlayerView,
}

/// Only rule rejections reach the client verbatim.
fn for_client(err: AppError) -> AppError {
    if err.code().is_intent_rejection() {
        return err;
    }
    let (code, detail) = err.client_facing();
    AppError::invalid(code, detail)
}

/// POST /api/game/intents
async fn submit_intent(
    player: CurrentPlayer,
    body: ValidatedJson<IntentMessage>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let intent = Intent::parse(&body)?;
    let outcome = controller::apply_as(&app_state, player.id, intent)
        .await
        .map_err(for_client)?;

    let db = require_db(&app_state)?;
    let view = views::player_view(db, outcome.report.game_id, Some(player.id)).await?;
    Ok(HttpResponse::Ok().json(IntentResponse {
        version: outcome.report.version,
        view,
    }))
}

/// GET /api/game/view
async fn get_view(
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let view = views::current_view(db, Some(player.id))
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::GameNotFound, "No game has been created"))?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/intents", web::post().to(submit_intent))
        .route("/view", web::get().to(get_view));
}
