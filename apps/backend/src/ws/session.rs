use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::require_db;
use crate::domain::roster::PlayerId;
use crate::error::AppError;
use crate::protocol::intent::Intent;
use crate::protocol::view::PlayerView;
use crate::services::broadcaster::GameEvent;
use crate::services::{controller, views};
use crate::state::app_state::AppState;
use crate::ws::hub::SessionEvent;
use crate::ws::protocol::ServerMsg;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Start a session for an already identified player.
pub fn upgrade(
    req: &HttpRequest,
    stream: web::Payload,
    player_id: PlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), player_id, app_state);
    ws::start(session, req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    player_id: PlayerId,
    app_state: web::Data<AppState>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(conn_id: Uuid, player_id: PlayerId, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id,
            player_id,
            app_state,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    /// Toast for the sender only. Store failures never leak details.
    fn send_error(ctx: &mut ws::WebsocketContext<Self>, err: &AppError) {
        let (code, message) = err.client_facing();
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code: code.as_str().to_string(),
                message,
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    player_id = actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Render the current game for this player and push it.
    fn push_view(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let app_state = self.app_state.clone();
        let player_id = self.player_id;

        ctx.spawn(
            async move {
                let db = require_db(&app_state)?;
                views::current_view(db, Some(player_id)).await
            }
            .into_actor(self)
            .map(|res: Result<Option<PlayerView>, AppError>, actor, ctx| match res {
                Ok(view) => Self::send_json(ctx, &ServerMsg::View { view }),
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        conn_id = %actor.conn_id,
                        player_id = actor.player_id,
                        "[WS SESSION] view render failed"
                    );
                    ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                    ctx.stop();
                }
            }),
        );
    }

    fn submit(&self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let intent = match Intent::from_json(text) {
            Ok(intent) => intent,
            Err(err) => {
                Self::send_error(ctx, &err.into());
                return;
            }
        };

        let app_state = self.app_state.clone();
        let player_id = self.player_id;
        ctx.spawn(
            async move {
                controller::apply_as(&app_state, player_id, intent)
                    .await
                    .map(|outcome| outcome.report.version)
            }
            .into_actor(self)
            .map(|res, _actor, ctx| {
                // Success is answered by the broadcast view.
                if let Err(err) = res {
                    Self::send_error(ctx, &err);
                }
            }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            player_id = self.player_id,
            "[WS SESSION] started"
        );
        let recipient = ctx.address().recipient::<SessionEvent>();
        self.app_state.sessions().register(self.conn_id, recipient);

        self.start_heartbeat(ctx);
        Self::send_json(
            ctx,
            &ServerMsg::Hello {
                player_id: self.player_id,
            },
        );
        self.push_view(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.app_state.sessions().unregister(self.conn_id);
        info!(
            conn_id = %self.conn_id,
            player_id = self.player_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.submit(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error(
                    ctx,
                    &AppError::invalid(
                        crate::errors::ErrorCode::MalformedIntent,
                        "Binary frames are not supported",
                    ),
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    player_id = self.player_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<SessionEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: SessionEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg.0 {
            GameEvent::Changed { .. } => self.push_view(ctx),
            GameEvent::StoryChunk { game_id, text } => {
                Self::send_json(ctx, &ServerMsg::StoryChunk { game_id, text });
            }
        }
    }
}
