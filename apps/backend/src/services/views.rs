//! Per-player views.
//!
//! Rendering is a pure function of the stored game; the loaders just
//! gather its inputs on any connection.

use sea_orm::ConnectionTrait;

use crate::domain::day::pending_hunters;
use crate::domain::ledger::LoverIndex;
use crate::domain::roles::{catalogue, RoleKind};
use crate::domain::roster::{Participant, PlayerId, Roster};
use crate::entities::{ActionType, GameStatus, Team, Visibility};
use crate::error::AppError;
use crate::protocol::view::{ActionView, PlayerView, RoleCountView, SeatView, SelfView};
use crate::repos::actions::{self as actions_repo, ActionRecord};
use crate::repos::games::{self as games_repo, Game};
use crate::repos::role_configs;
use crate::services::game_flow::FlowContext;

/// One row per catalogue role, unconfigured roles at zero, so a lobby can
/// offer every role with its description.
fn role_count_rows(configured: &[(RoleKind, i32)]) -> Vec<RoleCountView> {
    catalogue()
        .iter()
        .map(|spec| RoleCountView {
            role_id: spec.kind.id(),
            role: spec.name.to_string(),
            summary: spec.summary.to_string(),
            count: configured
                .iter()
                .find(|(kind, _)| *kind == spec.kind)
                .map_or(0, |(_, count)| *count),
        })
        .collect()
}

/// Everything a view is rendered from.
pub struct ViewInputs<'a> {
    pub game: &'a Game,
    pub roster: &'a Roster,
    pub lovers: &'a LoverIndex,
    pub role_counts: &'a [(RoleKind, i32)],
    pub actions: &'a [ActionRecord],
}

fn on_werewolf_team(p: &Participant) -> bool {
    p.team() == Some(Team::Werewolf)
}

fn knows_role(viewer: Option<&Participant>, seat: &Participant, finished: bool) -> bool {
    if finished {
        return true;
    }
    let Some(viewer) = viewer else {
        return false;
    };
    viewer.player_id == seat.player_id
        || (on_werewolf_team(viewer) && on_werewolf_team(seat))
        || (viewer.has_role(RoleKind::Mason) && seat.has_role(RoleKind::Mason))
}

fn can_read(viewer: Option<&Participant>, action: &ActionRecord) -> bool {
    match action.visibility {
        Visibility::Public => true,
        Visibility::TeamWerewolf => viewer.is_some_and(on_werewolf_team),
        Visibility::Actor => viewer.is_some_and(|v| action.actor_id == Some(v.player_id)),
    }
}

pub fn render(inputs: &ViewInputs<'_>, viewer: Option<PlayerId>) -> PlayerView {
    let game = inputs.game;
    let finished = game.is_finished();
    let me = viewer.and_then(|id| inputs.roster.get(id));

    let lovers = inputs.lovers.pair().filter(|(a, b)| {
        me.is_some_and(|m| {
            m.player_id == *a || m.player_id == *b || m.has_role(RoleKind::Cupid)
        })
    });

    let players = inputs
        .roster
        .participants()
        .map(|seat| SeatView {
            player_id: seat.player_id,
            name: seat.name.clone(),
            alive: seat.alive,
            role: seat
                .role
                .filter(|_| knows_role(me, seat, finished))
                .map(|r| r.name().to_string()),
        })
        .collect();

    let actions = inputs
        .actions
        .iter()
        .filter(|a| can_read(me, a))
        .map(|a| ActionView {
            id: a.id,
            round: a.round,
            phase: a.phase,
            action_type: a.action_type,
            actor_id: a.actor_id,
            target_id: a.target_id,
            description: a.description.clone(),
        })
        .collect();

    let pending = if game.status == GameStatus::Day {
        let shooters: Vec<PlayerId> = inputs
            .actions
            .iter()
            .filter(|a| a.action_type == ActionType::HunterRevenge)
            .filter_map(|a| a.actor_id)
            .collect();
        pending_hunters(inputs.roster, game.round, &shooters)
    } else {
        Vec::new()
    };

    PlayerView {
        game_id: game.id,
        version: game.lock_version,
        status: game.status,
        round: game.round,
        winner: game.winner,
        me: me.map(|m| SelfView {
            player_id: m.player_id,
            role: m.role.map(|r| r.name().to_string()),
            team: m.team(),
            alive: m.alive,
            lovers,
        }),
        players,
        role_counts: role_count_rows(inputs.role_counts),
        actions,
        pending_hunters: pending,
    }
}

/// Load and render `game_id` for `viewer`.
pub async fn player_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    viewer: Option<PlayerId>,
) -> Result<PlayerView, AppError> {
    let ctx = FlowContext::load(conn, game_id).await?;
    let role_counts = role_configs::list_counts(conn, game_id).await?;
    let actions = actions_repo::list_by_game(conn, game_id).await?;
    Ok(render(
        &ViewInputs {
            game: &ctx.game,
            roster: &ctx.roster,
            lovers: &ctx.lovers,
            role_counts: &role_counts,
            actions: &actions,
        },
        viewer,
    ))
}

/// View of the latest game, if any exists.
pub async fn current_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    viewer: Option<PlayerId>,
) -> Result<Option<PlayerView>, AppError> {
    match games_repo::find_latest(conn).await? {
        Some(game) => Ok(Some(player_view(conn, game.id, viewer).await?)),
        None => Ok(None),
    }
}
