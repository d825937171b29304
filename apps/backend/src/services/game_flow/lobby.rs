//! Lobby membership, role configuration and game start.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;
use tracing::{debug, info};

use super::context::{reject, FlowContext};
use super::GameFlowService;
use crate::domain::dealing::{deal, role_multiset, validate_start};
use crate::domain::roles::RoleKind;
use crate::domain::roster::{Participant, PlayerId, Roster};
use crate::entities::GameStatus;
use crate::error::AppError;
use crate::errors::domain::ValidationKind;
use crate::repos::games::{self as games_repo, Game, GameUpdate};
use crate::repos::{memberships, role_configs};

impl GameFlowService {
    /// The latest game, if one was ever created.
    pub async fn current_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Option<Game>, AppError> {
        Ok(games_repo::find_latest(conn).await?)
    }

    /// The open game, creating a fresh lobby when there is none or the
    /// latest one has finished.
    pub async fn ensure_current_game(&self, txn: &DatabaseTransaction) -> Result<Game, AppError> {
        match games_repo::find_latest(txn).await? {
            Some(game) if !game.is_finished() => Ok(game),
            previous => {
                let game = games_repo::create_game(txn).await?;
                info!(
                    game_id = game.id,
                    previous_game_id = previous.map(|g| g.id),
                    "Opened new lobby"
                );
                Ok(game)
            }
        }
    }

    pub(super) async fn join_lobby(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        player_id: PlayerId,
    ) -> Result<(), AppError> {
        if ctx.game.status != GameStatus::Lobby {
            debug!(game_id = ctx.game_id(), player_id, "Join ignored outside lobby");
            return Ok(());
        }
        if ctx.roster.contains(player_id) {
            return Ok(());
        }

        let membership = memberships::create_membership(txn, ctx.game_id(), player_id).await?;
        let names = crate::repos::players::display_names(txn, vec![player_id]).await?;
        let name = names
            .get(&player_id)
            .cloned()
            .unwrap_or_else(|| format!("Player {player_id}"));
        let mut participants: Vec<Participant> = ctx.roster.participants().cloned().collect();
        participants.push(membership.into_participant(name));
        ctx.roster = Roster::new(participants);

        info!(game_id = ctx.game_id(), player_id, seats = ctx.roster.len(), "Player joined lobby");
        Ok(())
    }

    pub(super) async fn leave_lobby(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        player_id: PlayerId,
    ) -> Result<(), AppError> {
        ctx.require_status(GameStatus::Lobby, "leave_lobby")?;
        if !memberships::delete_membership(txn, ctx.game_id(), player_id).await? {
            debug!(game_id = ctx.game_id(), player_id, "Leave ignored, not a member");
            return Ok(());
        }
        let remaining: Vec<Participant> = ctx
            .roster
            .participants()
            .filter(|p| p.player_id != player_id)
            .cloned()
            .collect();
        ctx.roster = Roster::new(remaining);

        info!(game_id = ctx.game_id(), player_id, seats = ctx.roster.len(), "Player left lobby");
        Ok(())
    }

    pub(super) async fn set_role_count(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
        role: RoleKind,
        delta: i32,
    ) -> Result<(), AppError> {
        ctx.require_status(GameStatus::Lobby, "set_role_count")?;
        let count = role_configs::adjust_count(txn, ctx.game_id(), role, delta).await?;
        debug!(game_id = ctx.game_id(), role = role.name(), delta, count, "Role count adjusted");
        Ok(())
    }

    /// Validate the configuration, deal roles and move to the first night.
    pub(super) async fn start_game(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
    ) -> Result<(), AppError> {
        ctx.require_status(GameStatus::Lobby, "start_game")?;

        let counts = role_configs::list_counts(txn, ctx.game_id()).await?;
        let by_id: Vec<(i64, i32)> = counts.iter().map(|(role, n)| (role.id(), *n)).collect();
        validate_start(ctx.roster.len(), &by_id)?;

        // Seats in join order.
        let members = memberships::list_by_game(txn, ctx.game_id()).await?;
        let seats: Vec<PlayerId> = members.iter().map(|m| m.player_id).collect();
        let mut rng = ChaCha20Rng::try_from_os_rng().map_err(|e| {
            AppError::internal(format!("Failed to seed role shuffle: {e}"))
        })?;
        let dealt = deal(&seats, role_multiset(&counts), &mut rng)?;

        for (player_id, role) in &dealt {
            let membership = members
                .iter()
                .find(|m| m.player_id == *player_id)
                .ok_or_else(|| reject(ValidationKind::NotInGame, "Seat vanished during start"))?;
            memberships::set_role(txn, membership.id, *role).await?;
        }

        ctx.roster = Roster::new(ctx.roster.participants().map(|p| {
            let role = dealt
                .iter()
                .find(|(id, _)| *id == p.player_id)
                .map(|(_, role)| *role);
            Participant { role, ..p.clone() }
        }));

        ctx.game = games_repo::update_game(
            txn,
            GameUpdate::new(ctx.game_id(), ctx.game.lock_version)
                .with_status(GameStatus::Night)
                .with_round(1)
                .with_started_at(OffsetDateTime::now_utc()),
        )
        .await?;

        info!(
            game_id = ctx.game_id(),
            players = dealt.len(),
            "Game started, first night falls"
        );
        Ok(())
    }
}
