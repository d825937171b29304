//! Day intents: ballots, closing the vote, and Hunter revenge.

use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::context::{reject, FlowContext};
use super::{FlowReport, GameFlowService};
use crate::domain::roles::RoleKind;
use crate::domain::roster::{Death, PlayerId};
use crate::entities::{ActionType, GameStatus, Phase};
use crate::error::AppError;
use crate::errors::domain::ValidationKind;

impl GameFlowService {
    /// Common gate for ballots: day, living voter, no Hunter mid-shot.
    async fn require_open_ballot(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
        actor: PlayerId,
        intent: &str,
    ) -> Result<(), AppError> {
        ctx.require_status(GameStatus::Day, intent)?;
        ctx.require_living_actor(actor)?;
        if !self.owed_shots(txn, ctx).await?.is_empty() {
            return Err(reject(
                ValidationKind::PhaseMismatch,
                "Waiting for the Hunter to take their shot",
            )
            .into());
        }
        Ok(())
    }

    /// `day_vote` (with a target) or `day_pass` (without).
    pub(super) async fn day_ballot(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        pass: bool,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        let intent = if pass { "day_pass" } else { "day_vote" };
        self.require_open_ballot(txn, ctx, actor, intent).await?;

        let target = if pass {
            None
        } else {
            Some(ctx.require_living_target(target)?)
        };

        let description = match target {
            Some(t) => format!("{} votes to eliminate {}", ctx.name(actor), ctx.name(t)),
            None => format!("{} votes to spare everyone today", ctx.name(actor)),
        };
        ctx.record(txn, Phase::Day, actor, ActionType::DayVote, target, description)
            .await?;
        self.resolve_day(txn, ctx, report).await
    }

    /// Ask for the tally; a no-op while ballots are missing.
    pub(super) async fn day_end_vote(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_open_ballot(txn, ctx, actor, "day_end_vote")
            .await?;
        self.resolve_day(txn, ctx, report).await
    }

    pub(super) async fn hunter_revenge(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        ctx.require_status(GameStatus::Day, "hunter_revenge")?;
        let hunter = ctx.require_member(actor)?;
        if hunter.alive {
            return Err(reject(
                ValidationKind::DeadActor,
                "Only a fallen Hunter takes revenge",
            )
            .into());
        }
        if !hunter.has_role(RoleKind::Hunter) {
            return Err(reject(ValidationKind::WrongRole, "Only the Hunter can shoot").into());
        }
        if hunter.died_round != Some(ctx.round()) {
            return Err(reject(
                ValidationKind::AlreadyActed,
                "Your chance for revenge has passed",
            )
            .into());
        }

        let fired = crate::repos::actions::list_by_type(
            txn,
            ctx.game_id(),
            ActionType::HunterRevenge,
        )
        .await?
        .into_iter()
        .find(|a| a.actor_id == Some(actor));
        if let Some(shot) = fired {
            if shot.target_id.is_some() && shot.target_id == target {
                debug!(game_id = ctx.game_id(), actor, "Repeated revenge ignored");
                return Ok(());
            }
            return Err(reject(ValidationKind::AlreadyActed, "You already fired").into());
        }
        let target = ctx.require_living_target(target)?;

        let description = format!("{} shoots {} with their last breath", ctx.name(actor), ctx.name(target));
        ctx.record(
            txn,
            Phase::Day,
            actor,
            ActionType::HunterRevenge,
            Some(target),
            description,
        )
        .await?;
        info!(game_id = ctx.game_id(), round = ctx.round(), actor, target, "Hunter fired");

        let death = Death {
            player_id: target,
            cause: ActionType::HunterRevenge,
        };
        self.apply_deaths(txn, ctx, &[death], Phase::Day, report)
            .await?;
        self.after_revenge(txn, ctx, report).await
    }

    /// Once every owed shot is fired: victory, then either the night (if
    /// the village already eliminated someone) or back to the ballot.
    async fn after_revenge(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        if !self.owed_shots(txn, ctx).await?.is_empty() {
            return Ok(());
        }
        if self.finish_if_won(txn, ctx).await? {
            return Ok(());
        }
        if self.eliminated_today(txn, ctx).await? {
            self.enter_night(txn, ctx).await
        } else {
            self.resolve_day(txn, ctx, report).await
        }
    }
}
