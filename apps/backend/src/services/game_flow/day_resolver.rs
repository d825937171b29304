use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::context::FlowContext;
use super::{FlowReport, GameFlowService};
use crate::domain::day::{tally, DayVerdict};
use crate::domain::ledger::PhaseLog;
use crate::domain::roster::Death;
use crate::entities::{ActionType, GameStatus, Phase};
use crate::error::AppError;
use crate::repos::actions::{self as actions_repo, logged, ActionCreate};

impl GameFlowService {
    pub(super) async fn eliminated_today(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
    ) -> Result<bool, AppError> {
        let records = ctx.phase_actions(txn, Phase::Day).await?;
        Ok(records
            .iter()
            .any(|r| r.action_type == ActionType::Elimination))
    }

    /// Tally the day once every living player has a ballot in.
    ///
    /// At most one elimination per day. A Hunter killed by the vote (or by
    /// the heartbreak it causes) pauses the day until they shoot.
    pub(super) async fn resolve_day(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        if ctx.game.status != GameStatus::Day {
            return Ok(());
        }
        let records = ctx.phase_actions(txn, Phase::Day).await?;
        if records
            .iter()
            .any(|r| r.action_type == ActionType::Elimination)
        {
            return Ok(());
        }
        if !self.owed_shots(txn, ctx).await?.is_empty() {
            return Ok(());
        }

        let actions = logged(&records);
        match tally(&ctx.roster, &PhaseLog::new(&actions)) {
            DayVerdict::Incomplete { missing } => {
                debug!(game_id = ctx.game_id(), round = ctx.round(), missing, "Ballots outstanding");
                Ok(())
            }
            DayVerdict::NoElimination { pass_count, reason } => {
                info!(
                    game_id = ctx.game_id(),
                    round = ctx.round(),
                    pass_count,
                    ?reason,
                    "Village spares everyone"
                );
                self.enter_night(txn, ctx).await
            }
            DayVerdict::Eliminate { target, votes } => {
                info!(game_id = ctx.game_id(), round = ctx.round(), target, votes, "Village eliminates");
                actions_repo::append(
                    txn,
                    ActionCreate {
                        game_id: ctx.game_id(),
                        round: ctx.round(),
                        phase: Phase::Day,
                        actor_id: Some(target),
                        action_type: ActionType::Elimination,
                        target_id: Some(target),
                        visibility: super::context::visibility_of(ActionType::Elimination),
                        description: format!(
                            "The village eliminates {} with {votes} votes",
                            ctx.name(target)
                        ),
                    },
                )
                .await?;
                let death = Death {
                    player_id: target,
                    cause: ActionType::Elimination,
                };
                self.apply_deaths(txn, ctx, &[death], Phase::Day, report)
                    .await?;

                if !self.owed_shots(txn, ctx).await?.is_empty() {
                    info!(game_id = ctx.game_id(), round = ctx.round(), "Day paused for Hunter");
                    return Ok(());
                }
                if self.finish_if_won(txn, ctx).await? {
                    return Ok(());
                }
                self.enter_night(txn, ctx).await
            }
        }
    }
}
