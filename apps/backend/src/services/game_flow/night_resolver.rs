use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::context::FlowContext;
use super::{FlowReport, GameFlowService};
use crate::domain::ledger::PhaseLog;
use crate::domain::night::{self, NightContext};
use crate::entities::{GameStatus, Phase};
use crate::error::AppError;
use crate::repos::actions::logged;

impl GameFlowService {
    /// Resolve the night once every completion gate is met.
    ///
    /// Deaths land, the day begins, heartbreaks follow, then victory is
    /// checked. Hunters killed overnight shoot during the day.
    pub(super) async fn resolve_night(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        if ctx.game.status != GameStatus::Night {
            return Ok(());
        }
        let records = ctx.phase_actions(txn, Phase::Night).await?;
        let actions = logged(&records);
        let outcome = {
            let night_ctx = NightContext {
                round: ctx.round(),
                roster: &ctx.roster,
                log: PhaseLog::new(&actions),
                lovers: &ctx.lovers,
            };
            if let Some(gate) = night::unmet_gate(&night_ctx) {
                debug!(game_id = ctx.game_id(), round = ctx.round(), ?gate, "Night still open");
                return Ok(());
            }
            night::resolve(&night_ctx)
        };

        info!(
            game_id = ctx.game_id(),
            round = ctx.round(),
            victim1 = outcome.victim1,
            victim2 = outcome.victim2,
            deaths = outcome.deaths.len(),
            "Night resolved"
        );

        self.apply_deaths(txn, ctx, &outcome.deaths, Phase::Night, report)
            .await?;
        self.enter_day(txn, ctx).await?;
        self.finish_if_won(txn, ctx).await?;
        Ok(())
    }
}
