//! Death persistence, heartbreak chains and phase transitions.

use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::info;

use super::context::{visibility_of, FlowContext};
use super::{FlowReport, GameFlowService};
use crate::domain::chain;
use crate::domain::day::pending_hunters;
use crate::domain::roster::{Death, PlayerId};
use crate::domain::win;
use crate::entities::{ActionType, GameStatus, Phase};
use crate::error::AppError;
use crate::repos::actions::{self as actions_repo, ActionCreate};
use crate::repos::games::{self as games_repo, GameUpdate};
use crate::repos::memberships;

fn death_notice(name: &str, cause: ActionType) -> String {
    match cause {
        ActionType::WerewolfKill | ActionType::WerewolfKill2 => {
            format!("{name} was found dead, torn apart by the pack")
        }
        ActionType::WitchKill => format!("{name} was found dead, poisoned in the night"),
        ActionType::Elimination => format!("{name} was eliminated by the village"),
        ActionType::HunterRevenge => format!("{name} was shot by the Hunter"),
        ActionType::LoverHeartbreak => format!("{name} died of a broken heart"),
        _ => format!("{name} died"),
    }
}

impl GameFlowService {
    /// Persist `deaths` then every heartbreak they set off.
    ///
    /// Players already dead are skipped. Returns the ids that died, in
    /// order, heartbreaks last.
    pub(super) async fn apply_deaths(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        deaths: &[Death],
        phase: Phase,
        report: &mut FlowReport,
    ) -> Result<Vec<PlayerId>, AppError> {
        let game_id = ctx.game_id();
        let round = ctx.round();
        let mut killed = Vec::with_capacity(deaths.len());

        for death in deaths {
            if !ctx.roster.is_alive(death.player_id) {
                continue;
            }
            memberships::mark_dead(txn, game_id, death.player_id, round, death.cause).await?;
            ctx.roster.mark_dead(death.player_id, round, death.cause);
            killed.push(death.player_id);
            report.deaths.push(*death);
            report
                .death_notices
                .push(death_notice(&ctx.name(death.player_id), death.cause));
            info!(game_id, round, player_id = death.player_id, cause = ?death.cause, "Player died");
        }

        let heartbreaks = chain::propagate(&mut ctx.roster, &ctx.lovers, &killed, round);
        for hb in heartbreaks {
            memberships::mark_dead(txn, game_id, hb.to, round, ActionType::LoverHeartbreak)
                .await?;
            let (to, from) = (ctx.name(hb.to), ctx.name(hb.from));
            actions_repo::append(
                txn,
                ActionCreate {
                    game_id,
                    round,
                    phase,
                    actor_id: Some(hb.from),
                    action_type: ActionType::LoverHeartbreak,
                    target_id: Some(hb.to),
                    visibility: visibility_of(ActionType::LoverHeartbreak),
                    description: format!("{to} could not live without {from}"),
                },
            )
            .await?;
            killed.push(hb.to);
            report.deaths.push(Death {
                player_id: hb.to,
                cause: ActionType::LoverHeartbreak,
            });
            report
                .death_notices
                .push(death_notice(&to, ActionType::LoverHeartbreak));
            info!(game_id, round, player_id = hb.to, lover = hb.from, "Lover died of heartbreak");
        }

        Ok(killed)
    }

    /// Hunters who died this round and have not fired yet.
    pub(super) async fn owed_shots(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
    ) -> Result<Vec<PlayerId>, AppError> {
        let shooters: Vec<PlayerId> =
            actions_repo::list_by_type(txn, ctx.game_id(), ActionType::HunterRevenge)
                .await?
                .into_iter()
                .filter_map(|r| r.actor_id)
                .collect();
        Ok(pending_hunters(&ctx.roster, ctx.round(), &shooters))
    }

    /// End the game if one side is wiped out. Returns whether it ended.
    pub(super) async fn finish_if_won(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
    ) -> Result<bool, AppError> {
        let Some(winner) = win::evaluate(&ctx.roster) else {
            return Ok(false);
        };
        ctx.game = games_repo::update_game(
            txn,
            GameUpdate::new(ctx.game_id(), ctx.game.lock_version)
                .with_status(GameStatus::Finished)
                .with_winner(winner)
                .with_ended_at(OffsetDateTime::now_utc()),
        )
        .await?;
        info!(game_id = ctx.game_id(), round = ctx.round(), ?winner, "Game over");
        Ok(true)
    }

    pub(super) async fn enter_day(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
    ) -> Result<(), AppError> {
        ctx.game = games_repo::update_game(
            txn,
            GameUpdate::new(ctx.game_id(), ctx.game.lock_version).with_status(GameStatus::Day),
        )
        .await?;
        info!(game_id = ctx.game_id(), round = ctx.round(), "Day breaks");
        Ok(())
    }

    /// Close the day and start the next round's night.
    pub(super) async fn enter_night(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
    ) -> Result<(), AppError> {
        let round = ctx.round() + 1;
        ctx.game = games_repo::update_game(
            txn,
            GameUpdate::new(ctx.game_id(), ctx.game.lock_version)
                .with_status(GameStatus::Night)
                .with_round(round),
        )
        .await?;
        info!(game_id = ctx.game_id(), round, "Night falls");
        Ok(())
    }
}
