//! Night intents: pack votes, seer, doctor, guard, witch and cupid.
//!
//! Each handler validates, records, then re-runs the night resolver; the
//! resolver decides whether the night is complete.

use sea_orm::DatabaseTransaction;
use tracing::debug;

use super::context::{reject, FlowContext};
use super::{FlowReport, GameFlowService};
use crate::domain::ledger::PhaseLog;
use crate::domain::night::{self, NightContext};
use crate::domain::roster::PlayerId;
use crate::entities::{ActionType, GameStatus, Phase, Team};
use crate::error::AppError;
use crate::errors::domain::ValidationKind;
use crate::repos::actions::{self as actions_repo, logged, ActionCreate};
use crate::repos::lovers;

/// Outcome of checking an actor's earlier submission against a new one.
enum Repeat {
    /// Nothing recorded yet.
    Fresh,
    /// Same target as before; nothing to do.
    Same,
}

fn one_shot(existing: Option<Option<PlayerId>>, target: PlayerId) -> Result<Repeat, AppError> {
    match existing {
        None => Ok(Repeat::Fresh),
        Some(Some(prev)) if prev == target => Ok(Repeat::Same),
        Some(_) => Err(reject(
            ValidationKind::AlreadyActed,
            "You already acted tonight",
        )
        .into()),
    }
}

impl GameFlowService {
    fn require_night(&self, ctx: &FlowContext, intent: &str) -> Result<(), AppError> {
        ctx.require_status(GameStatus::Night, intent)?;
        Ok(())
    }

    /// Target of an earlier action by `actor` this night, if any.
    async fn tonight(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
        actor: PlayerId,
        action_type: ActionType,
    ) -> Result<Option<Option<PlayerId>>, AppError> {
        let found = actions_repo::find_action(
            txn,
            ctx.game_id(),
            ctx.round(),
            Phase::Night,
            actor,
            action_type,
        )
        .await?;
        Ok(found.map(|a| a.target_id))
    }

    pub(super) async fn werewolf_vote(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        second: bool,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        let (intent, kind) = if second {
            ("werewolf_vote2", ActionType::WerewolfKill2)
        } else {
            ("werewolf_vote", ActionType::WerewolfKill)
        };
        self.require_night(ctx, intent)?;
        ctx.require_night_actor(actor, kind)?;
        if second && !night::cub_revenge_active(&ctx.roster, ctx.round()) {
            return Err(reject(
                ValidationKind::PhaseMismatch,
                "There is no second kill tonight",
            )
            .into());
        }
        let target = ctx.require_living_target(target)?;

        let description = format!("{} wants {} dead", ctx.name(actor), ctx.name(target));
        ctx.record(txn, Phase::Night, actor, kind, Some(target), description)
            .await?;
        self.resolve_night(txn, ctx, report).await
    }

    pub(super) async fn seer_investigate(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "seer_investigate")?;
        ctx.require_night_actor(actor, ActionType::SeerInvestigate)?;
        let target = ctx.require_living_target(target)?;
        let previous = self
            .tonight(txn, ctx, actor, ActionType::SeerInvestigate)
            .await?;
        if let Repeat::Same = one_shot(previous, target)? {
            return Ok(());
        }

        let team = match ctx.roster.team_of(target) {
            Some(Team::Werewolf) => "the werewolves",
            _ => "the village",
        };
        let description = format!("{} sides with {team}", ctx.name(target));
        ctx.record(
            txn,
            Phase::Night,
            actor,
            ActionType::SeerInvestigate,
            Some(target),
            description,
        )
        .await?;
        self.resolve_night(txn, ctx, report).await
    }

    pub(super) async fn doctor_protect(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "doctor_protect")?;
        ctx.require_night_actor(actor, ActionType::DoctorProtect)?;
        let target = ctx.require_living_target(target)?;
        let previous = self
            .tonight(txn, ctx, actor, ActionType::DoctorProtect)
            .await?;
        if let Repeat::Same = one_shot(previous, target)? {
            return Ok(());
        }

        let description = format!("You watch over {} tonight", ctx.name(target));
        ctx.record(
            txn,
            Phase::Night,
            actor,
            ActionType::DoctorProtect,
            Some(target),
            description,
        )
        .await?;
        self.resolve_night(txn, ctx, report).await
    }

    pub(super) async fn guard_protect(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "guard_protect")?;
        ctx.require_night_actor(actor, ActionType::GuardProtect)?;
        let target = ctx.require_living_target(target)?;
        if target == actor {
            return Err(reject(ValidationKind::InvalidTarget, "You cannot guard yourself").into());
        }
        let last_night = actions_repo::find_action(
            txn,
            ctx.game_id(),
            ctx.round() - 1,
            Phase::Night,
            actor,
            ActionType::GuardProtect,
        )
        .await?;
        if last_night.is_some_and(|a| a.target_id == Some(target)) {
            return Err(reject(
                ValidationKind::InvalidTarget,
                "You guarded that player last night",
            )
            .into());
        }
        let previous = self
            .tonight(txn, ctx, actor, ActionType::GuardProtect)
            .await?;
        if let Repeat::Same = one_shot(previous, target)? {
            return Ok(());
        }

        let description = format!("You stand guard over {}", ctx.name(target));
        ctx.record(
            txn,
            Phase::Night,
            actor,
            ActionType::GuardProtect,
            Some(target),
            description,
        )
        .await?;
        self.resolve_night(txn, ctx, report).await
    }

    /// Fails once the witch has passed for the night.
    async fn require_witch_turn(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
        actor: PlayerId,
    ) -> Result<(), AppError> {
        if self
            .tonight(txn, ctx, actor, ActionType::WitchPass)
            .await?
            .is_some()
        {
            return Err(reject(
                ValidationKind::AlreadyActed,
                "You already ended your turn tonight",
            )
            .into());
        }
        Ok(())
    }

    /// Earlier use of a once-per-game potion: `(round, target)`.
    async fn potion_used(
        &self,
        txn: &DatabaseTransaction,
        ctx: &FlowContext,
        actor: PlayerId,
        potion: ActionType,
    ) -> Result<Option<(i32, Option<PlayerId>)>, AppError> {
        let used = actions_repo::list_by_type(txn, ctx.game_id(), potion).await?;
        Ok(used
            .into_iter()
            .find(|a| a.actor_id == Some(actor))
            .map(|a| (a.round, a.target_id)))
    }

    pub(super) async fn witch_heal(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "witch_heal")?;
        ctx.require_night_actor(actor, ActionType::WitchHeal)?;
        self.require_witch_turn(txn, ctx, actor).await?;
        let target = ctx.require_living_target(target)?;

        match self.potion_used(txn, ctx, actor, ActionType::WitchHeal).await? {
            Some((round, prev)) if round == ctx.round() && prev == Some(target) => return Ok(()),
            Some(_) => {
                return Err(reject(
                    ValidationKind::AlreadyActed,
                    "Your healing potion is spent",
                )
                .into())
            }
            None => {}
        }
        if target == actor {
            return Err(reject(ValidationKind::InvalidTarget, "You cannot heal yourself").into());
        }

        let records = ctx.phase_actions(txn, Phase::Night).await?;
        let actions = logged(&records);
        let (victim1, victim2) = night::current_victims(&NightContext {
            round: ctx.round(),
            roster: &ctx.roster,
            log: PhaseLog::new(&actions),
            lovers: &ctx.lovers,
        });
        if victim1 != Some(target) && victim2 != Some(target) {
            return Err(reject(
                ValidationKind::InvalidTarget,
                "Only tonight's victim can be saved",
            )
            .into());
        }

        let description = format!("You brew a cure for {}", ctx.name(target));
        ctx.record(
            txn,
            Phase::Night,
            actor,
            ActionType::WitchHeal,
            Some(target),
            description,
        )
        .await?;
        self.resolve_night(txn, ctx, report).await
    }

    pub(super) async fn witch_kill(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "witch_kill")?;
        ctx.require_night_actor(actor, ActionType::WitchKill)?;
        self.require_witch_turn(txn, ctx, actor).await?;
        let target = ctx.require_living_target(target)?;

        match self.potion_used(txn, ctx, actor, ActionType::WitchKill).await? {
            Some((round, prev)) if round == ctx.round() && prev == Some(target) => return Ok(()),
            Some(_) => {
                return Err(reject(
                    ValidationKind::AlreadyActed,
                    "Your poison is spent",
                )
                .into())
            }
            None => {}
        }

        let description = format!("You poison {}", ctx.name(target));
        ctx.record(
            txn,
            Phase::Night,
            actor,
            ActionType::WitchKill,
            Some(target),
            description,
        )
        .await?;
        self.resolve_night(txn, ctx, report).await
    }

    pub(super) async fn witch_pass(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "witch_pass")?;
        ctx.require_night_actor(actor, ActionType::WitchPass)?;

        let written = actions_repo::record_once(
            txn,
            ActionCreate {
                game_id: ctx.game_id(),
                round: ctx.round(),
                phase: Phase::Night,
                actor_id: Some(actor),
                action_type: ActionType::WitchPass,
                target_id: None,
                visibility: super::context::visibility_of(ActionType::WitchPass),
                description: "You put your potions away for the night".to_string(),
            },
        )
        .await?;
        if !written {
            debug!(game_id = ctx.game_id(), actor, "Witch already passed");
            return Ok(());
        }
        self.resolve_night(txn, ctx, report).await
    }

    /// First call stores the first lover; a second, different choice links
    /// the pair and leaves the second lover as the action's target.
    pub(super) async fn cupid_choose(
        &self,
        txn: &DatabaseTransaction,
        ctx: &mut FlowContext,
        actor: PlayerId,
        target: Option<PlayerId>,
        report: &mut FlowReport,
    ) -> Result<(), AppError> {
        self.require_night(ctx, "cupid_choose")?;
        ctx.require_night_actor(actor, ActionType::CupidLink)?;
        if ctx.round() != 1 {
            return Err(reject(
                ValidationKind::PhaseMismatch,
                "Cupid only shoots on the first night",
            )
            .into());
        }
        if ctx.lovers.is_linked() {
            return Err(reject(ValidationKind::AlreadyActed, "The lovers are already bound").into());
        }
        let target = ctx.require_living_target(target)?;

        let first = self.tonight(txn, ctx, actor, ActionType::CupidLink).await?;
        match first.flatten() {
            None => {
                let description = format!("Your first arrow strikes {}", ctx.name(target));
                ctx.record(
                    txn,
                    Phase::Night,
                    actor,
                    ActionType::CupidLink,
                    Some(target),
                    description,
                )
                .await?;
                Ok(())
            }
            Some(chosen) if chosen == target => Ok(()),
            Some(chosen) => {
                lovers::link(txn, ctx.game_id(), chosen, target).await?;
                ctx.lovers = lovers::load_index(txn, ctx.game_id()).await?;
                let description = format!(
                    "You bound {} and {} together",
                    ctx.name(chosen),
                    ctx.name(target)
                );
                ctx.record(
                    txn,
                    Phase::Night,
                    actor,
                    ActionType::CupidLink,
                    Some(target),
                    description,
                )
                .await?;
                self.resolve_night(txn, ctx, report).await
            }
        }
    }
}
