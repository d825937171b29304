use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[sea_orm(string_value = "NIGHT")]
    Night,
    #[sea_orm(string_value = "DAY")]
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[sea_orm(string_value = "day_vote")]
    DayVote,
    #[sea_orm(string_value = "elimination")]
    Elimination,
    #[sea_orm(string_value = "hunter_revenge")]
    HunterRevenge,
    #[sea_orm(string_value = "werewolf_kill")]
    WerewolfKill,
    #[sea_orm(string_value = "werewolf_kill2")]
    WerewolfKill2,
    #[sea_orm(string_value = "seer_investigate")]
    SeerInvestigate,
    #[sea_orm(string_value = "doctor_protect")]
    DoctorProtect,
    #[sea_orm(string_value = "guard_protect")]
    GuardProtect,
    #[sea_orm(string_value = "witch_heal")]
    WitchHeal,
    #[sea_orm(string_value = "witch_kill")]
    WitchKill,
    #[sea_orm(string_value = "witch_pass")]
    WitchPass,
    #[sea_orm(string_value = "cupid_link")]
    CupidLink,
    #[sea_orm(string_value = "lover_heartbreak")]
    LoverHeartbreak,
    #[sea_orm(string_value = "story")]
    Story,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "team_werewolf")]
    TeamWerewolf,
    #[sea_orm(string_value = "actor")]
    Actor,
}

/// One row of the action log. `id` is a monotonic ordinal used for replay;
/// `(game_id, round, phase, actor_id, action_type)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    pub round: i32,
    pub phase: Phase,
    #[sea_orm(column_name = "actor_id")]
    pub actor_id: Option<i64>,
    #[sea_orm(column_name = "action_type")]
    pub action_type: ActionType,
    #[sea_orm(column_name = "target_id")]
    pub target_id: Option<i64>,
    pub visibility: Visibility,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
