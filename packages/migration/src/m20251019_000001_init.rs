use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Query, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    ExternalId,
    DisplayName,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    Status,
    Round,
    Winner,
    CreatedAt,
    UpdatedAt,
    StartedAt,
    EndedAt,
    LockVersion,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    Team,
}

#[derive(Iden)]
enum RoleConfigs {
    Table,
    Id,
    GameId,
    RoleId,
    Count,
}

#[derive(Iden)]
enum GamePlayers {
    Table,
    Id,
    GameId,
    PlayerId,
    RoleId,
    IsAlive,
    DiedRound,
    DeathCause,
    CreatedAt,
}

#[derive(Iden)]
enum LoverPairs {
    Table,
    Id,
    GameId,
    PlayerA,
    PlayerB,
}

#[derive(Iden)]
enum Actions {
    Table,
    Id,
    GameId,
    Round,
    Phase,
    ActorId,
    ActionType,
    TargetId,
    Visibility,
    Description,
    CreatedAt,
    UpdatedAt,
}

/// Catalogue rows seeded at install time. Ids are stable so clients may
/// reference roles by id across games.
const ROLE_SEED: [(i64, &str, &str); 10] = [
    (1, "Villager", "VILLAGER"),
    (2, "Werewolf", "WEREWOLF"),
    (3, "Seer", "VILLAGER"),
    (4, "Doctor", "VILLAGER"),
    (5, "Witch", "VILLAGER"),
    (6, "Hunter", "VILLAGER"),
    (7, "Cupid", "VILLAGER"),
    (8, "Guard", "VILLAGER"),
    (9, "Mason", "VILLAGER"),
    (10, "Wolf Cub", "WEREWOLF"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enum-like columns are TEXT on every backend; values are validated by
        // the entity layer.

        // players table
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::ExternalId).string().not_null())
                    .col(ColumnDef::new(Players::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_external_id")
                    .table(Players::Table)
                    .col(Players::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // games table
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(16)
                            .not_null()
                            .default("LOBBY"),
                    )
                    .col(ColumnDef::new(Games::Round).integer().not_null().default(0))
                    .col(ColumnDef::new(Games::Winner).string_len(16).null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Games::EndedAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Games::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_status")
                    .table(Games::Table)
                    .col(Games::Status)
                    .to_owned(),
            )
            .await?;

        // roles table (static catalogue)
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::Name).string_len(32).not_null())
                    .col(ColumnDef::new(Roles::Team).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_roles_name")
                    .table(Roles::Table)
                    .col(Roles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(Roles::Table)
            .columns([Roles::Id, Roles::Name, Roles::Team]);
        for (id, name, team) in ROLE_SEED {
            seed.values_panic([id.into(), name.into(), team.into()]);
        }
        manager.exec_stmt(seed).await?;

        // role_configs table
        manager
            .create_table(
                Table::create()
                    .table(RoleConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleConfigs::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(RoleConfigs::GameId).big_integer().not_null())
                    .col(ColumnDef::new(RoleConfigs::RoleId).big_integer().not_null())
                    .col(ColumnDef::new(RoleConfigs::Count).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_configs_game")
                            .from(RoleConfigs::Table, RoleConfigs::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_configs_role")
                            .from(RoleConfigs::Table, RoleConfigs::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_role_configs_game_role")
                    .table(RoleConfigs::Table)
                    .col(RoleConfigs::GameId)
                    .col(RoleConfigs::RoleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // game_players table
        manager
            .create_table(
                Table::create()
                    .table(GamePlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamePlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GamePlayers::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GamePlayers::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(GamePlayers::RoleId).big_integer().null())
                    .col(
                        ColumnDef::new(GamePlayers::IsAlive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(GamePlayers::DiedRound).integer().null())
                    .col(ColumnDef::new(GamePlayers::DeathCause).string_len(32).null())
                    .col(
                        ColumnDef::new(GamePlayers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_game")
                            .from(GamePlayers::Table, GamePlayers::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_player")
                            .from(GamePlayers::Table, GamePlayers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_role")
                            .from(GamePlayers::Table, GamePlayers::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_players_game_player")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // lover_pairs table (both directions stored)
        manager
            .create_table(
                Table::create()
                    .table(LoverPairs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoverPairs::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(LoverPairs::GameId).big_integer().not_null())
                    .col(ColumnDef::new(LoverPairs::PlayerA).big_integer().not_null())
                    .col(ColumnDef::new(LoverPairs::PlayerB).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lover_pairs_game")
                            .from(LoverPairs::Table, LoverPairs::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_lover_pairs_game_a_b")
                    .table(LoverPairs::Table)
                    .col(LoverPairs::GameId)
                    .col(LoverPairs::PlayerA)
                    .col(LoverPairs::PlayerB)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // actions table (append/upsert log)
        manager
            .create_table(
                Table::create()
                    .table(Actions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Actions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Actions::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Actions::Round).integer().not_null())
                    .col(ColumnDef::new(Actions::Phase).string_len(16).not_null())
                    .col(ColumnDef::new(Actions::ActorId).big_integer().null())
                    .col(ColumnDef::new(Actions::ActionType).string_len(32).not_null())
                    .col(ColumnDef::new(Actions::TargetId).big_integer().null())
                    .col(ColumnDef::new(Actions::Visibility).string_len(16).not_null())
                    .col(ColumnDef::new(Actions::Description).text().not_null())
                    .col(
                        ColumnDef::new(Actions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Actions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_game")
                            .from(Actions::Table, Actions::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_actions_game_round_phase_actor_type")
                    .table(Actions::Table)
                    .col(Actions::GameId)
                    .col(Actions::Round)
                    .col(Actions::Phase)
                    .col(Actions::ActorId)
                    .col(Actions::ActionType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Actions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LoverPairs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GamePlayers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleConfigs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
