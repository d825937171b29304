use sea_orm::ConnectionTrait;

use crate::adapters::lovers_sea as lovers_adapter;
use crate::domain::ledger::LoverIndex;
use crate::domain::roster::PlayerId;
use crate::errors::domain::DomainError;

pub async fn load_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<LoverIndex, DomainError> {
    let rows = lovers_adapter::list_by_game(conn, game_id).await?;
    Ok(LoverIndex::from_rows(
        rows.into_iter().map(|r| (r.player_a, r.player_b)),
    ))
}

/// Store the pair in both directions.
pub async fn link<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    a: PlayerId,
    b: PlayerId,
) -> Result<(), DomainError> {
    lovers_adapter::insert_pair(conn, game_id, a, b).await?;
    Ok(())
}
