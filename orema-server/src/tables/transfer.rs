//! Table transfer
//!
//! Moves the open order of one table to another table. When the
//! destination is already serving an order nothing changes and the caller
//! receives [`TransferOutcome::MergeRequired`].

use shared::models::{TableStatus, TableTransfer, TransferOutcome};
use sqlx::SqlitePool;

use super::load_table;
use crate::db::repository::{self, dining_table, order};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Transfer the in-progress order of `from_table_id` to `to_table_id`
///
/// Preconditions, in order (nothing is written before all pass):
/// 1. both tables exist in the establishment, and differ
/// 2. the source has an order in progress (the oldest one is moved)
/// 3. the destination has none, otherwise `MergeRequired`
///
/// Effect: the order points to the destination, the source becomes
/// `FREE` (`mark_source_as_clean == Some(true)`) or `NEEDS_CLEANING`, the
/// destination takes the source's previous status.
pub async fn transfer_table(
    pool: &SqlitePool,
    establishment_id: i64,
    request: TableTransfer,
) -> AppResult<TransferOutcome> {
    let TableTransfer {
        from_table_id,
        to_table_id,
        mark_source_as_clean,
    } = request;

    let mut tx = repository::begin(pool).await?;

    let source = load_table(&mut tx, establishment_id, from_table_id).await?;
    let destination = load_table(&mut tx, establishment_id, to_table_id).await?;
    if source.id == destination.id {
        return Err(AppError::validation("Source and destination tables are the same")
            .with_detail("field", "to_table_id"));
    }

    let moving = order::find_open_by_table(&mut *tx, establishment_id, source.id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::TableNoOpenOrder,
                format!("Table {} has no order in progress", source.number),
            )
            .with_detail("table_id", source.id)
        })?;

    if let Some(existing) = order::find_open_by_table(&mut *tx, establishment_id, destination.id).await? {
        // Read-only so far; dropping the transaction rolls nothing back
        tracing::info!(
            source_order_id = moving.id,
            target_order_id = existing.id,
            "Transfer needs a merge"
        );
        return Ok(TransferOutcome::MergeRequired {
            source_order_id: moving.id,
            target_order_id: existing.id,
            message: format!(
                "La table {} a déjà une commande en cours",
                destination.number
            ),
        });
    }

    let source_status = if mark_source_as_clean == Some(true) {
        TableStatus::Free
    } else {
        TableStatus::NeedsCleaning
    };

    order::set_table(&mut *tx, moving.id, destination.id).await?;
    dining_table::set_status(&mut *tx, establishment_id, source.id, source_status).await?;
    dining_table::set_status(&mut *tx, establishment_id, destination.id, source.status).await?;
    repository::commit(tx).await?;

    tracing::info!(
        order_id = moving.id,
        from = %source.number,
        to = %destination.number,
        "Order transferred"
    );

    Ok(TransferOutcome::Transferred {
        order_id: moving.id,
        from_table_id: source.id,
        to_table_id: destination.id,
        message: format!(
            "Commande transférée de la table {} vers la table {}",
            source.number, destination.number
        ),
    })
}
