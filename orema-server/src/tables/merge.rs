//! Order merge
//!
//! Folds the order of a source table into the order of a target table:
//! lines and their supplements are copied, totals are added, and the
//! source order is deleted.

use shared::models::{MergeOutcome, OrderMerge, TableStatus};
use sqlx::SqlitePool;

use super::load_table;
use crate::db::repository::{self, dining_table, order};
use crate::orders::money;
use crate::orders::service::load_open_order;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Merge `source_order_id` into `target_order_id`
///
/// Target totals become the field-wise sum of both orders' stored totals;
/// they are not re-derived from the copied lines. `source_table_id` must be
/// the source order's table; it is always left `FREE`.
pub async fn merge_table_orders(
    pool: &SqlitePool,
    establishment_id: i64,
    request: OrderMerge,
) -> AppResult<MergeOutcome> {
    let OrderMerge {
        source_order_id,
        target_order_id,
        source_table_id,
    } = request;

    if source_order_id == target_order_id {
        return Err(AppError::new(ErrorCode::OrderMergeSelf).with_detail("order_id", source_order_id));
    }

    let mut tx = repository::begin(pool).await?;

    let source = load_open_order(&mut tx, establishment_id, source_order_id).await?;
    let target = load_open_order(&mut tx, establishment_id, target_order_id).await?;
    let source_table = load_table(&mut tx, establishment_id, source_table_id).await?;
    if source.table_id != Some(source_table.id) {
        return Err(AppError::validation(format!(
            "Order {} is not on table {}",
            source.id, source_table.number
        ))
        .with_detail("field", "source_table_id"));
    }

    let lines = order::find_lines(&mut *tx, source.id).await?;
    for line in &lines {
        let supplements = order::find_line_supplements(&mut *tx, line.id).await?;
        let copy = order::insert_line(
            &mut *tx,
            order::NewOrderLine {
                order_id: target.id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                tax_rate: line.tax_rate,
                subtotal: line.subtotal,
                tax_amount: line.tax_amount,
                total: line.total,
                preparation_status: line.preparation_status,
                notes: line.notes.clone(),
            },
        )
        .await?;
        for s in &supplements {
            order::insert_line_supplement(&mut *tx, copy.id, s.supplement_id, &s.name, s.price).await?;
        }
    }

    order::update_totals(&mut *tx, target.id, money::merged_totals(&target, &source)).await?;

    let audit = format!("Fusion depuis la table {}", source_table.number);
    let notes = match target.notes.as_deref().map(str::trim) {
        Some(existing) if !existing.is_empty() => format!("{existing}\n{audit}"),
        _ => audit,
    };
    order::set_notes(&mut *tx, target.id, Some(&notes)).await?;

    order::delete_lines(&mut *tx, source.id).await?;
    order::delete(&mut *tx, source.id).await?;
    dining_table::set_status(&mut *tx, establishment_id, source_table.id, TableStatus::Free).await?;

    let merged = order::find_by_id(&mut *tx, establishment_id, target.id)
        .await?
        .ok_or_else(|| crate::orders::service::order_not_found(target.id))?;
    repository::commit(tx).await?;

    tracing::info!(
        source_order_id,
        target_order_id,
        merged_lines = lines.len(),
        total = merged.total,
        "Orders merged"
    );

    Ok(MergeOutcome {
        target_order: merged,
        merged_lines: lines.len(),
        message: format!(
            "Commande de la table {} fusionnée ({} lignes)",
            source_table.number,
            lines.len()
        ),
    })
}
