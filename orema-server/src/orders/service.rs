//! Order lifecycle operations

use shared::models::{
    Order, OrderDetail, OrderLineCreate, OrderLineDetail, OrderOpen, OrderStatus, OrderType,
    PaymentMethod, PreparationStatus, TableStatus,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::money;
use crate::db::repository::{self, dining_table, order, product, supplement};
use crate::tables;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Load an order of the establishment, failing unless it is IN_PROGRESS
pub(crate) async fn load_open_order(
    conn: &mut SqliteConnection,
    establishment_id: i64,
    order_id: i64,
) -> AppResult<Order> {
    let found = order::find_by_id(&mut *conn, establishment_id, order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    if found.status != OrderStatus::InProgress {
        return Err(AppError::with_message(
            ErrorCode::OrderNotInProgress,
            format!("Order {} is {:?}", order_id, found.status),
        )
        .with_detail("order_id", order_id));
    }
    Ok(found)
}

pub(crate) fn order_not_found(order_id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
        .with_detail("order_id", order_id)
}

/// Order with lines and supplements
pub async fn load_detail(
    conn: &mut SqliteConnection,
    establishment_id: i64,
    order_id: i64,
) -> AppResult<OrderDetail> {
    let found = order::find_by_id(&mut *conn, establishment_id, order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    let lines = order::find_lines(&mut *conn, order_id).await?;
    let mut supplements = order::find_order_supplements(&mut *conn, order_id).await?;

    let lines = lines
        .into_iter()
        .map(|line| {
            let (own, rest): (Vec<_>, Vec<_>) =
                supplements.drain(..).partition(|s| s.line_id == line.id);
            supplements = rest;
            OrderLineDetail {
                line,
                supplements: own,
            }
        })
        .collect();

    Ok(OrderDetail {
        order: found,
        lines,
    })
}

pub async fn get_detail(pool: &SqlitePool, establishment_id: i64, order_id: i64) -> AppResult<OrderDetail> {
    let mut conn = pool.acquire().await.map_err(repository::RepoError::from)?;
    load_detail(&mut conn, establishment_id, order_id).await
}

/// Re-derive order totals from its lines, keeping the current discount
async fn refresh_totals(conn: &mut SqliteConnection, current: &Order, discount_total: f64) -> AppResult<()> {
    let lines = order::find_lines(&mut *conn, current.id).await?;
    let totals = money::order_totals(&lines, discount_total);
    order::update_totals(&mut *conn, current.id, totals).await?;
    Ok(())
}

/// Open an order, optionally on a table
///
/// The table must have no IN_PROGRESS order; it becomes `OCCUPIED`.
pub async fn open_order(
    pool: &SqlitePool,
    establishment_id: i64,
    opened_by: Option<i64>,
    data: OrderOpen,
) -> AppResult<Order> {
    let mut tx = repository::begin(pool).await?;

    if let Some(table_id) = data.table_id {
        tables::load_table(&mut tx, establishment_id, table_id).await?;

        if let Some(existing) = order::find_open_by_table(&mut *tx, establishment_id, table_id).await? {
            return Err(AppError::with_message(
                ErrorCode::TableOccupied,
                format!("Table {table_id} already has order {}", existing.id),
            )
            .with_detail("table_id", table_id)
            .with_detail("order_id", existing.id));
        }
    }

    let order_type = data.order_type.unwrap_or(if data.table_id.is_some() {
        OrderType::DineIn
    } else {
        OrderType::Direct
    });
    let ticket_number = order::next_ticket_number(&mut *tx, establishment_id).await?;

    let created = order::insert(
        &mut *tx,
        order::NewOrder {
            establishment_id,
            ticket_number,
            order_type,
            table_id: data.table_id,
            notes: data.notes,
            opened_by,
        },
    )
    .await?;

    if let Some(table_id) = data.table_id {
        dining_table::set_status(&mut *tx, establishment_id, table_id, TableStatus::Occupied).await?;
    }

    repository::commit(tx).await?;
    tracing::info!(order_id = created.id, ticket_number, table_id = ?data.table_id, "Order opened");
    Ok(created)
}

/// Add a product line with catalog supplements
pub async fn add_line(
    pool: &SqlitePool,
    establishment_id: i64,
    order_id: i64,
    data: OrderLineCreate,
) -> AppResult<OrderDetail> {
    let mut tx = repository::begin(pool).await?;
    let current = load_open_order(&mut tx, establishment_id, order_id).await?;

    let item = product::find_by_id(&mut *tx, establishment_id, data.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", data.product_id))
                .with_detail("product_id", data.product_id)
        })?;

    let mut supplements = Vec::with_capacity(data.supplement_ids.len());
    for supplement_id in &data.supplement_ids {
        let found = supplement::find_by_id(&mut *tx, establishment_id, *supplement_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::SupplementNotFound,
                    format!("Supplement {supplement_id} not found"),
                )
                .with_detail("supplement_id", *supplement_id)
            })?;
        supplements.push(found);
    }

    let prices: Vec<f64> = supplements.iter().map(|s| s.price).collect();
    let amounts = money::line_amounts(item.price, &prices, data.quantity, item.tax_rate);

    let line = order::insert_line(
        &mut *tx,
        order::NewOrderLine {
            order_id,
            product_id: item.id,
            product_name: item.name.clone(),
            quantity: data.quantity,
            unit_price: item.price,
            tax_rate: item.tax_rate,
            subtotal: amounts.subtotal,
            tax_amount: amounts.tax_amount,
            total: amounts.total,
            preparation_status: PreparationStatus::Pending,
            notes: data.notes,
        },
    )
    .await?;

    for s in &supplements {
        order::insert_line_supplement(&mut *tx, line.id, Some(s.id), &s.name, s.price).await?;
    }

    refresh_totals(&mut tx, &current, current.discount_total).await?;
    let detail = load_detail(&mut tx, establishment_id, order_id).await?;
    repository::commit(tx).await?;

    tracing::debug!(order_id, line_id = line.id, product = %item.name, "Line added");
    Ok(detail)
}

pub async fn remove_line(
    pool: &SqlitePool,
    establishment_id: i64,
    order_id: i64,
    line_id: i64,
) -> AppResult<OrderDetail> {
    let mut tx = repository::begin(pool).await?;
    let current = load_open_order(&mut tx, establishment_id, order_id).await?;

    if !order::delete_line(&mut *tx, order_id, line_id).await? {
        return Err(line_not_found(line_id));
    }

    refresh_totals(&mut tx, &current, current.discount_total).await?;
    let detail = load_detail(&mut tx, establishment_id, order_id).await?;
    repository::commit(tx).await?;
    Ok(detail)
}

fn line_not_found(line_id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderLineNotFound, format!("Line {line_id} not found"))
        .with_detail("line_id", line_id)
}

pub async fn set_line_status(
    pool: &SqlitePool,
    establishment_id: i64,
    order_id: i64,
    line_id: i64,
    status: PreparationStatus,
) -> AppResult<OrderDetail> {
    let mut tx = repository::begin(pool).await?;
    load_open_order(&mut tx, establishment_id, order_id).await?;

    order::set_line_status(&mut *tx, order_id, line_id, status)
        .await
        .map_err(|e| match e {
            repository::RepoError::NotFound(_) => line_not_found(line_id),
            other => other.into(),
        })?;

    let detail = load_detail(&mut tx, establishment_id, order_id).await?;
    repository::commit(tx).await?;
    Ok(detail)
}

/// Set the order discount (absolute amount, at most subtotal + tax)
pub async fn apply_discount(
    pool: &SqlitePool,
    establishment_id: i64,
    order_id: i64,
    amount: f64,
) -> AppResult<Order> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation("discount must be a non-negative amount").with_detail("field", "amount"));
    }

    let mut tx = repository::begin(pool).await?;
    let current = load_open_order(&mut tx, establishment_id, order_id).await?;

    let lines = order::find_lines(&mut *tx, order_id).await?;
    let base = money::order_totals(&lines, 0.0);
    let max = money::max_discount(base.subtotal, base.tax_total);
    if amount > max {
        return Err(AppError::with_message(
            ErrorCode::OrderDiscountTooLarge,
            format!("Discount {amount:.2} exceeds order amount {max:.2}"),
        )
        .with_detail("max", max));
    }

    refresh_totals(&mut tx, &current, amount).await?;
    let updated = order::find_by_id(&mut *tx, establishment_id, order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    repository::commit(tx).await?;
    Ok(updated)
}

/// IN_PROGRESS → PAID; the table goes to `NEEDS_CLEANING`
pub async fn pay_order(
    pool: &SqlitePool,
    establishment_id: i64,
    order_id: i64,
    payment_method: PaymentMethod,
) -> AppResult<Order> {
    close_order(
        pool,
        establishment_id,
        order_id,
        OrderStatus::Paid,
        Some(payment_method),
        TableStatus::NeedsCleaning,
    )
    .await
}

/// IN_PROGRESS → CANCELLED; the table goes back to `FREE`
pub async fn cancel_order(pool: &SqlitePool, establishment_id: i64, order_id: i64) -> AppResult<Order> {
    close_order(pool, establishment_id, order_id, OrderStatus::Cancelled, None, TableStatus::Free).await
}

async fn close_order(
    pool: &SqlitePool,
    establishment_id: i64,
    order_id: i64,
    status: OrderStatus,
    payment_method: Option<PaymentMethod>,
    table_status: TableStatus,
) -> AppResult<Order> {
    let mut tx = repository::begin(pool).await?;
    let current = load_open_order(&mut tx, establishment_id, order_id).await?;

    order::close(&mut *tx, order_id, status, payment_method).await?;
    if let Some(table_id) = current.table_id {
        dining_table::set_status(&mut *tx, establishment_id, table_id, table_status).await?;
    }

    let updated = order::find_by_id(&mut *tx, establishment_id, order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    repository::commit(tx).await?;

    tracing::info!(order_id, status = ?status, total = updated.total, "Order closed");
    Ok(updated)
}
