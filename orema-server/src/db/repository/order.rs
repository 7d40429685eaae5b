//! Order Repository (ventes, lignes_vente, supplements_ligne)

use super::{RepoError, RepoResult};
use shared::models::{
    LineSupplement, Order, OrderLine, OrderQuery, OrderStatus, OrderType, PaymentMethod,
    PreparationStatus,
};
use shared::util::now_millis;
use sqlx::{Executor, Sqlite};

/// Insert data for a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub establishment_id: i64,
    pub ticket_number: i64,
    pub order_type: OrderType,
    pub table_id: Option<i64>,
    pub notes: Option<String>,
    pub opened_by: Option<i64>,
}

/// Insert data for a line; amounts are already rounded
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub preparation_status: PreparationStatus,
    pub notes: Option<String>,
}

/// Order-level amounts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax_total: f64,
    pub discount_total: f64,
    pub total: f64,
}

// ========== ventes ==========

pub async fn find_by_id<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<Option<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let order = sqlx::query_as::<_, Order>("SELECT * FROM ventes WHERE id = ? AND establishment_id = ?")
        .bind(id)
        .bind(establishment_id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

/// Oldest in-progress order of a table
pub async fn find_open_by_table<'e, E>(
    executor: E,
    establishment_id: i64,
    table_id: i64,
) -> RepoResult<Option<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let order = sqlx::query_as::<_, Order>(
        "SELECT * FROM ventes WHERE table_id = ? AND establishment_id = ? AND status = ? \
         ORDER BY created_at, id LIMIT 1",
    )
    .bind(table_id)
    .bind(establishment_id)
    .bind(OrderStatus::InProgress)
    .fetch_optional(executor)
    .await?;
    Ok(order)
}

pub async fn find_all<'e, E>(executor: E, establishment_id: i64, query: &OrderQuery) -> RepoResult<Vec<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM ventes WHERE establishment_id = ?1 \
         AND (?2 IS NULL OR status = ?2) AND (?3 IS NULL OR table_id = ?3) \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(establishment_id)
    .bind(query.status)
    .bind(query.table_id)
    .fetch_all(executor)
    .await?;
    Ok(orders)
}

pub async fn next_ticket_number<'e, E>(executor: E, establishment_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let next = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(ticket_number), 0) + 1 FROM ventes WHERE establishment_id = ?",
    )
    .bind(establishment_id)
    .fetch_one(executor)
    .await?;
    Ok(next)
}

pub async fn insert<'e, E>(executor: E, data: NewOrder) -> RepoResult<Order>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO ventes (establishment_id, ticket_number, order_type, status, table_id, notes, opened_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(data.establishment_id)
    .bind(data.ticket_number)
    .bind(data.order_type)
    .bind(OrderStatus::InProgress)
    .bind(data.table_id)
    .bind(data.notes)
    .bind(data.opened_by)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(order)
}

pub async fn update_totals<'e, E>(executor: E, id: i64, totals: OrderTotals) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE ventes SET subtotal = ?, tax_total = ?, discount_total = ?, total = ?, updated_at = ? WHERE id = ?",
    )
    .bind(totals.subtotal)
    .bind(totals.tax_total)
    .bind(totals.discount_total)
    .bind(totals.total)
    .bind(now_millis())
    .bind(id)
    .execute(executor)
    .await?;
    ensure_updated(result.rows_affected(), id)
}

pub async fn set_table<'e, E>(executor: E, id: i64, table_id: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE ventes SET table_id = ?, updated_at = ? WHERE id = ?")
        .bind(table_id)
        .bind(now_millis())
        .bind(id)
        .execute(executor)
        .await?;
    ensure_updated(result.rows_affected(), id)
}

pub async fn set_notes<'e, E>(executor: E, id: i64, notes: Option<&str>) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE ventes SET notes = ?, updated_at = ? WHERE id = ?")
        .bind(notes)
        .bind(now_millis())
        .bind(id)
        .execute(executor)
        .await?;
    ensure_updated(result.rows_affected(), id)
}

/// Move an in-progress order to a terminal status
pub async fn close<'e, E>(
    executor: E,
    id: i64,
    status: OrderStatus,
    payment_method: Option<PaymentMethod>,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let result = sqlx::query(
        "UPDATE ventes SET status = ?, payment_method = ?, closed_at = ?, updated_at = ? \
         WHERE id = ? AND status = ?",
    )
    .bind(status)
    .bind(payment_method)
    .bind(now)
    .bind(now)
    .bind(id)
    .bind(OrderStatus::InProgress)
    .execute(executor)
    .await?;
    ensure_updated(result.rows_affected(), id)
}

pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM ventes WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    ensure_updated(result.rows_affected(), id)
}

fn ensure_updated(rows: u64, id: i64) -> RepoResult<()> {
    if rows == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

// ========== lignes_vente ==========

pub async fn find_lines<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<OrderLine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let lines = sqlx::query_as::<_, OrderLine>("SELECT * FROM lignes_vente WHERE order_id = ? ORDER BY id")
        .bind(order_id)
        .fetch_all(executor)
        .await?;
    Ok(lines)
}

pub async fn find_line<'e, E>(executor: E, order_id: i64, line_id: i64) -> RepoResult<Option<OrderLine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let line = sqlx::query_as::<_, OrderLine>("SELECT * FROM lignes_vente WHERE id = ? AND order_id = ?")
        .bind(line_id)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
    Ok(line)
}

pub async fn insert_line<'e, E>(executor: E, data: NewOrderLine) -> RepoResult<OrderLine>
where
    E: Executor<'e, Database = Sqlite>,
{
    let line = sqlx::query_as::<_, OrderLine>(
        "INSERT INTO lignes_vente (order_id, product_id, product_name, quantity, unit_price, tax_rate, \
         subtotal, tax_amount, total, preparation_status, notes, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(data.order_id)
    .bind(data.product_id)
    .bind(data.product_name)
    .bind(data.quantity)
    .bind(data.unit_price)
    .bind(data.tax_rate)
    .bind(data.subtotal)
    .bind(data.tax_amount)
    .bind(data.total)
    .bind(data.preparation_status)
    .bind(data.notes)
    .bind(now_millis())
    .fetch_one(executor)
    .await?;
    Ok(line)
}

pub async fn set_line_status<'e, E>(
    executor: E,
    order_id: i64,
    line_id: i64,
    status: PreparationStatus,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE lignes_vente SET preparation_status = ? WHERE id = ? AND order_id = ?")
        .bind(status)
        .bind(line_id)
        .bind(order_id)
        .execute(executor)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Line {line_id} not found")));
    }
    Ok(())
}

pub async fn delete_line<'e, E>(executor: E, order_id: i64, line_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM lignes_vente WHERE id = ? AND order_id = ?")
        .bind(line_id)
        .bind(order_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_lines<'e, E>(executor: E, order_id: i64) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM lignes_vente WHERE order_id = ?")
        .bind(order_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

// ========== supplements_ligne ==========

pub async fn find_line_supplements<'e, E>(executor: E, line_id: i64) -> RepoResult<Vec<LineSupplement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let supplements =
        sqlx::query_as::<_, LineSupplement>("SELECT * FROM supplements_ligne WHERE line_id = ? ORDER BY id")
            .bind(line_id)
            .fetch_all(executor)
            .await?;
    Ok(supplements)
}

/// All supplements of an order's lines
pub async fn find_order_supplements<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<LineSupplement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let supplements = sqlx::query_as::<_, LineSupplement>(
        "SELECT s.* FROM supplements_ligne s JOIN lignes_vente l ON l.id = s.line_id \
         WHERE l.order_id = ? ORDER BY s.line_id, s.id",
    )
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(supplements)
}

pub async fn insert_line_supplement<'e, E>(
    executor: E,
    line_id: i64,
    supplement_id: Option<i64>,
    name: &str,
    price: f64,
) -> RepoResult<LineSupplement>
where
    E: Executor<'e, Database = Sqlite>,
{
    let supplement = sqlx::query_as::<_, LineSupplement>(
        "INSERT INTO supplements_ligne (line_id, supplement_id, name, price) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(line_id)
    .bind(supplement_id)
    .bind(name)
    .bind(price)
    .fetch_one(executor)
    .await?;
    Ok(supplement)
}
