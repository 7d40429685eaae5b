//! Table and zone operations beyond plain CRUD

use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, OrderDetail, TableStatus, Zone, ZoneCreate,
    ZoneUpdate,
};
use sqlx::SqlitePool;

use super::{load_table, table_not_found};
use crate::db::repository::{self, RepoError, dining_table, order, zone};
use crate::orders::load_detail;
use crate::utils::{AppError, AppResult, ErrorCode};

fn zone_not_found(zone_id: i64) -> AppError {
    AppError::with_message(ErrorCode::ZoneNotFound, format!("Zone {zone_id} not found"))
        .with_detail("zone_id", zone_id)
}

/// Map repository errors of table writes to table codes
fn table_write_error(err: RepoError, table_id: Option<i64>) -> AppError {
    match err {
        RepoError::Duplicate(_) => {
            AppError::new(ErrorCode::TableNumberExists).with_detail("field", "number")
        }
        RepoError::NotFound(_) => match table_id {
            Some(id) => table_not_found(id),
            None => AppError::new(ErrorCode::TableNotFound),
        },
        other => other.into(),
    }
}

fn zone_write_error(err: RepoError, zone_id: Option<i64>) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::ZoneNameExists).with_detail("field", "name"),
        RepoError::NotFound(_) => match zone_id {
            Some(id) => zone_not_found(id),
            None => AppError::new(ErrorCode::ZoneNotFound),
        },
        other => other.into(),
    }
}

async fn ensure_zone(pool: &SqlitePool, establishment_id: i64, zone_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = zone_id
        && zone::find_by_id(pool, establishment_id, id).await?.is_none()
    {
        return Err(zone_not_found(id));
    }
    Ok(())
}

// ========== Zones ==========

pub async fn get_zone(pool: &SqlitePool, establishment_id: i64, zone_id: i64) -> AppResult<Zone> {
    zone::find_by_id(pool, establishment_id, zone_id)
        .await?
        .ok_or_else(|| zone_not_found(zone_id))
}

pub async fn create_zone(pool: &SqlitePool, establishment_id: i64, data: ZoneCreate) -> AppResult<Zone> {
    zone::create(pool, establishment_id, data)
        .await
        .map_err(|e| zone_write_error(e, None))
}

pub async fn update_zone(
    pool: &SqlitePool,
    establishment_id: i64,
    zone_id: i64,
    data: ZoneUpdate,
) -> AppResult<Zone> {
    zone::update(pool, establishment_id, zone_id, data)
        .await
        .map_err(|e| zone_write_error(e, Some(zone_id)))
}

/// Delete a zone; refused while active tables reference it
pub async fn delete_zone(pool: &SqlitePool, establishment_id: i64, zone_id: i64) -> AppResult<()> {
    let mut tx = repository::begin(pool).await?;
    zone::find_by_id(&mut *tx, establishment_id, zone_id)
        .await?
        .ok_or_else(|| zone_not_found(zone_id))?;

    let tables = zone::count_active_tables(&mut *tx, establishment_id, zone_id).await?;
    if tables > 0 {
        return Err(AppError::with_message(
            ErrorCode::ZoneHasTables,
            format!("Zone {zone_id} still has {tables} active tables"),
        )
        .with_detail("tables", tables));
    }

    zone::delete(&mut *tx, establishment_id, zone_id).await?;
    repository::commit(tx).await?;
    Ok(())
}

// ========== Tables ==========

pub async fn get_table(pool: &SqlitePool, establishment_id: i64, table_id: i64) -> AppResult<DiningTable> {
    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    load_table(&mut conn, establishment_id, table_id).await
}

pub async fn create_table(
    pool: &SqlitePool,
    establishment_id: i64,
    data: DiningTableCreate,
) -> AppResult<DiningTable> {
    ensure_zone(pool, establishment_id, data.zone_id).await?;
    dining_table::create(pool, establishment_id, data)
        .await
        .map_err(|e| table_write_error(e, None))
}

pub async fn update_table(
    pool: &SqlitePool,
    establishment_id: i64,
    table_id: i64,
    data: DiningTableUpdate,
) -> AppResult<DiningTable> {
    ensure_zone(pool, establishment_id, data.zone_id).await?;
    dining_table::update(pool, establishment_id, table_id, data)
        .await
        .map_err(|e| table_write_error(e, Some(table_id)))
}

/// Delete a table; refused while it has an order in progress
pub async fn delete_table(pool: &SqlitePool, establishment_id: i64, table_id: i64) -> AppResult<()> {
    let mut tx = repository::begin(pool).await?;
    load_table(&mut tx, establishment_id, table_id).await?;
    ensure_no_open_order(&mut tx, establishment_id, table_id).await?;
    dining_table::delete(&mut *tx, establishment_id, table_id).await?;
    repository::commit(tx).await?;
    Ok(())
}

async fn ensure_no_open_order(
    conn: &mut sqlx::SqliteConnection,
    establishment_id: i64,
    table_id: i64,
) -> AppResult<()> {
    if let Some(open) = order::find_open_by_table(&mut *conn, establishment_id, table_id).await? {
        return Err(AppError::new(ErrorCode::TableHasOrders)
            .with_detail("table_id", table_id)
            .with_detail("order_id", open.id));
    }
    Ok(())
}

/// Manual status change
///
/// `FREE` and `NEEDS_CLEANING` describe an idle table and are refused
/// while an order is in progress.
pub async fn set_table_status(
    pool: &SqlitePool,
    establishment_id: i64,
    table_id: i64,
    status: TableStatus,
) -> AppResult<DiningTable> {
    let mut tx = repository::begin(pool).await?;
    load_table(&mut tx, establishment_id, table_id).await?;
    if status.is_idle() {
        ensure_no_open_order(&mut tx, establishment_id, table_id).await?;
    }
    dining_table::set_status(&mut *tx, establishment_id, table_id, status).await?;
    let updated = load_table(&mut tx, establishment_id, table_id).await?;
    repository::commit(tx).await?;
    Ok(updated)
}

/// The customers asked for the bill: table → `BILL_REQUESTED`
pub async fn request_bill(pool: &SqlitePool, establishment_id: i64, table_id: i64) -> AppResult<DiningTable> {
    let mut tx = repository::begin(pool).await?;
    let table = load_table(&mut tx, establishment_id, table_id).await?;
    if order::find_open_by_table(&mut *tx, establishment_id, table_id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::TableNoOpenOrder,
            format!("Table {} has no order in progress", table.number),
        )
        .with_detail("table_id", table_id));
    }
    dining_table::set_status(&mut *tx, establishment_id, table_id, TableStatus::BillRequested).await?;
    let updated = load_table(&mut tx, establishment_id, table_id).await?;
    repository::commit(tx).await?;
    Ok(updated)
}

/// Order in progress on a table, with lines
pub async fn current_order(
    pool: &SqlitePool,
    establishment_id: i64,
    table_id: i64,
) -> AppResult<Option<OrderDetail>> {
    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    load_table(&mut conn, establishment_id, table_id).await?;
    match order::find_open_by_table(&mut *conn, establishment_id, table_id).await? {
        Some(open) => Ok(Some(load_detail(&mut conn, establishment_id, open.id).await?)),
        None => Ok(None),
    }
}
