//! 桌台模块 - 转台、并单、状态管理
//!
//! Transfer and merge move order state between tables. Each runs in a
//! single SQLite transaction: either every row changes or none does.

pub mod merge;
pub mod service;
pub mod transfer;

pub use merge::merge_table_orders;
pub use service::{
    create_table, create_zone, current_order, delete_table, delete_zone, get_table, get_zone,
    request_bill, set_table_status, update_table, update_zone,
};
pub use transfer::transfer_table;

use shared::models::DiningTable;
use sqlx::SqliteConnection;

use crate::db::repository::dining_table;
use crate::utils::{AppError, AppResult, ErrorCode};

pub(crate) fn table_not_found(table_id: i64) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("Table {table_id} not found"))
        .with_detail("table_id", table_id)
}

/// Load a table of the establishment or fail with `TableNotFound`
pub(crate) async fn load_table(
    conn: &mut SqliteConnection,
    establishment_id: i64,
    table_id: i64,
) -> AppResult<DiningTable> {
    dining_table::find_by_id(&mut *conn, establishment_id, table_id)
        .await?
        .ok_or_else(|| table_not_found(table_id))
}
