//! Data models
//!
//! Shared between orema-server and the web client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod dining_table;
pub mod employee;
pub mod establishment;
pub mod order;
pub mod permission;
pub mod product;
pub mod role;
pub mod transfer;
pub mod zone;

// Re-exports
pub use dining_table::*;
pub use employee::*;
pub use establishment::*;
pub use order::*;
pub use permission::*;
pub use product::*;
pub use role::*;
pub use transfer::*;
pub use zone::*;
