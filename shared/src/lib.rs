//! Shared types for Oréma N+
//!
//! Domain models, unified error codes and small utilities used by the
//! server and by any Rust client talking to its API.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
