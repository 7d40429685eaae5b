//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Establishment errors
//! - 4xxx: Order errors
//! - 6xxx: Product errors
//! - 7xxx: Table / zone errors
//! - 8xxx: Employee / role errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the web client can branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password or PIN)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Actor cannot manage a user of this role
    CannotManageUser = 2004,

    // ==================== 3xxx: Establishment ====================
    /// Establishment not found
    EstablishmentNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is not in progress (already paid or cancelled)
    OrderNotInProgress = 4002,
    /// Order line not found
    OrderLineNotFound = 4003,
    /// Cannot merge an order into itself
    OrderMergeSelf = 4004,
    /// Discount exceeds the order amount
    OrderDiscountTooLarge = 4005,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Catalog supplement not found
    SupplementNotFound = 6101,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table already has an order in progress
    TableOccupied = 7002,
    /// Source table has no order in progress
    TableNoOpenOrder = 7003,
    /// Table number already exists
    TableNumberExists = 7004,
    /// Table has an order in progress
    TableHasOrders = 7005,
    /// Source and destination table are the same
    /// Zone not found
    ZoneNotFound = 7101,
    /// Zone has tables
    ZoneHasTables = 7102,
    /// Zone name already exists
    ZoneNameExists = 7103,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Employee username already exists
    EmployeeUsernameExists = 8002,
    /// Cannot modify own role or status
    EmployeeCannotModifySelf = 8003,
    /// Unknown role name
    RoleNotFound = 8101,
    /// Role permissions cannot be changed
    RoleImmutable = 8104,
    /// Unknown permission string
    PermissionUnknown = 8105,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::CannotManageUser => "Cannot manage a user of this role",

            // Establishment
            ErrorCode::EstablishmentNotFound => "Establishment not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderNotInProgress => "Order is not in progress",
            ErrorCode::OrderLineNotFound => "Order line not found",
            ErrorCode::OrderMergeSelf => "Cannot merge an order into itself",
            ErrorCode::OrderDiscountTooLarge => "Discount exceeds order amount",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::SupplementNotFound => "Supplement not found",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableNoOpenOrder => "Table has no order in progress",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::TableHasOrders => "Table has an order in progress",
            ErrorCode::ZoneNotFound => "Zone not found",
            ErrorCode::ZoneHasTables => "Zone has associated tables",
            ErrorCode::ZoneNameExists => "Zone name already exists",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeUsernameExists => "Employee username already exists",
            ErrorCode::EmployeeCannotModifySelf => "Cannot modify own role or status",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleImmutable => "Role permissions cannot be modified",
            ErrorCode::PermissionUnknown => "Unknown permission",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2004 => Ok(ErrorCode::CannotManageUser),

            // Establishment
            3001 => Ok(ErrorCode::EstablishmentNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNotInProgress),
            4003 => Ok(ErrorCode::OrderLineNotFound),
            4004 => Ok(ErrorCode::OrderMergeSelf),
            4005 => Ok(ErrorCode::OrderDiscountTooLarge),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::SupplementNotFound),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::TableNoOpenOrder),
            7004 => Ok(ErrorCode::TableNumberExists),
            7005 => Ok(ErrorCode::TableHasOrders),
            7101 => Ok(ErrorCode::ZoneNotFound),
            7102 => Ok(ErrorCode::ZoneHasTables),
            7103 => Ok(ErrorCode::ZoneNameExists),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeUsernameExists),
            8003 => Ok(ErrorCode::EmployeeCannotModifySelf),
            8101 => Ok(ErrorCode::RoleNotFound),
            8104 => Ok(ErrorCode::RoleImmutable),
            8105 => Ok(ErrorCode::PermissionUnknown),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TableOccupied,
            ErrorCode::OrderNotInProgress,
            ErrorCode::RoleImmutable,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code_is_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableNoOpenOrder).unwrap();
        assert_eq!(json, "7003");
        let code: ErrorCode = serde_json::from_str("7101").unwrap();
        assert_eq!(code, ErrorCode::ZoneNotFound);
    }

    #[test]
    fn test_display_is_prefixed() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::TableNotFound.to_string(), "E7001");
    }
}
