//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::EstablishmentNotFound
            | Self::OrderNotFound
            | Self::OrderLineNotFound
            | Self::ProductNotFound
            | Self::SupplementNotFound
            | Self::TableNotFound
            | Self::ZoneNotFound
            | Self::EmployeeNotFound
            | Self::RoleNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderNotInProgress
            | Self::TableOccupied
            | Self::TableNoOpenOrder
            | Self::TableNumberExists
            | Self::TableHasOrders
            | Self::ZoneHasTables
            | Self::ZoneNameExists
            | Self::EmployeeUsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::CannotManageUser
            | Self::EmployeeCannotModifySelf
            | Self::RoleImmutable => StatusCode::FORBIDDEN,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::OrderMergeSelf
            | Self::OrderDiscountTooLarge
            | Self::ProductInvalidPrice
            | Self::PermissionUnknown => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
