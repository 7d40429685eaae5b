//! 统一错误处理
//!
//! Re-exports the shared error types and adds the validator conversion
//! used by handlers.

use validator::Validate;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Run `validator` rules on a request payload
///
/// The first failing field is reported in `details.field`.
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_default();
        AppError::validation(errors.to_string()).with_detail("field", field)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ZoneCreate;

    #[test]
    fn test_validate_payload_reports_field() {
        let payload = ZoneCreate {
            name: String::new(),
            description: None,
            color: None,
            display_order: None,
        };
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "name");
    }
}
