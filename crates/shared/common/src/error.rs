//! Unified error handling for HTTP.
//!
//! Every error renders as a flat `{ "code", "message" }` envelope. Each error
//! belongs to a layer (`domain`, `application`, `infrastructure`) that is only
//! used for logging; infrastructure details never reach the caller.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Business rule or reference violation raised by the domain
    #[error(transparent)]
    Domain(DomainError),

    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Layer an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLayer {
    Domain,
    Application,
    Infrastructure,
}

impl ErrorLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLayer::Domain => "domain",
            ErrorLayer::Application => "application",
            ErrorLayer::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    #[cfg_attr(feature = "openapi", schema(example = "INVALID_TRANSITION"))]
    pub code: String,
    #[cfg_attr(feature = "openapi", schema(example = "cannot move from RECEIVED to IN_EXECUTION"))]
    pub message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => e.code(),
            AppError::Unauthorized => "UNAUTHORIZED",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "UNAUTHORIZED",
            AppError::Validation(_) => "INVALID_INPUT",
            #[cfg(feature = "database")]
            AppError::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => domain_status(e),
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            #[cfg(feature = "database")]
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the layer the error belongs to
    pub fn layer(&self) -> ErrorLayer {
        match self {
            AppError::Domain(DomainError::Internal(_)) => ErrorLayer::Infrastructure,
            AppError::Domain(_) => ErrorLayer::Domain,
            AppError::Unauthorized | AppError::Validation(_) => ErrorLayer::Application,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => ErrorLayer::Application,
            #[cfg(feature = "database")]
            AppError::Database(_) => ErrorLayer::Infrastructure,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(DomainError::Internal(_)) => "An internal error occurred".to_string(),
            AppError::Domain(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
            #[cfg(feature = "database")]
            AppError::Database(_) => "A database error occurred".to_string(),
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "Invalid or expired token".to_string(),
            _ => self.to_string(),
        }
    }

    /// Internal detail for logs
    fn detail(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(e) => e.to_string(),
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => e.to_string(),
            AppError::Domain(e) => e.to_string(),
            _ => self.to_string(),
        }
    }

    /// Envelope sent to the caller
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.user_message(),
        }
    }
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) | DomainError::SoftDeleted { .. } => StatusCode::BAD_REQUEST,
        DomainError::UnknownReference { .. } | DomainError::NotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::InvalidTransition { .. }
        | DomainError::InvalidOrderState { .. }
        | DomainError::InvalidRepairState { .. }
        | DomainError::PendingAdditionalRepairs { .. }
        | DomainError::InsufficientStock { .. }
        | DomainError::AlreadyPaid(_)
        | DomainError::AmountMismatch { .. }
        | DomainError::OrderNotPayable(_) => StatusCode::CONFLICT,
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let layer = self.layer();

        match layer {
            ErrorLayer::Infrastructure => tracing::error!(
                layer = %layer,
                code = self.code(),
                detail = %self.detail(),
                "request failed"
            ),
            _ => tracing::warn!(
                layer = %layer,
                code = self.code(),
                message = %self.user_message(),
                "request rejected"
            ),
        }

        (status, Json(self.body())).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            other => AppError::Domain(other),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, ReferenceKind};

    #[test]
    fn test_domain_codes_and_statuses() {
        let cases = [
            (
                DomainError::InvalidTransition {
                    from: "RECEIVED".into(),
                    to: "IN_EXECUTION".into(),
                },
                "INVALID_TRANSITION",
                StatusCode::CONFLICT,
            ),
            (
                DomainError::InsufficientStock {
                    part_id: 1,
                    requested: 2,
                    available: 1,
                },
                "INSUFFICIENT_STOCK",
                StatusCode::CONFLICT,
            ),
            (DomainError::AlreadyPaid(3), "ALREADY_PAID", StatusCode::CONFLICT),
            (
                DomainError::AmountMismatch {
                    expected: "200.00".parse::<Money>().unwrap(),
                    received: "199.99".parse::<Money>().unwrap(),
                },
                "AMOUNT_MISMATCH",
                StatusCode::CONFLICT,
            ),
            (
                DomainError::OrderNotPayable("IN_EXECUTION".into()),
                "ORDER_NOT_PAYABLE",
                StatusCode::CONFLICT,
            ),
            (
                DomainError::unknown(ReferenceKind::Customer, 9),
                "UNKNOWN_REFERENCE",
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::SoftDeleted {
                    kind: ReferenceKind::Part,
                    id: 2,
                },
                "SOFT_DELETED",
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::not_found(ReferenceKind::Payment, 5),
                "NOT_FOUND",
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, code, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.code(), code);
            assert_eq!(app.status(), status);
            assert_eq!(app.layer(), ErrorLayer::Domain);
        }
    }

    #[test]
    fn test_domain_validation_becomes_invalid_input() {
        let app: AppError = DomainError::validation("quantity must be at least 1").into();
        assert!(matches!(app, AppError::Validation(_)));
        assert_eq!(app.code(), "INVALID_INPUT");
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.layer(), ErrorLayer::Application);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let app: AppError = DomainError::internal("bad status column").into();
        assert_eq!(app.code(), "INTERNAL_ERROR");
        assert_eq!(app.layer(), ErrorLayer::Infrastructure);
        assert_eq!(app.user_message(), "An internal error occurred");
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!app.body().message.contains("column"));
    }

    #[test]
    fn test_envelope_is_flat() {
        let body = AppError::Unauthorized.body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "UNAUTHORIZED", "message": "Authentication required" })
        );
    }
}
