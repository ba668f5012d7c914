/// Error types for company-service
///
/// All store and handler failures are converted to `AppError` and rendered
/// as JSON `{"message": ..., "status": ...}` bodies on the REST surface.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

/// Result type for company-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// No caller identity could be extracted from the request
    Unauthorized,

    /// Entity absent, or not owned in single-step-lookup contexts
    NotFound(String),

    /// Entity exists but belongs to another identity (two-step lookups)
    Forbidden(String),

    /// Field constraint violations; carries every violated field
    Validation(Vec<String>),

    /// Operation rejected because dependent rows exist
    Conflict(String),

    /// Malformed request input
    BadRequest(String),

    /// External directory call failed; propagates the upstream status
    Upstream { status: u16, message: String },

    /// Database operation failed
    Database(String),

    /// Unexpected fault
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Forbidden(msg) => write!(f, "{}", msg),
            AppError::Validation(fields) => {
                write!(f, "Validation failed: {}", fields.join(", "))
            }
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Upstream { message, .. } => write!(f, "{}", message),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal details stay in the logs, not in the response body.
        let message = match self {
            AppError::Database(msg) => {
                tracing::error!("database error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = serde_json::json!({
            "message": message,
            "status": status.as_u16(),
        });

        if let AppError::Validation(fields) = self {
            body["errors"] = serde_json::json!(fields);
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

// Validator reports Rust struct field names; the wire contract is the
// camelCase form the serde renames produce.
fn wire_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| wire_field_name(field))
            .collect();
        fields.sort();
        AppError::Validation(fields)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let status = err
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY.as_u16());
        AppError::Upstream {
            status,
            message: "Error fetching companies from external API".to_string(),
        }
    }
}
