use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures of a single call against the remote contact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response (refused, reset, DNS, ...).
    #[error("Request to contact store failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status with a structured error body.
    #[error("Contact store answered {status}: {}", detail_message(.detail))]
    Server { status: StatusCode, detail: Value },

    /// Non-success status whose body could not be read as the expected structure.
    #[error("Contact store answered {status} with an unreadable error body: '{body}'")]
    MalformedErrorResponse { status: StatusCode, body: String },

    /// Success status, but the payload did not match the expected shape.
    #[error("Could not decode contact store response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Short human readable message, preferring the server's own `error` field.
    pub fn message(&self) -> String {
        match self {
            StoreError::Server { detail, .. } => detail_message(detail),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StoreError::Server { status, .. } | StoreError::MalformedErrorResponse { status, .. } => {
                Some(*status)
            }
            StoreError::Network(err) => err.status(),
            StoreError::Decode(_) => None,
        }
    }
}

fn detail_message(detail: &Value) -> String {
    match detail {
        Value::Object(map) => map
            .get("error")
            .or_else(|| map.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| detail.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error while accessing a file or resource: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} Not found")]
    NotFound(String),

    #[error("Error loading emails: {0}")]
    Load(String),

    #[error("Unrecognized command: '{0}'")]
    ParseCommand(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_error_prefers_error_field() {
        let err = StoreError::Server {
            status: StatusCode::BAD_REQUEST,
            detail: json!({"error": "Invalid input"}),
        };

        assert_eq!(err.message(), "Invalid input");
        assert_eq!(
            err.to_string(),
            "Contact store answered 400 Bad Request: Invalid input"
        );
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn server_error_without_error_field_shows_raw_detail() {
        let err = StoreError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: json!({"code": 7}),
        };

        assert_eq!(err.message(), r#"{"code":7}"#);
    }

    #[test]
    fn confirm_validation_error() {
        let err = AppError::Validation("E-Mail is required".to_string());

        assert_eq!(format!("{}", err), "Validation failed: E-Mail is required");
    }

    #[test]
    fn store_error_is_transparent_in_app_error() {
        let err: AppError = StoreError::MalformedErrorResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>".to_string(),
        }
        .into();

        assert!(err.to_string().contains("unreadable error body"));
    }
}
