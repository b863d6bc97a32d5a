use thiserror::Error;

/// Errors produced by remote ledger API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("API request failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: check the configured API key")]
    Unauthorized,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api { status, message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_status() {
        let err = ApiError::api(409, "amount locked");
        assert!(err.to_string().contains("409"));
        assert!(err.to_string().contains("amount locked"));
    }

    #[test]
    fn not_found_names_id() {
        let err = ApiError::NotFound("tx-42".into());
        assert!(err.to_string().contains("tx-42"));
    }
}
