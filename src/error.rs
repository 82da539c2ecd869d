//! SDK error types, error codes, and global last-error storage.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────────────

pub const SUCCESS: i32 = 0;
pub const ERROR_INVALID_PARAM: i32 = -1;
pub const ERROR_NOT_INITIALIZED: i32 = -2;
pub const ERROR_NOT_FOUND: i32 = -3;
pub const ERROR_INTERNAL: i32 = -5;
pub const ERROR_NETWORK: i32 = -7;
pub const ERROR_CONFIG: i32 = -8;
pub const ERROR_PARSE: i32 = -9;
pub const ERROR_STORAGE: i32 = -10;

// ── SdkError enum ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Not initialized")]
    NotInitialized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SdkError {
    /// Map this error to its integer error code for the C API.
    pub fn code(&self) -> i32 {
        match self {
            SdkError::Network(_) => ERROR_NETWORK,
            SdkError::Parse(_) => ERROR_PARSE,
            SdkError::Config(_) => ERROR_CONFIG,
            SdkError::Storage(_) => ERROR_STORAGE,
            SdkError::InvalidParam(_) => ERROR_INVALID_PARAM,
            SdkError::NotInitialized => ERROR_NOT_INITIALIZED,
            SdkError::NotFound(_) => ERROR_NOT_FOUND,
            SdkError::Internal(_) => ERROR_INTERNAL,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Parse(e.to_string())
    }
}

// ── Last-error storage ──────────────────────────────────────────────────────

static LAST_ERROR: Lazy<Mutex<Option<String>>> = Lazy::new(|| Mutex::new(None));
static LAST_ERROR_CODE: Lazy<Mutex<i32>> = Lazy::new(|| Mutex::new(SUCCESS));

/// Store an `SdkError`, recording both the message and code.
pub fn set_sdk_error(err: &SdkError) {
    *LAST_ERROR_CODE.lock() = err.code();
    *LAST_ERROR.lock() = Some(err.to_string());
}

/// Clear the stored error.
pub fn clear_error() {
    *LAST_ERROR.lock() = None;
    *LAST_ERROR_CODE.lock() = SUCCESS;
}

/// Take the last error message, leaving `None` behind.
pub fn take_last_error() -> Option<String> {
    LAST_ERROR.lock().take()
}

/// Return the last error code without clearing it.
pub fn last_error_code() -> i32 {
    *LAST_ERROR_CODE.lock()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_negative() {
        let errors = [
            SdkError::Network("x".into()),
            SdkError::Parse("x".into()),
            SdkError::Config("x".into()),
            SdkError::Storage("x".into()),
            SdkError::InvalidParam("x".into()),
            SdkError::NotInitialized,
            SdkError::NotFound("x".into()),
            SdkError::Internal("x".into()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        assert!(codes.iter().all(|c| *c < 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: SdkError = serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert_eq!(err.code(), ERROR_PARSE);
        assert!(err.to_string().starts_with("Parse error"));
    }
}
