//! Error types for the fingerprint collector
//!
//! Every source absorbs its own failures, so these errors rarely cross the
//! pipeline boundary. They exist so that each source can report *why* it
//! degraded, and so that the JS-facing exports have something meaningful
//! to reject with.
//!
//! The taxonomy mirrors the failure classes the pipeline distinguishes:
//! - network failures (geo lookups, delivery)
//! - capability absence (battery API, WebGL, RTCPeerConnection)
//! - timeouts (local network probe)
//! - internal/DOM errors

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Network errors (1xx)
    NetworkFailed = 100,
    HttpStatus = 101,
    MalformedResponse = 102,

    // Capability errors (2xx)
    Unsupported = 200,

    // Timing errors (3xx)
    Timeout = 300,

    // Configuration errors (8xx)
    ConfigError = 800,

    // Internal errors (9xx)
    DomError = 900,
    JsError = 901,
    BuildInFlight = 902,
}

/// Coarse failure class, used for logging and by the JS boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Network,
    Capability,
    Timeout,
    Internal,
}

/// Main error type for the collector
#[derive(Error, Debug, Clone)]
pub enum FingerprintError {
    // ===== Network Errors =====
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    // ===== Capability Errors =====
    #[error("Unsupported: {0}")]
    Unsupported(String),

    // ===== Timing Errors =====
    #[error("Timed out after {0}ms")]
    Timeout(u32),

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ===== Internal Errors =====
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("JS error: {0}")]
    Js(String),

    #[error("A snapshot build is already in flight")]
    BuildInFlight,
}

impl FingerprintError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            FingerprintError::Network(_) => ErrorCode::NetworkFailed,
            FingerprintError::Http { .. } => ErrorCode::HttpStatus,
            FingerprintError::Malformed(_) => ErrorCode::MalformedResponse,
            FingerprintError::Unsupported(_) => ErrorCode::Unsupported,
            FingerprintError::Timeout(_) => ErrorCode::Timeout,
            FingerprintError::Config(_) => ErrorCode::ConfigError,
            FingerprintError::Dom(_) => ErrorCode::DomError,
            FingerprintError::Js(_) => ErrorCode::JsError,
            FingerprintError::BuildInFlight => ErrorCode::BuildInFlight,
        }
    }

    /// Which failure class this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            FingerprintError::Network(_)
            | FingerprintError::Http { .. }
            | FingerprintError::Malformed(_) => ErrorCategory::Network,
            FingerprintError::Unsupported(_) => ErrorCategory::Capability,
            FingerprintError::Timeout(_) => ErrorCategory::Timeout,
            FingerprintError::Config(_)
            | FingerprintError::Dom(_)
            | FingerprintError::Js(_)
            | FingerprintError::BuildInFlight => ErrorCategory::Internal,
        }
    }

    /// Build a `Js` error from a thrown JS value.
    ///
    /// `Debug` of a `JsValue` is the only rendering that works for both
    /// `Error` objects and plain values.
    pub fn from_js(context: &str, value: JsValue) -> Self {
        match value.as_string() {
            Some(msg) => FingerprintError::Js(format!("{}: {}", context, msg)),
            None => FingerprintError::Js(format!("{}: {:?}", context, value)),
        }
    }
}

impl From<FingerprintError> for JsValue {
    fn from(err: FingerprintError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for FingerprintError {
    fn from(err: serde_json::Error) -> Self {
        FingerprintError::Malformed(err.to_string())
    }
}

/// Error information for JavaScript consumption
#[derive(Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&FingerprintError> for ErrorInfo {
    fn from(err: &FingerprintError) -> Self {
        ErrorInfo {
            code: err.code() as u32,
            category: err.category(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            FingerprintError::Network("offline".into()).category(),
            ErrorCategory::Network
        );
        assert_eq!(
            FingerprintError::Http { status: 429, url: "https://ipapi.co".into() }.category(),
            ErrorCategory::Network
        );
        assert_eq!(
            FingerprintError::Unsupported("getBattery".into()).category(),
            ErrorCategory::Capability
        );
        assert_eq!(FingerprintError::Timeout(2000).category(), ErrorCategory::Timeout);
        assert_eq!(FingerprintError::BuildInFlight.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            FingerprintError::Malformed("x".into()).code(),
            ErrorCode::MalformedResponse
        );
        assert_eq!(FingerprintError::BuildInFlight.code(), ErrorCode::BuildInFlight);
    }

    #[test]
    fn test_error_info() {
        let err = FingerprintError::Http { status: 503, url: "https://api.ipify.org".into() };
        let info = ErrorInfo::from(&err);
        assert_eq!(info.code, 101);
        assert_eq!(info.category, ErrorCategory::Network);
        assert_eq!(info.message, "HTTP 503 from https://api.ipify.org");
    }

    #[test]
    fn test_serde_json_error_is_malformed() {
        let err: FingerprintError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::MalformedResponse);
    }
}
