use thiserror::Error;

/// Unified error type for the entire bridge-stats-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Data ────────────────────────────────────────────────────────
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A fetch was superseded by a newer generation or the source was stopped.
    /// This is the normal outcome of a filter change, never a failure.
    #[error("Request cancelled")]
    Cancelled,
}

impl CoreError {
    /// True for the expected "superseded" outcome, false for real failures.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CoreError::Cancelled)
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<chrono::ParseError> for CoreError {
    fn from(e: chrono::ParseError) -> Self {
        CoreError::InvalidDate(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Keep the endpoint path but drop the query string: filter parameters
        // (addresses) make log lines noisy and are already carried in the span.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        if e.is_decode() {
            CoreError::Deserialization(sanitized)
        } else if let Some(status) = e.status() {
            CoreError::HttpStatus {
                endpoint: e
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
                status: status.as_u16(),
            }
        } else {
            CoreError::Network(sanitized)
        }
    }
}
