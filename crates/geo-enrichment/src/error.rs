// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Errors that fail the whole invocation before any entry is processed.
///
/// The decoder makes no attempt at partial recovery: a malformed envelope
/// propagates to the caller, whose infrastructure owns retry and
/// dead-letter handling.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("envelope payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("envelope payload is not a valid gzip stream: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("decompressed batch is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decompressed batch has no logEvents collection")]
    MissingLogEvents,
}

/// Per-record lookup failures, recovered by skipping the record.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("lookup service returned status {0}")]
    Status(StatusCode),

    #[error("lookup transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl LookupError {
    /// True when the failure was the client-side deadline expiring.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Status(_) => false,
        }
    }
}

/// Failures writing an enriched record to the log sink.
///
/// Emission is the pipeline's only output, so these are fatal to the
/// invocation rather than skipped.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to serialize enriched record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write to log sink: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reading or validating the invocation configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let error = DecodeError::MissingLogEvents;
        assert_eq!(
            error.to_string(),
            "decompressed batch has no logEvents collection"
        );
    }

    #[test]
    fn test_lookup_error_display() {
        let error = LookupError::Status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            error.to_string(),
            "lookup service returned status 503 Service Unavailable"
        );
    }

    #[test]
    fn test_status_error_is_not_timeout() {
        let error = LookupError::Status(StatusCode::NOT_FOUND);
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::InvalidConfig("lookup timeout must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: lookup timeout must be greater than 0"
        );
        let error = ConfigError::MissingVar("OPEN_GEOLOCATION_API_URL");
        assert_eq!(
            error.to_string(),
            "missing required environment variable OPEN_GEOLOCATION_API_URL"
        );
    }
}
