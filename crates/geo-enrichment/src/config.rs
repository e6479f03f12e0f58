// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 3000;

/// Configuration for one enrichment invocation.
///
/// Built once and passed explicitly into the lookup client and processor;
/// nothing here is read from ambient global state after construction.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Base URL of the geolocation lookup service
    pub lookup_base_url: String,
    /// Client-side deadline for each lookup call
    pub lookup_timeout: Duration,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl EnrichmentConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup_base_url = env::var("OPEN_GEOLOCATION_API_URL")
            .map_err(|_| ConfigError::MissingVar("OPEN_GEOLOCATION_API_URL"))?;
        let lookup_timeout_ms = env::var("GEO_LOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_MS);
        let log_level = env::var("GEO_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());

        let config = Self {
            lookup_base_url,
            lookup_timeout: Duration::from_millis(lookup_timeout_ms),
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "lookup base URL cannot be empty".to_string(),
            ));
        }

        if !self.lookup_base_url.starts_with("http://")
            && !self.lookup_base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidConfig(format!(
                "lookup base URL '{}' must start with http:// or https://",
                self.lookup_base_url
            )));
        }

        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "lookup timeout must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}
