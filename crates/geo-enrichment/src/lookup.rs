// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the external IP-to-geolocation lookup service.

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::EnrichmentConfig;
use crate::error::LookupError;
use crate::record::GeoResult;

/// Client for the geolocation lookup service.
///
/// Built once per invocation and reused across records so the underlying
/// connection can be reused; each request carries the configured timeout.
/// The service is unauthenticated, so no credential handling is involved.
#[derive(Debug, Clone)]
pub struct GeoLookupClient {
    client: Client,
    base_url: String,
}

impl GeoLookupClient {
    /// Builds the client with the configured per-request timeout.
    pub fn new(config: &EnrichmentConfig) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(config.lookup_timeout).build()?;

        // Normalized so the /json/<ip> path can be appended directly.
        let base_url = config.lookup_base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Resolves country/city data for one client IP.
    ///
    /// Issues `GET <base-url>/json/<ip>` and parses the body on a 200
    /// response. Non-200 statuses, timeouts, and transport failures all
    /// surface as [`LookupError`]; the caller decides whether to skip or
    /// fail. No retry is attempted here.
    pub async fn lookup(&self, ip: &str) -> Result<GeoResult, LookupError> {
        let url = format!("{}/json/{}", self.base_url, ip);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<GeoResult>().await?),
            status => {
                debug!("lookup for {ip} answered with status {status}");
                Err(LookupError::Status(status))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}
