// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Record types flowing through the pipeline: the parsed access record,
//! the lookup service's response, and the emitted enriched record.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Parsed request fields extracted from one access-log message.
///
/// All four fields are required: a message missing any of them is a parse
/// failure, never a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessRecord {
    /// Client address
    pub ip: String,
    /// HTTP status code of the logged request
    pub status: u16,
    /// Request route template
    #[serde(rename = "resourcePath")]
    pub path: String,
    /// HTTP verb
    #[serde(rename = "httpMethod")]
    pub method: String,
}

impl AccessRecord {
    /// Parses one log event's message text.
    pub fn parse(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }
}

/// Country/city data returned by the lookup service for one IP.
///
/// Either field may be absent depending on lookup coverage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoResult {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// The terminal output unit: access fields, geo fields, and the emission
/// timestamp. Serialized field order matches the emitted wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecord {
    pub country: Option<String>,
    pub city: Option<String>,
    /// RFC 3339 timestamp taken at emission time, not log-creation time.
    pub timestamp: String,
    pub ip: String,
    pub path: String,
    pub method: String,
    pub status: u16,
}

impl EnrichedRecord {
    /// Combines a parsed record with its lookup result, stamping the
    /// current wall-clock time.
    #[must_use]
    pub fn new(record: AccessRecord, geo: GeoResult) -> Self {
        Self {
            country: geo.country,
            city: geo.city,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ip: record.ip,
            path: record.path,
            method: record.method,
            status: record.status,
        }
    }

    /// Renders the record as one structured log line:
    /// `{"geo_api_data":{...}}`.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Line<'a> {
            geo_api_data: &'a EnrichedRecord,
        }
        serde_json::to_string(&Line { geo_api_data: self })
    }
}
