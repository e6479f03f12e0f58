// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Enrichment pipeline for compressed access-log batches.
//!
//! One invocation consumes one [`decoder::Envelope`], decodes it into an
//! ordered sequence of log events, and runs each event through the
//! [`processor::EnrichmentProcessor`]: parse the request fields, resolve
//! country/city for the client IP via the external lookup service, and emit
//! one structured line per successfully enriched record.
//!
//! The library is organized into:
//! - [`decoder`]: envelope decoding (base64, gzip, JSON batch parse)
//! - [`record`]: the access-record, geo-result, and enriched-record types
//! - [`lookup`]: the HTTP client for the geolocation lookup service
//! - [`processor`]: the per-record pipeline and its emit sink seam
//! - [`config`]: environment-driven configuration
//! - [`error`]: the error taxonomy (fatal decode errors, per-record
//!   lookup failures, sink failures)

#![deny(clippy::all)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod lookup;
pub mod processor;
pub mod record;

pub use config::EnrichmentConfig;
pub use decoder::{decode_envelope, Envelope, LogEvent};
pub use error::{ConfigError, DecodeError, EmitError, LookupError};
pub use lookup::GeoLookupClient;
pub use processor::{BatchSummary, EmitSink, EnrichmentProcessor, StdoutSink};
pub use record::{AccessRecord, EnrichedRecord, GeoResult};
