// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::io::Read;
use std::process::ExitCode;
use std::{env, fs, io};

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use geo_enrichment::config::EnrichmentConfig;
use geo_enrichment::decoder::{self, Envelope};
use geo_enrichment::lookup::GeoLookupClient;
use geo_enrichment::processor::{EnrichmentProcessor, StdoutSink};

#[tokio::main]
pub async fn main() -> ExitCode {
    let log_level = env::var("GEO_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    // Keep the HTTP stack's own chatter out of the sink this process
    // writes enriched lines to.
    let env_filter = format!("h2=off,hyper=off,reqwest=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .with_writer(io::stderr)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Starting access-log geolocation enrichment");

    let config = match EnrichmentConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Error creating config on enrichment agent startup: {e}");
            return ExitCode::FAILURE;
        }
    };

    // One envelope per invocation: a file path argument, or stdin.
    let raw = match read_envelope_input() {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read envelope input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let envelope: Envelope = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Envelope is not valid JSON: {e}");
            return ExitCode::FAILURE;
        }
    };

    let entries = match decoder::decode_envelope(&envelope) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to decode envelope: {e}");
            return ExitCode::FAILURE;
        }
    };
    debug!("Decoded {} log events", entries.len());

    let lookup = match GeoLookupClient::new(&config) {
        Ok(lookup) => lookup,
        Err(e) => {
            error!("Failed to build lookup client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let processor = EnrichmentProcessor::new(lookup);
    let mut sink = StdoutSink;

    match processor.process_batch(entries, &mut sink).await {
        Ok(summary) => {
            info!(
                "Processed batch: received={} emitted={} parse_skipped={} lookup_skipped={}",
                summary.received, summary.emitted, summary.parse_skipped, summary.lookup_skipped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write enriched record: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_envelope_input() -> Result<String, io::Error> {
    match env::args().nth(1) {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}
