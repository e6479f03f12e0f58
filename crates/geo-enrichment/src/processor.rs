// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-record enrichment pipeline.
//!
//! Straight-line processing with two failure exits and one success exit
//! per entry:
//!
//! ```text
//!    LogEvent
//!        │
//!        v
//!   ┌──────────┐  parse failure
//!   │  Parser  │ ────────────────> skip entry
//!   └────┬─────┘
//!        │
//!        v
//!   ┌──────────┐  non-200 / timeout / transport
//!   │  Lookup  │ ────────────────> skip entry
//!   └────┬─────┘
//!        │
//!        v
//!   ┌──────────┐
//!   │   Emit   │  one line per enriched record
//!   └──────────┘
//! ```
//!
//! Entries are handled strictly in input order and the next lookup is not
//! issued until the previous one has settled, which bounds outbound
//! connections against the rate-limited lookup service to one at a time.

use std::io::Write;

use tracing::debug;

use crate::decoder::LogEvent;
use crate::error::EmitError;
use crate::lookup::GeoLookupClient;
use crate::record::{AccessRecord, EnrichedRecord};

/// Seam between the processor and the log sink receiving enriched lines.
pub trait EmitSink {
    /// Writes one enriched record as a single structured line.
    fn emit(&mut self, record: &EnrichedRecord) -> Result<(), EmitError>;
}

/// Sink writing one JSON line per enriched record to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl EmitSink for StdoutSink {
    fn emit(&mut self, record: &EnrichedRecord) -> Result<(), EmitError> {
        let line = record.to_line()?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        Ok(())
    }
}

/// Outcome counters for one processed batch.
///
/// Dropped records never reach the output stream; the counters are the
/// only place a drop is visible, so the caller should log them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Entries decoded from the envelope
    pub received: usize,
    /// Records enriched and written to the sink
    pub emitted: usize,
    /// Entries skipped because the message failed to parse
    pub parse_skipped: usize,
    /// Entries skipped because the lookup did not succeed
    pub lookup_skipped: usize,
}

/// Runs decoded log events through parse, lookup, and emission.
pub struct EnrichmentProcessor {
    lookup: GeoLookupClient,
}

impl EnrichmentProcessor {
    #[must_use]
    pub fn new(lookup: GeoLookupClient) -> Self {
        Self { lookup }
    }

    /// Processes every entry of one decoded batch, strictly in order.
    ///
    /// A parse failure or a failed lookup skips that entry and the batch
    /// continues; emission order for the surviving records matches input
    /// order. A sink failure is fatal: emission is the pipeline's only
    /// output, and continuing past a broken sink would silently discard
    /// every remaining record.
    pub async fn process_batch(
        &self,
        entries: Vec<LogEvent>,
        sink: &mut dyn EmitSink,
    ) -> Result<BatchSummary, EmitError> {
        let mut summary = BatchSummary {
            received: entries.len(),
            ..BatchSummary::default()
        };

        for entry in entries {
            let record = match AccessRecord::parse(&entry.message) {
                Ok(record) => record,
                Err(e) => {
                    debug!("skipping entry with unparseable message: {e}");
                    summary.parse_skipped += 1;
                    continue;
                }
            };

            let geo = match self.lookup.lookup(&record.ip).await {
                Ok(geo) => geo,
                Err(e) => {
                    debug!("skipping entry for {}: {e}", record.ip);
                    summary.lookup_skipped += 1;
                    continue;
                }
            };

            sink.emit(&EnrichedRecord::new(record, geo))?;
            summary.emitted += 1;
        }

        Ok(summary)
    }
}
