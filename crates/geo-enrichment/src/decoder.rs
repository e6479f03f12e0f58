// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batch decoding: base64 envelope, gzip stream, JSON batch parse.
//!
//! The decoder is a pure transformation with a single failure mode: any
//! malformed stage fails the whole invocation before an entry is
//! processed. Per-record problems are the processor's concern, not ours.

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::GzDecoder;
use serde::Deserialize;

use crate::error::DecodeError;

/// The compressed, base64-encoded batch delivered per invocation.
///
/// Wire shape: `{ "data": "<base64 of gzip bytes>" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Base64 text of the gzip-compressed batch
    pub data: String,
}

/// One raw log line plus delivery metadata, as decoded from the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEvent {
    /// The raw log line; itself JSON text of the access record.
    pub message: String,
    /// Ingestion timestamp in epoch milliseconds; passed through unused.
    #[serde(default)]
    pub timestamp: i64,
    /// Sequencing token assigned by the delivery pipe; passed through unused.
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct LogBatch {
    #[serde(rename = "logEvents")]
    log_events: Option<Vec<LogEvent>>,
}

/// Decodes one envelope into its ordered sequence of log events.
///
/// Base64-decodes the payload, inflates the gzip stream, parses the result
/// as JSON, and extracts the `logEvents` collection in its original order.
/// Idempotent: the same envelope always yields the same sequence.
pub fn decode_envelope(envelope: &Envelope) -> Result<Vec<LogEvent>, DecodeError> {
    let compressed = STANDARD.decode(envelope.data.as_bytes())?;

    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut decompressed = String::new();
    decoder.read_to_string(&mut decompressed)?;

    let batch: LogBatch = serde_json::from_str(&decompressed)?;
    batch.log_events.ok_or(DecodeError::MissingLogEvents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn encode_envelope(batch_json: &str) -> Envelope {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(batch_json.as_bytes())
            .expect("gzip write failed");
        let compressed = encoder.finish().expect("gzip finish failed");
        Envelope {
            data: STANDARD.encode(compressed),
        }
    }

    #[test]
    fn test_decode_preserves_entry_order() {
        let envelope = encode_envelope(
            r#"{"logEvents":[
                {"id":"e-1","timestamp":1,"message":"first"},
                {"id":"e-2","timestamp":2,"message":"second"},
                {"id":"e-3","timestamp":3,"message":"third"}
            ]}"#,
        );

        let entries = decode_envelope(&envelope).expect("decode failed");
        let messages: Vec<&str> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(entries[0].id, "e-1");
        assert_eq!(entries[2].timestamp, 3);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let envelope = encode_envelope(r#"{"logEvents":[{"message":"only"}]}"#);

        let first = decode_envelope(&envelope).expect("first decode failed");
        let second = decode_envelope(&envelope).expect("second decode failed");
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].message, second[0].message);
    }

    #[test]
    fn test_decode_tolerates_missing_delivery_metadata() {
        let envelope = encode_envelope(r#"{"logEvents":[{"message":"bare"}]}"#);

        let entries = decode_envelope(&envelope).expect("decode failed");
        assert_eq!(entries[0].message, "bare");
        assert_eq!(entries[0].timestamp, 0);
        assert!(entries[0].id.is_empty());
    }

    #[test]
    fn test_invalid_base64_is_fatal() {
        let envelope = Envelope {
            data: "not!!valid@@base64".to_string(),
        };
        assert!(matches!(
            decode_envelope(&envelope),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_non_gzip_payload_is_fatal() {
        let envelope = Envelope {
            data: STANDARD.encode(b"plain bytes, no gzip header"),
        };
        assert!(matches!(
            decode_envelope(&envelope),
            Err(DecodeError::Decompress(_))
        ));
    }

    #[test]
    fn test_invalid_batch_json_is_fatal() {
        let envelope = encode_envelope("{ this is not json");
        assert!(matches!(
            decode_envelope(&envelope),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_missing_log_events_collection_is_fatal() {
        let envelope = encode_envelope(r#"{"messageType":"CONTROL"}"#);
        assert!(matches!(
            decode_envelope(&envelope),
            Err(DecodeError::MissingLogEvents)
        ));
    }
}
