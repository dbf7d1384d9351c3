//! Inbound frame decoding.
//!
//! Snapshots arrive one per WebSocket text frame, so frames are
//! self-delimiting and decoding is a size check followed by JSON parsing.
//! The snapshot shape is server-defined and is not validated here.

use videowatch_core::StatusSnapshot;

use crate::MAX_SNAPSHOT_SIZE;
use crate::error::{ProtocolError, ProtocolResult};

/// Decodes one inbound text frame into a status snapshot.
pub fn decode_snapshot(text: &str) -> ProtocolResult<StatusSnapshot> {
    if text.len() > MAX_SNAPSHOT_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: text.len(),
            max: MAX_SNAPSHOT_SIZE,
        });
    }
    if text.trim().is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    let value = serde_json::from_str(text)?;
    Ok(StatusSnapshot::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_object_snapshot() {
        let snapshot = decode_snapshot(r#"{"appInfo":{"version":"1.0"},"clientsInfo":{}}"#)
            .unwrap();
        assert!(snapshot.get("appInfo").is_some());
        assert!(snapshot.get("clientsInfo").is_some());
        assert!(snapshot.get("missing").is_none());
    }

    #[test]
    fn decodes_nested_values() {
        let snapshot =
            decode_snapshot(r#"{"bandwidthInfo":{"bytesRead":2048,"bytesWritten":500}}"#).unwrap();
        let bandwidth = snapshot.get("bandwidthInfo").unwrap();
        assert_eq!(bandwidth["bytesRead"], 2048);
        assert_eq!(bandwidth["bytesWritten"], 500);
    }

    #[test]
    fn shape_is_not_validated() {
        // Any valid JSON passes through; consumers decide what to do with it.
        assert!(decode_snapshot("[1,2,3]").is_ok());
        assert!(decode_snapshot("42").is_ok());
        assert!(decode_snapshot(r#""just a string""#).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = decode_snapshot("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Parse(_)));
    }

    #[test]
    fn empty_frame_is_rejected() {
        assert!(matches!(
            decode_snapshot(""),
            Err(ProtocolError::EmptyMessage)
        ));
        assert!(matches!(
            decode_snapshot("   \n"),
            Err(ProtocolError::EmptyMessage)
        ));
    }

    #[test]
    fn oversize_frame_is_rejected() {
        let huge = format!(r#"{{"blob":"{}"}}"#, "x".repeat(MAX_SNAPSHOT_SIZE));
        let err = decode_snapshot(&huge).unwrap_err();
        match err {
            ProtocolError::MessageTooLarge { size, max } => {
                assert!(size > max);
                assert_eq!(max, MAX_SNAPSHOT_SIZE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
