// ── Recorded feed messages ──
//
// A recorded session is one JSON document per line: either a raw activity
// state exactly as published by the device, or a `{"connected": bool}`
// marker for transport connectivity changes.

use std::sync::Arc;

use serde::Deserialize;

use super::FeedMessage;
use crate::error::Error;
use crate::model::ActivityState;

#[derive(Debug, Deserialize)]
struct ConnectivityRecord {
    connected: bool,
}

/// Decode a single recorded feed line into a [`FeedMessage`].
pub fn parse_record(text: &str) -> Result<FeedMessage, Error> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text.to_owned(),
        })?;

    if value.get("state_machine").is_some() {
        return serde_json::from_value::<ActivityState>(value)
            .map(|state| FeedMessage::Activity(Arc::new(state)))
            .map_err(|e| {
                tracing::debug!(error = %e, "failed to decode activity state");
                Error::Deserialization {
                    message: e.to_string(),
                    body: text.to_owned(),
                }
            });
    }

    serde_json::from_value::<ConnectivityRecord>(value)
        .map(|record| FeedMessage::Connectivity(record.connected))
        .map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text.to_owned(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SessionLevel;

    const ACTIVITY: &str = r#"{
        "left_safety_clip": 1, "right_safety_clip": 1,
        "event": "status_requested", "event_time_ms": 1620000000000,
        "system_state": "normal",
        "state_machine": {
            "state": "ONLINE", "up_transition": "NONE", "down_transition": "NONE",
            "since_session_start_ms": -1, "is_active_session": "false",
            "session_id": "0", "hold": "off", "audio": "on",
            "sticky_white_noise": "off", "weaning": "off", "time_left": -1
        }
    }"#;

    #[test]
    fn parses_activity_record() {
        match parse_record(ACTIVITY) {
            Ok(FeedMessage::Activity(state)) => {
                assert_eq!(state.state_machine.state, SessionLevel::Online);
                assert_eq!(state.state_machine.since_session_start, None);
            }
            other => panic!("expected activity, got {other:?}"),
        }
    }

    #[test]
    fn parses_connectivity_record() {
        assert!(matches!(
            parse_record(r#"{"connected": false}"#),
            Ok(FeedMessage::Connectivity(false))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_record("not json at all").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn broken_activity_reports_field_error() {
        let broken = ACTIVITY.replace(r#""hold": "off""#, r#""hold": "sideways""#);
        match parse_record(&broken) {
            Err(Error::Deserialization { message, body }) => {
                assert!(message.contains("sideways"), "message was: {message}");
                assert_eq!(body, broken);
            }
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_object_is_rejected() {
        assert!(parse_record(r#"{"hello": "world"}"#).is_err());
    }
}
