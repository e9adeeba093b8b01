// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debezium change-event envelope decoding.
//!
//! Accepts both the bare envelope (`{"before", "after", "op", "source"}`) and
//! the converter-wrapped form (`{"schema": ..., "payload": {...}}`).

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use tgnotify_core::NotifyError;

use crate::outcome::SkipReason;

/// Row operation recorded by the capture feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Operation {
    #[serde(rename = "c")]
    Create,
    #[serde(rename = "u")]
    Update,
    #[serde(rename = "d")]
    Delete,
    /// Initial snapshot read.
    #[serde(rename = "r")]
    Read,
    #[serde(other)]
    Other,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "c",
            Operation::Update => "u",
            Operation::Delete => "d",
            Operation::Read => "r",
            Operation::Other => "?",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    /// Commit time in the source database, epoch milliseconds.
    pub ts_ms: i64,
}

/// A decoded change event.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
    pub op: Operation,
    pub source: Source,
}

impl Envelope {
    /// The `after` snapshot, unless it is absent, `null` or `{}`.
    pub fn after(&self) -> Option<&Value> {
        self.after.as_ref().filter(|v| match v {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        })
    }

    /// Age of the event at `now_ms`. Negative when the source clock is ahead.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.source.ts_ms)
    }

    /// Checks the dispatch gate: a create with a non-empty `after` that is
    /// no older than `freshness`.
    pub fn eligibility(&self, now_ms: i64, freshness: Duration) -> Result<&Value, SkipReason> {
        if self.op != Operation::Create {
            return Err(SkipReason::NotCreate(self.op));
        }
        let after = self.after().ok_or(SkipReason::EmptyPayload)?;
        let age_ms = self.age_ms(now_ms);
        let window_ms = i64::try_from(freshness.as_millis()).unwrap_or(i64::MAX);
        if age_ms > window_ms {
            return Err(SkipReason::Stale { age_ms });
        }
        Ok(after)
    }

    /// Parses the `after` snapshot into a typed row.
    pub fn after_row<T: DeserializeOwned>(&self) -> Result<T, NotifyError> {
        let after = self.after().ok_or_else(|| NotifyError::Decode {
            message: "change event has no after payload".to_string(),
            source: None,
        })?;
        T::deserialize(after).map_err(|e| NotifyError::decode("invalid row payload", e))
    }
}

/// Decodes one stream message.
///
/// An empty body is a heartbeat and yields `Ok(None)`.
pub fn decode(raw: &[u8]) -> Result<Option<Envelope>, NotifyError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let mut value: Value =
        serde_json::from_slice(raw).map_err(|e| NotifyError::decode("invalid change event", e))?;

    if value.get("op").is_none()
        && let Some(payload) = value.get_mut("payload")
    {
        value = payload.take();
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| NotifyError::decode("invalid change event envelope", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WINDOW: Duration = Duration::from_secs(120);

    fn raw(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn empty_body_is_heartbeat() {
        assert!(decode(b"").unwrap().is_none());
        assert!(decode(b"  \n").unwrap().is_none());
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = decode(b"{not json").unwrap_err();
        assert!(matches!(err, NotifyError::Decode { .. }));
    }

    #[test]
    fn missing_op_is_decode_error() {
        let err = decode(&raw(json!({"after": {}, "source": {"ts_ms": 1}}))).unwrap_err();
        assert!(matches!(err, NotifyError::Decode { .. }));
    }

    #[test]
    fn decodes_bare_envelope() {
        let env = decode(&raw(json!({
            "before": null,
            "after": {"msg_id": 1},
            "op": "c",
            "source": {"ts_ms": 1000, "db": "bangumi"}
        })))
        .unwrap()
        .unwrap();
        assert_eq!(env.op, Operation::Create);
        assert_eq!(env.source.ts_ms, 1000);
        assert_eq!(env.after().unwrap()["msg_id"], 1);
    }

    #[test]
    fn decodes_schema_wrapped_envelope() {
        let env = decode(&raw(json!({
            "schema": {"type": "struct"},
            "payload": {"after": {"nt_uid": 3}, "op": "u", "source": {"ts_ms": 5}}
        })))
        .unwrap()
        .unwrap();
        assert_eq!(env.op, Operation::Update);
        assert_eq!(env.source.ts_ms, 5);
    }

    #[test]
    fn unknown_op_decodes_as_other() {
        let env = decode(&raw(json!({"op": "t", "source": {"ts_ms": 5}})))
            .unwrap()
            .unwrap();
        assert_eq!(env.op, Operation::Other);
    }

    #[test]
    fn only_fresh_creates_with_payload_are_eligible() {
        let now = 1_700_000_000_000;
        let make = |op: &str, after: Value, ts: i64| {
            decode(&raw(json!({"op": op, "after": after, "source": {"ts_ms": ts}})))
                .unwrap()
                .unwrap()
        };

        assert!(make("c", json!({"a": 1}), now - 1_000).eligibility(now, WINDOW).is_ok());
        assert!(make("c", json!({"a": 1}), now - 120_000).eligibility(now, WINDOW).is_ok());
        // Source clock ahead of ours.
        assert!(make("c", json!({"a": 1}), now + 5_000).eligibility(now, WINDOW).is_ok());

        for op in ["u", "d", "r"] {
            assert!(matches!(
                make(op, json!({"a": 1}), now).eligibility(now, WINDOW),
                Err(SkipReason::NotCreate(_))
            ));
        }
        for empty in [Value::Null, json!({})] {
            assert_eq!(
                make("c", empty, now).eligibility(now, WINDOW).unwrap_err(),
                SkipReason::EmptyPayload
            );
        }
        assert_eq!(
            make("c", json!({"a": 1}), now - 120_001)
                .eligibility(now, WINDOW)
                .unwrap_err(),
            SkipReason::Stale { age_ms: 120_001 }
        );
    }

    #[test]
    fn after_row_reports_missing_fields() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Row {
            id: i64,
        }
        let env = decode(&raw(json!({"op": "c", "after": {"other": 1}, "source": {"ts_ms": 0}})))
            .unwrap()
            .unwrap();
        assert!(matches!(env.after_row::<Row>(), Err(NotifyError::Decode { .. })));
    }
}
