// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade, so the helpers are no-ops until a recorder
//! is installed.

use metrics::describe_counter;

/// Register all tgnotify metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "tgnotify_events_total",
        "Change events handled, by kind and outcome"
    );
    describe_counter!(
        "tgnotify_deliveries_total",
        "Telegram delivery attempts, by outcome"
    );
    describe_counter!(
        "tgnotify_chats_disabled_total",
        "Chat links disabled after a permanent delivery failure"
    );
    describe_counter!(
        "tgnotify_stream_errors_total",
        "Transport errors while reading the event stream"
    );
    describe_counter!("tgnotify_oauth_links_total", "Chats linked through OAuth");
}

/// Record one handled change event.
pub fn record_event(kind: &'static str, outcome: &'static str) {
    metrics::counter!("tgnotify_events_total", "kind" => kind, "outcome" => outcome).increment(1);
}

/// Record one delivery attempt.
pub fn record_delivery(outcome: &'static str) {
    metrics::counter!("tgnotify_deliveries_total", "outcome" => outcome).increment(1);
}

pub fn record_chat_disabled() {
    metrics::counter!("tgnotify_chats_disabled_total").increment(1);
}

pub fn record_stream_error() {
    metrics::counter!("tgnotify_stream_errors_total").increment(1);
}

pub fn record_oauth_link() {
    metrics::counter!("tgnotify_oauth_links_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn helpers_reach_the_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_event("notification", "delivered");
            record_delivery("sent");
            record_delivery("sent");
            record_chat_disabled();
        });
        let text = handle.render();
        assert!(text.contains(r#"tgnotify_events_total{kind="notification",outcome="delivered"} 1"#));
        assert!(text.contains(r#"tgnotify_deliveries_total{outcome="sent"} 2"#));
        assert!(text.contains("tgnotify_chats_disabled_total 1"));
    }
}
