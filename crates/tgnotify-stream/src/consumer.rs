// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The consumption loop.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tgnotify_core::NotifyError;
use tgnotify_dispatch::{DispatchReport, Dispatcher};

use crate::router::TopicRouter;
use crate::{EventSource, StreamMessage};

/// Reads and dispatches events until `cancel` fires.
///
/// Events are handled strictly one after another. No error stops the loop:
/// transport errors, undecodable events and failed lookups are logged and
/// the next message is read.
pub async fn run(
    source: &dyn EventSource,
    dispatcher: &Dispatcher,
    router: &TopicRouter,
    cancel: CancellationToken,
) {
    info!("stream consumer running");

    loop {
        tokio::select! {
            next = source.next() => match next {
                Ok(message) => {
                    handle_message(dispatcher, router, &message).await;
                }
                Err(e) => {
                    tgnotify_prometheus::record_stream_error();
                    error!(error = %e, "stream read error");
                }
            },
            _ = cancel.cancelled() => {
                info!("shutdown signal received, stopping stream consumer");
                break;
            }
        }
    }
}

/// Routes and dispatches one message. Returns the report for logging and tests.
pub async fn handle_message(
    dispatcher: &Dispatcher,
    router: &TopicRouter,
    message: &StreamMessage,
) -> Option<Result<DispatchReport, NotifyError>> {
    let Some(kind) = router.route(&message.topic) else {
        warn!(topic = message.topic.as_str(), "message from unrouted topic");
        return None;
    };

    debug!(
        topic = message.topic.as_str(),
        partition = message.partition,
        offset = message.offset,
        "new message"
    );

    let result = dispatcher.dispatch(kind, &message.payload).await;
    match &result {
        Ok(report) => debug!(outcome = report.label(), "event handled"),
        Err(e @ NotifyError::Decode { .. }) => warn!(
            topic = message.topic.as_str(),
            offset = message.offset,
            error = %e,
            "failed to decode change event"
        ),
        Err(e) => error!(
            topic = message.topic.as_str(),
            offset = message.offset,
            kind = kind.label(),
            error = %e,
            "failed to dispatch change event"
        ),
    }
    Some(result)
}
