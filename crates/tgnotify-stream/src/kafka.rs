// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kafka-backed [`EventSource`].

use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use tracing::info;

use tgnotify_core::NotifyError;

use crate::router::TopicRouter;
use crate::{EventSource, StreamMessage};

/// Consumer settings.
#[derive(Debug, Clone)]
pub struct KafkaSettings {
    pub brokers: String,
    pub group_id: String,
    pub auto_offset_reset: String,
    pub session_timeout_ms: u32,
}

/// A consumer-group member subscribed to the routed topics.
pub struct KafkaSource {
    consumer: StreamConsumer,
}

impl KafkaSource {
    /// Creates the consumer and subscribes to both topics of `router`.
    pub fn connect(settings: &KafkaSettings, router: &TopicRouter) -> Result<Self, NotifyError> {
        let consumer: StreamConsumer = client_config(settings)
            .create()
            .map_err(|e| stream_error("failed to create kafka consumer", e))?;

        consumer
            .subscribe(&router.topics())
            .map_err(|e| stream_error("failed to subscribe", e))?;

        info!(
            group_id = settings.group_id.as_str(),
            topics = ?router.topics(),
            "kafka consumer subscribed"
        );
        Ok(Self { consumer })
    }
}

fn client_config(settings: &KafkaSettings) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", &settings.brokers)
        .set("group.id", &settings.group_id)
        .set("auto.offset.reset", &settings.auto_offset_reset)
        .set("enable.auto.commit", "true")
        .set("session.timeout.ms", settings.session_timeout_ms.to_string());
    config
}

fn stream_error(message: &str, e: rdkafka::error::KafkaError) -> NotifyError {
    NotifyError::Stream {
        message: format!("{message}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl EventSource for KafkaSource {
    async fn next(&self) -> Result<StreamMessage, NotifyError> {
        let msg = self
            .consumer
            .recv()
            .await
            .map_err(|e| stream_error("failed to read kafka message", e))?;
        Ok(StreamMessage {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        })
    }
}
