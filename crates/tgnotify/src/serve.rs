// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process wiring.
//!
//! Connects every backend (any failure here is fatal), then runs the three
//! peers until shutdown: the stream consumer, the Telegram command listener
//! and the OAuth gateway.

use std::sync::Arc;
use std::time::Duration;

use tgnotify_config::NotifyConfig;
use tgnotify_core::{
    ChatDirectory, DeliverySink, EnrichmentGateway, NotifyError, OAuthStateStore, PluginAdapter,
};
use tgnotify_dispatch::markup::SiteRoots;
use tgnotify_dispatch::{DispatchSettings, Dispatcher};
use tgnotify_gateway::{GatewayState, HttpTokenExchange, OAuthLinks, ServerConfig};
use tgnotify_prometheus::PrometheusAdapter;
use tgnotify_storage::{MysqlEnrichment, PgChatDirectory, RedisStateStore};
use tgnotify_stream::{KafkaSettings, KafkaSource, TopicRouter};
use tgnotify_telegram::{CommandService, TelegramListener, TelegramSink};
use tracing::{error, info};

use crate::shutdown;

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, NotifyError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NotifyError::Config(format!("{key} is required")))
}

fn filter_directive(level: &str) -> String {
    format!("tgnotify={level},warn")
}

fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn dispatch_settings(config: &NotifyConfig) -> DispatchSettings {
    let dispatch = &config.dispatch;
    DispatchSettings {
        freshness: Duration::from_secs(dispatch.freshness_secs),
        call_timeout: Duration::from_secs(dispatch.call_timeout_secs),
        concurrency: dispatch.concurrency,
        roots: SiteRoots {
            site: dispatch.site_url.clone(),
            doujin: dispatch.doujin_url.clone(),
            mobile: dispatch.mobile_url.clone(),
        },
    }
}

fn kafka_settings(config: &NotifyConfig) -> Result<KafkaSettings, NotifyError> {
    let kafka = &config.kafka;
    Ok(KafkaSettings {
        brokers: required(&kafka.broker, "kafka.broker")?.to_string(),
        group_id: kafka.group_id.clone(),
        auto_offset_reset: kafka.auto_offset_reset.clone(),
        session_timeout_ms: kafka.session_timeout_ms,
    })
}

fn topic_router(config: &NotifyConfig) -> TopicRouter {
    TopicRouter::new(&config.kafka.pm_topic, &config.kafka.notify_topic)
}

/// Runs until SIGINT/SIGTERM. Returns an error only for startup failures.
pub async fn run_serve(config: NotifyConfig) -> Result<(), NotifyError> {
    init_tracing(&config.log.level, config.log.json);
    info!(version = env!("CARGO_PKG_VERSION"), "starting tgnotify");

    let prometheus = if config.prometheus.enabled {
        Some(PrometheusAdapter::new()?)
    } else {
        None
    };

    let storage = &config.storage;
    let directory = Arc::new(
        PgChatDirectory::connect(
            required(&storage.pg_dsn, "storage.pg_dsn")?,
            storage.max_connections,
        )
        .await?,
    );
    let enrichment = Arc::new(
        MysqlEnrichment::connect(
            required(&storage.mysql_dsn, "storage.mysql_dsn")?,
            storage.max_connections,
        )
        .await?,
    );
    let states =
        Arc::new(RedisStateStore::connect(required(&storage.redis_dsn, "storage.redis_dsn")?).await?);

    let bot = tgnotify_telegram::build_bot(&config.telegram)?;
    tgnotify_telegram::verify_bot(&bot).await?;
    let sink = Arc::new(TelegramSink::new(bot.clone()));

    let router = topic_router(&config);
    let source = KafkaSource::connect(&kafka_settings(&config)?, &router)?;

    let dispatcher = Dispatcher::new(
        directory.clone() as Arc<dyn ChatDirectory>,
        enrichment.clone() as Arc<dyn EnrichmentGateway>,
        sink.clone() as Arc<dyn DeliverySink>,
        dispatch_settings(&config),
    );

    let external_base = config.http.external_base().to_string();
    let commands = Arc::new(CommandService::new(
        directory.clone(),
        states.clone() as Arc<dyn OAuthStateStore>,
        external_base,
        Duration::from_secs(config.oauth.state_ttl_secs),
    ));
    let listener = TelegramListener::new(bot, commands);

    let oauth = &config.oauth;
    let app_id = required(&oauth.app_id, "oauth.app_id")?;
    let exchange = HttpTokenExchange::new(
        &oauth.token_url,
        app_id,
        required(&oauth.app_secret, "oauth.app_secret")?,
        config.http.callback_url(),
    );

    let mut health_checks: Vec<Arc<dyn PluginAdapter>> = vec![
        directory.clone() as Arc<dyn PluginAdapter>,
        enrichment as Arc<dyn PluginAdapter>,
        states.clone() as Arc<dyn PluginAdapter>,
        sink.clone() as Arc<dyn PluginAdapter>,
    ];
    let prometheus_render = prometheus.map(|adapter| {
        let adapter = Arc::new(adapter);
        health_checks.push(adapter.clone());
        Arc::new(move || adapter.render()) as Arc<dyn Fn() -> String + Send + Sync>
    });

    let gateway_state = GatewayState {
        links: OAuthLinks {
            client_id: app_id.to_string(),
            authorize_url: oauth.authorize_url.clone(),
            callback_url: config.http.callback_url(),
        },
        directory,
        states,
        sink,
        exchange: Arc::new(exchange),
        health_checks,
        prometheus_render,
    };
    let server_config = ServerConfig {
        host: config.http.host.clone(),
        port: config.http.port,
    };

    let cancel = shutdown::install_signal_handler();
    info!(topics = ?router.topics(), "all backends connected");

    let consumer = async {
        tgnotify_stream::run(&source, &dispatcher, &router, cancel.clone()).await;
    };
    let bot_listener = async {
        listener.run(cancel.clone()).await;
        cancel.cancel();
    };
    let gateway = async {
        let served =
            tgnotify_gateway::start_server(&server_config, gateway_state, cancel.clone()).await;
        if let Err(e) = served {
            error!(error = %e, "gateway stopped");
        }
        cancel.cancel();
    };
    tokio::join!(consumer, bot_listener, gateway);

    info!("tgnotify shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_scopes_level_to_own_crates() {
        assert_eq!(filter_directive("debug"), "tgnotify=debug,warn");
    }

    #[test]
    fn required_rejects_missing_and_empty() {
        assert!(required(&None, "storage.pg_dsn").is_err());
        assert!(required(&Some(String::new()), "storage.pg_dsn").is_err());
        assert_eq!(
            required(&Some("postgres://db".into()), "storage.pg_dsn").unwrap(),
            "postgres://db"
        );
    }

    #[test]
    fn dispatch_settings_follow_config() {
        let mut config = NotifyConfig::default();
        config.dispatch.freshness_secs = 30;
        config.dispatch.doujin_url = "https://doujin.example".into();
        let settings = dispatch_settings(&config);
        assert_eq!(settings.freshness, Duration::from_secs(30));
        assert_eq!(settings.call_timeout, Duration::from_secs(10));
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.roots.doujin, "https://doujin.example");
        assert_eq!(settings.roots.site, "https://bgm.tv");
    }

    #[test]
    fn kafka_settings_need_a_broker() {
        let mut config = NotifyConfig::default();
        assert!(kafka_settings(&config).is_err());

        config.kafka.broker = Some("kafka:9092".into());
        let settings = kafka_settings(&config).unwrap();
        assert_eq!(settings.brokers, "kafka:9092");
        assert_eq!(settings.group_id, "tg-notify-bot");
        assert_eq!(settings.auto_offset_reset, "latest");
    }

    #[test]
    fn router_uses_configured_topics() {
        let mut config = NotifyConfig::default();
        config.kafka.pm_topic = "pms".into();
        let router = topic_router(&config);
        assert_eq!(router.topics(), ["pms", "debezium.chii.bangumi.chii_notify"]);
    }
}
