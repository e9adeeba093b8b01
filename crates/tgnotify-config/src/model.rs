// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for tgnotify.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level tgnotify configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Credentials have no defaults and are checked by
/// [`crate::validation::validate_config`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Telegram bot settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// OAuth application used to link chats to site accounts.
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// OAuth callback HTTP listener.
    #[serde(default)]
    pub http: HttpConfig,

    /// Database and cache connections.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Change-event stream consumer.
    #[serde(default)]
    pub kafka: KafkaConfig,

    /// Dispatch pipeline tuning.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,

    /// Prometheus metrics exporter.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Alternative Bot API server (for a local `telegram-bot-api`).
    #[serde(default)]
    pub api_url: Option<String>,
}

/// OAuth application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OAuthConfig {
    /// OAuth client id.
    #[serde(default)]
    pub app_id: Option<String>,

    /// OAuth client secret.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Authorization endpoint users are redirected to.
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// Token endpoint used to exchange the authorization code.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Lifetime of a `/start` state token, in seconds.
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_secret: None,
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            state_ttl_secs: default_state_ttl_secs(),
        }
    }
}

fn default_authorize_url() -> String {
    "https://bgm.tv/oauth/authorize".to_string()
}

fn default_token_url() -> String {
    "https://bgm.tv/oauth/access_token".to_string()
}

fn default_state_ttl_secs() -> u64 {
    60
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL of this service, used to build OAuth redirect links.
    #[serde(default = "default_external_address")]
    pub external_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_address: default_external_address(),
        }
    }
}

impl HttpConfig {
    /// External address without a trailing slash.
    pub fn external_base(&self) -> &str {
        self.external_address.trim_end_matches('/')
    }

    /// The OAuth `redirect_uri` registered for this deployment.
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.external_base())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4096
}

fn default_external_address() -> String {
    "http://127.0.0.1:4562".to_string()
}

/// Storage connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Postgres DSN holding the chat link table.
    #[serde(default)]
    pub pg_dsn: Option<String>,

    /// MySQL DSN of the site database.
    #[serde(default)]
    pub mysql_dsn: Option<String>,

    /// Redis DSN for OAuth state.
    #[serde(default)]
    pub redis_dsn: Option<String>,

    /// Maximum connections per SQL pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            pg_dsn: None,
            mysql_dsn: None,
            redis_dsn: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

/// Kafka consumer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaConfig {
    /// Bootstrap broker list.
    #[serde(default)]
    pub broker: Option<String>,

    /// Consumer group id.
    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Topic carrying private message row changes.
    #[serde(default = "default_pm_topic")]
    pub pm_topic: String,

    /// Topic carrying notification row changes.
    #[serde(default = "default_notify_topic")]
    pub notify_topic: String,

    /// Where a fresh group starts reading.
    #[serde(default = "default_auto_offset_reset")]
    pub auto_offset_reset: String,

    /// Consumer session timeout.
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u32,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            broker: None,
            group_id: default_group_id(),
            pm_topic: default_pm_topic(),
            notify_topic: default_notify_topic(),
            auto_offset_reset: default_auto_offset_reset(),
            session_timeout_ms: default_session_timeout_ms(),
        }
    }
}

fn default_group_id() -> String {
    "tg-notify-bot".to_string()
}

fn default_pm_topic() -> String {
    "debezium.chii.bangumi.chii_pms".to_string()
}

fn default_notify_topic() -> String {
    "debezium.chii.bangumi.chii_notify".to_string()
}

fn default_auto_offset_reset() -> String {
    "latest".to_string()
}

fn default_session_timeout_ms() -> u32 {
    6000
}

/// Dispatch pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Events older than this are dropped.
    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: u64,

    /// Deadline for each directory, enrichment, or delivery call.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Main site root, used for private message links and relative rule URLs.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Root substituted for `DOUJIN_URL` in rule URLs.
    #[serde(default = "default_doujin_url")]
    pub doujin_url: String,

    /// Root substituted for `MOBILE_URL` in rule URLs.
    #[serde(default = "default_mobile_url")]
    pub mobile_url: String,

    /// Maximum concurrent deliveries for a single event.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            freshness_secs: default_freshness_secs(),
            call_timeout_secs: default_call_timeout_secs(),
            site_url: default_site_url(),
            doujin_url: default_doujin_url(),
            mobile_url: default_mobile_url(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_freshness_secs() -> u64 {
    120
}

fn default_call_timeout_secs() -> u64 {
    10
}

fn default_site_url() -> String {
    "https://bgm.tv".to_string()
}

fn default_doujin_url() -> String {
    "https://doujin.bgm.tv".to_string()
}

fn default_mobile_url() -> String {
    "https://bgm.tv/m".to_string()
}

fn default_concurrency() -> usize {
    8
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default)]
    pub enabled: bool,
}
