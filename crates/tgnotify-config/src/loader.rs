// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tgnotify.toml` > `~/.config/tgnotify/tgnotify.toml` > `/etc/tgnotify/tgnotify.toml`
//! with environment variable overrides. The bare variable names used by
//! existing deployments (`TELEGRAM_BOT_TOKEN`, `PG_DSN`, ...) are honoured,
//! and `TGNOTIFY_*` variables override them.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::NotifyConfig;

/// Deployment variable names and the config keys they populate.
///
/// `PORT` is listed before `HTTP_PORT` so the more specific name wins.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("BANGUMI_APP_ID", "oauth.app_id"),
    ("BANGUMI_APP_SECRET", "oauth.app_secret"),
    ("EXTERNAL_HTTP_ADDRESS", "http.external_address"),
    ("PORT", "http.port"),
    ("HTTP_PORT", "http.port"),
    ("REDIS_DSN", "storage.redis_dsn"),
    ("PG_DSN", "storage.pg_dsn"),
    ("MYSQL_DSN", "storage.mysql_dsn"),
    ("KAFKA_DSN", "kafka.broker"),
    ("KAFKA_BROKER", "kafka.broker"),
];

/// Environment variable that supplies `key` (dotted path).
///
/// Prefers the deployment name when one exists, otherwise the prefixed form.
pub fn env_var_for(key: &str) -> String {
    LEGACY_ENV
        .iter()
        .rev()
        .find(|(_, k)| *k == key)
        .map(|(var, _)| (*var).to_string())
        .unwrap_or_else(|| format!("TGNOTIFY_{}", key.replace('.', "_").to_uppercase()))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tgnotify/tgnotify.toml` (system-wide)
/// 3. `~/.config/tgnotify/tgnotify.toml` (user XDG config)
/// 4. `./tgnotify.toml` (local directory)
/// 5. Deployment variables (`TELEGRAM_BOT_TOKEN`, `PG_DSN`, `DEBUG`, ...)
/// 6. `TGNOTIFY_*` environment variables
pub fn load_config() -> Result<NotifyConfig, figment::Error> {
    build_figment().extract().map(normalize)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<NotifyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NotifyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
        .map(normalize)
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NotifyConfig, figment::Error> {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(NotifyConfig::default()))
            .merge(Toml::file(path)),
    )
    .extract()
    .map(normalize)
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(NotifyConfig::default()))
            .merge(Toml::file("/etc/tgnotify/tgnotify.toml"))
            .merge(Toml::file(
                dirs::config_dir()
                    .map(|d| d.join("tgnotify/tgnotify.toml"))
                    .unwrap_or_default(),
            ))
            .merge(Toml::file("tgnotify.toml")),
    )
}

fn with_env(mut figment: Figment) -> Figment {
    for &(var, key) in LEGACY_ENV {
        figment = figment.merge(Env::raw().only(&[var]).map(move |_| key.into()));
    }
    if debug_requested() {
        figment = figment.merge(Serialized::default("log.level", "debug"));
    }
    figment.merge(env_provider())
}

/// `DEBUG` is truthy when set to anything other than an empty string, `0` or `false`.
fn debug_requested() -> bool {
    std::env::var("DEBUG")
        .map(|v| {
            let v = v.trim();
            !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
        })
        .unwrap_or(false)
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` instead of `Env::split("_")` because key names contain
/// underscores: `TGNOTIFY_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("TGNOTIFY_").map(|key| {
        let key_str = key.as_str();
        let mapped = [
            "telegram", "oauth", "http", "storage", "kafka", "dispatch", "log", "prometheus",
        ]
        .iter()
        .find_map(|section| {
            key_str
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}

fn normalize(mut config: NotifyConfig) -> NotifyConfig {
    let trimmed = config.http.external_address.trim_end_matches('/').len();
    config.http.external_address.truncate(trimmed);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_prefers_deployment_names() {
        assert_eq!(env_var_for("storage.pg_dsn"), "PG_DSN");
        assert_eq!(env_var_for("http.port"), "HTTP_PORT");
        assert_eq!(env_var_for("kafka.broker"), "KAFKA_BROKER");
        assert_eq!(env_var_for("kafka.group_id"), "TGNOTIFY_KAFKA_GROUP_ID");
    }

    #[test]
    fn str_loader_trims_external_address() {
        let config =
            load_config_from_str("[http]\nexternal_address = \"https://n.example.com//\"\n")
                .unwrap();
        assert_eq!(config.http.external_address, "https://n.example.com");
    }

    #[test]
    fn legacy_env_table_covers_deployment_names() {
        let names: Vec<&str> = LEGACY_ENV.iter().map(|(n, _)| *n).collect();
        for required in ["TELEGRAM_BOT_TOKEN", "PG_DSN", "MYSQL_DSN", "REDIS_DSN", "KAFKA_BROKER"] {
            assert!(names.contains(&required), "{required} missing");
        }
    }
}
