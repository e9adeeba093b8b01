// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks what serde cannot: required credentials, DSN schemes, and
//! non-zero durations. All problems are collected, not just the first.

use crate::diagnostic::ConfigError;
use crate::model::NotifyConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &NotifyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    require(&mut errors, &config.telegram.bot_token, "telegram.bot_token", "TELEGRAM_BOT_TOKEN");
    require(&mut errors, &config.oauth.app_id, "oauth.app_id", "BANGUMI_APP_ID");
    require(&mut errors, &config.oauth.app_secret, "oauth.app_secret", "BANGUMI_APP_SECRET");
    require(&mut errors, &config.kafka.broker, "kafka.broker", "KAFKA_BROKER");

    check_dsn(&mut errors, &config.storage.pg_dsn, "storage.pg_dsn", "PG_DSN", &["postgres", "postgresql"]);
    check_dsn(&mut errors, &config.storage.mysql_dsn, "storage.mysql_dsn", "MYSQL_DSN", &["mysql", "mariadb"]);
    check_dsn(&mut errors, &config.storage.redis_dsn, "storage.redis_dsn", "REDIS_DSN", &["redis", "rediss"]);

    let external = config.http.external_address.as_str();
    if !(external.starts_with("http://") || external.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("http.external_address must be an http(s) URL, got `{external}`"),
        });
    }

    if config.dispatch.freshness_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.freshness_secs must be greater than 0".to_string(),
        });
    }

    if config.dispatch.call_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.call_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.dispatch.concurrency == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.concurrency must be greater than 0".to_string(),
        });
    }

    if config.oauth.state_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "oauth.state_ttl_secs must be greater than 0".to_string(),
        });
    }

    if !["earliest", "latest"].contains(&config.kafka.auto_offset_reset.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "kafka.auto_offset_reset must be `earliest` or `latest`, got `{}`",
                config.kafka.auto_offset_reset
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn require(errors: &mut Vec<ConfigError>, value: &Option<String>, key: &str, env: &str) {
    if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
        errors.push(ConfigError::MissingKey {
            key: key.to_string(),
            env: env.to_string(),
        });
    }
}

fn check_dsn(
    errors: &mut Vec<ConfigError>,
    value: &Option<String>,
    key: &str,
    env: &str,
    schemes: &[&str],
) {
    let Some(dsn) = value.as_deref().filter(|v| !v.trim().is_empty()) else {
        errors.push(ConfigError::MissingKey {
            key: key.to_string(),
            env: env.to_string(),
        });
        return;
    };

    let scheme = dsn.split_once("://").map(|(s, _)| s);
    if !scheme.is_some_and(|s| schemes.contains(&s)) {
        errors.push(ConfigError::Validation {
            message: format!("{key} must use one of the schemes {}://", schemes.join("://, ")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NotifyConfig {
        let mut config = NotifyConfig::default();
        config.telegram.bot_token = Some("123:abc".into());
        config.oauth.app_id = Some("bgm1".into());
        config.oauth.app_secret = Some("secret".into());
        config.kafka.broker = Some("localhost:9092".into());
        config.storage.pg_dsn = Some("postgres://u:p@localhost/tg".into());
        config.storage.mysql_dsn = Some("mysql://u:p@localhost/bangumi".into());
        config.storage.redis_dsn = Some("redis://localhost:6379/0".into());
        config
    }

    #[test]
    fn complete_config_passes() {
        assert!(validate_config(&complete()).is_ok());
    }

    #[test]
    fn default_config_reports_every_missing_credential() {
        let errors = validate_config(&NotifyConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(errors.iter().all(|e| matches!(e, ConfigError::MissingKey { .. })));
    }

    #[test]
    fn wrong_dsn_scheme_is_rejected() {
        let mut config = complete();
        config.storage.pg_dsn = Some("mysql://localhost/tg".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("storage.pg_dsn"));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let mut config = complete();
        config.dispatch.freshness_secs = 0;
        config.dispatch.call_timeout_secs = 0;
        assert_eq!(validate_config(&config).unwrap_err().len(), 2);
    }

    #[test]
    fn external_address_must_be_http() {
        let mut config = complete();
        config.http.external_address = "notify.example.com".into();
        assert!(validate_config(&config).is_err());
    }
}
