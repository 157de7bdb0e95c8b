use crate::infra::api::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::infra::api::newsdata::DEFAULT_NEWSDATA_BASE_URL;
use crate::types::{ConfigError, ConfigResult};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/newser.db";
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// 環境変数から読み込むアプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub discord_token: String,
    pub newsdata_api_key: String,
    pub google_api_key: String,
    pub database_url: String,
    pub command_prefix: String,
    pub newsdata_base_url: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// プロセスの環境変数から設定を読み込む
    /// .envファイルの読み込みは呼び出し側（main）で済ませておくこと
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> ConfigResult<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::missing_env_var(name))
        };
        let optional = |name: &str, default: &str| -> String {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::invalid_value("HTTP_TIMEOUT_SECS", format!("{}: {}", raw, e))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let command_prefix = optional("COMMAND_PREFIX", DEFAULT_COMMAND_PREFIX);
        if command_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_value(
                "COMMAND_PREFIX",
                "空白を含めることはできません",
            ));
        }

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            newsdata_api_key: required("NEWSDATA_API_KEY")?,
            google_api_key: required("GOOGLE_API_KEY")?,
            database_url: optional("DATABASE_URL", DEFAULT_DATABASE_URL),
            command_prefix,
            newsdata_base_url: optional("NEWSDATA_BASE_URL", DEFAULT_NEWSDATA_BASE_URL),
            gemini_base_url: optional("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            gemini_model: optional("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            http_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DISCORD_TOKEN", "token"),
        ("NEWSDATA_API_KEY", "news-key"),
        ("GOOGLE_API_KEY", "google-key"),
    ];

    #[test]
    fn test_defaults_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.discord_token, "token");
        assert_eq!(config.database_url, "sqlite://data/newser.db");
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.newsdata_base_url, "https://newsdata.io");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn test_missing_required_variable() {
        let err = AppConfig::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert_eq!(err, ConfigError::missing_env_var("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_required_variable_is_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("DISCORD_TOKEN", "   ");
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::missing_env_var("DISCORD_TOKEN"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("COMMAND_PREFIX", "?"));
        pairs.push(("DATABASE_URL", "sqlite::memory:"));
        pairs.push(("HTTP_TIMEOUT_SECS", "5"));

        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.command_prefix, "?");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HTTP_TIMEOUT_SECS", "abc"));

        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "HTTP_TIMEOUT_SECS"));
    }
}
