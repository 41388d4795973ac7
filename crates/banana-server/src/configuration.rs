use crate::error::{to_env_var, ConfigError};
use banana::providers::configs::{
    OpenAiProviderConfig, ProviderConfig, RelayConfig, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    OPENAI_HOST, OPENAI_MODEL,
};
use banana::search::{SearchConfig, BRAVE_HOST, DEFAULT_RESULT_COUNT};
use config::{Config, Environment};
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

/// Conventional variable names honored when the prefixed ones are unset
const OPENAI_KEY_FALLBACK: &str = "OPENAI_API_KEY";
const BRAVE_KEY_FALLBACK: &str = "BRAVE_SEARCH_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_openai_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i32,
}

#[derive(Debug, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_search_count")]
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RelaySettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RelaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub search: SearchSettings,
    pub relay: RelaySettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings = Self::load_and_validate()?;

        settings.upstream.api_key = non_blank(settings.upstream.api_key.take())
            .or_else(|| non_blank(std::env::var(OPENAI_KEY_FALLBACK).ok()));
        settings.search.api_key = non_blank(settings.search.api_key.take())
            .or_else(|| non_blank(std::env::var(BRAVE_KEY_FALLBACK).ok()));

        Ok(settings)
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Upstream defaults
            .set_default("upstream.host", default_openai_host())?
            .set_default("upstream.model", default_model())?
            .set_default("upstream.temperature", default_temperature())?
            .set_default("upstream.max_tokens", default_max_tokens())?
            // Search defaults
            .set_default("search.host", default_search_host())?
            .set_default("search.count", default_search_count() as u64)?
            // Relay defaults
            .set_default("relay.timeout_secs", default_timeout_secs())?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("BANANA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match config.try_deserialize::<Self>() {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);
                match &err {
                    config::ConfigError::Type { key: Some(key), .. } => {
                        Err(ConfigError::InvalidEnvVar {
                            env_var: to_env_var(key),
                        })
                    }
                    _ => Err(ConfigError::Other(err)),
                }
            }
        }
    }

    /// The per-request relay configuration derived from these settings
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            provider: ProviderConfig::OpenAi(OpenAiProviderConfig {
                host: self.upstream.host.clone(),
                api_key: self.upstream.api_key.clone(),
                model: self.upstream.model.clone(),
                temperature: self.upstream.temperature,
                max_tokens: self.upstream.max_tokens,
            }),
            search: SearchConfig {
                host: self.search.host.clone(),
                api_key: self.search.api_key.clone(),
                count: self.search.count,
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_openai_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> i32 {
    DEFAULT_MAX_TOKENS
}

fn default_search_host() -> String {
    BRAVE_HOST.to_string()
}

fn default_search_count() -> usize {
    DEFAULT_RESULT_COUNT
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("BANANA_") {
                env::remove_var(&key);
            }
        }
        env::remove_var(OPENAI_KEY_FALLBACK);
        env::remove_var(BRAVE_KEY_FALLBACK);
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.upstream.host, "https://api.openai.com");
        assert_eq!(settings.upstream.model, "gpt-4o");
        assert_eq!(settings.upstream.api_key, None);
        assert_eq!(settings.upstream.max_tokens, 4000);
        assert!((settings.upstream.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.search.host, "https://api.search.brave.com");
        assert_eq!(settings.search.api_key, None);
        assert_eq!(settings.search.count, 5);
        assert_eq!(settings.relay.timeout(), Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("BANANA_SERVER__PORT", "8080");
        env::set_var("BANANA_UPSTREAM__API_KEY", "test-key");
        env::set_var("BANANA_UPSTREAM__HOST", "https://custom.openai.com");
        env::set_var("BANANA_UPSTREAM__MODEL", "gpt-4o-mini");
        env::set_var("BANANA_UPSTREAM__TEMPERATURE", "0.2");
        env::set_var("BANANA_SEARCH__COUNT", "3");
        env::set_var("BANANA_RELAY__TIMEOUT_SECS", "10");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.upstream.api_key.as_deref(), Some("test-key"));
        assert_eq!(settings.upstream.host, "https://custom.openai.com");
        assert_eq!(settings.upstream.model, "gpt-4o-mini");
        assert!((settings.upstream.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(settings.search.count, 3);
        assert_eq!(settings.relay.timeout_secs, 10);

        clean_env();
    }

    #[test]
    #[serial]
    fn test_conventional_key_fallbacks() {
        clean_env();
        env::set_var(OPENAI_KEY_FALLBACK, "sk-fallback");
        env::set_var(BRAVE_KEY_FALLBACK, "brave-fallback");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.upstream.api_key.as_deref(), Some("sk-fallback"));
        assert_eq!(settings.search.api_key.as_deref(), Some("brave-fallback"));

        // The prefixed variable wins over the conventional one
        env::set_var("BANANA_UPSTREAM__API_KEY", "sk-prefixed");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.upstream.api_key.as_deref(), Some("sk-prefixed"));

        clean_env();
    }

    #[test]
    #[serial]
    fn test_blank_key_counts_as_missing() {
        clean_env();
        env::set_var("BANANA_UPSTREAM__API_KEY", "   ");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.upstream.api_key, None);

        clean_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clean_env();
        env::set_var("BANANA_SERVER__PORT", "not-a-port");

        assert!(Settings::new().is_err());

        clean_env();
    }

    #[test]
    #[serial]
    fn test_relay_config() {
        clean_env();
        env::set_var("BANANA_UPSTREAM__API_KEY", "k");

        let config = Settings::new().unwrap().relay_config();
        let ProviderConfig::OpenAi(openai) = config.provider;
        assert_eq!(openai.api_key.as_deref(), Some("k"));
        assert_eq!(openai.max_tokens, 4000);
        assert_eq!(config.search.count, 5);

        clean_env();
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }
}
