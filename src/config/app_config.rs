use std::time::Duration;

use serde::Deserialize;

use crate::domain::retry::{RetryPolicy, DEFAULT_RATE_LIMIT_PAUSE};
use crate::infrastructure::credentials::ProviderConfig;
use crate::infrastructure::ingestion::{DEFAULT_BULK_CHUNK_SIZE, DEFAULT_PROGRESS_INTERVAL};
use crate::infrastructure::loader::{
    LoaderSettings, DEFAULT_LOOKUP_BATCH_SIZE, DEFAULT_TIMELINE_PAGE_SIZE,
};
use crate::infrastructure::store::DEFAULT_ELASTICSEARCH_URL;
use crate::infrastructure::twitter::DEFAULT_TWITTER_BASE_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub elasticsearch: ElasticsearchConfig,
    pub logging: LoggingConfig,
    pub credentials: CredentialsConfig,
    pub ingestion: IngestionConfig,
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElasticsearchConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub provider: ProviderConfig,
    /// Seconds a loaded credential is reused; 0 disables caching
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub bulk_chunk_size: usize,
    pub rate_limit_pause_secs: u64,
    pub max_rate_limit_retries: Option<u32>,
    pub lookup_batch_size: usize,
    pub page_size: u32,
    pub progress_interval: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    pub base_url: String,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ELASTICSEARCH_URL.to_string(),
            username: None,
            password: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ElasticsearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            cache_ttl_secs: 300,
        }
    }
}

impl CredentialsConfig {
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
            rate_limit_pause_secs: DEFAULT_RATE_LIMIT_PAUSE.as_secs(),
            max_rate_limit_retries: None,
            lookup_batch_size: DEFAULT_LOOKUP_BATCH_SIZE,
            page_size: DEFAULT_TIMELINE_PAGE_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl IngestionConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(Duration::from_secs(self.rate_limit_pause_secs));
        match self.max_rate_limit_retries {
            Some(max) => policy.with_max_retries(max),
            None => policy,
        }
    }

    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings::default()
            .with_retry_policy(self.retry_policy())
            .with_page_size(self.page_size)
            .with_lookup_batch_size(self.lookup_batch_size)
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TWITTER_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("TBEAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.elasticsearch.url, "http://localhost:9200");
        assert_eq!(config.elasticsearch.timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.ingestion.bulk_chunk_size, 500);
        assert_eq!(config.ingestion.lookup_batch_size, 100);
        assert_eq!(config.ingestion.page_size, 200);
        assert_eq!(
            config.ingestion.retry_policy().pause(),
            Duration::from_secs(900)
        );
        assert_eq!(config.credentials.provider, ProviderConfig::default());
        assert_eq!(config.twitter.base_url, DEFAULT_TWITTER_BASE_URL);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "elasticsearch": {"url": "http://es:9200", "username": "elastic"},
            "logging": {"format": "json"},
            "credentials": {"provider": {"type": "env"}, "cache_ttl_secs": 0},
            "ingestion": {"rate_limit_pause_secs": 60, "max_rate_limit_retries": 3}
        }))
        .unwrap();

        assert_eq!(config.elasticsearch.url, "http://es:9200");
        assert_eq!(config.elasticsearch.username.as_deref(), Some("elastic"));
        assert_eq!(config.elasticsearch.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.credentials.provider,
            ProviderConfig::Env {
                prefix: String::new()
            }
        );
        assert_eq!(config.credentials.cache_ttl(), None);

        let policy = config.ingestion.retry_policy();
        assert_eq!(policy.pause(), Duration::from_secs(60));
        assert_eq!(policy.max_retries(), Some(3));
        assert_eq!(config.ingestion.bulk_chunk_size, 500);
    }

    #[test]
    fn test_loader_settings_follow_config() {
        let config = IngestionConfig {
            page_size: 50,
            lookup_batch_size: 20,
            ..IngestionConfig::default()
        };

        let settings = config.loader_settings();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.lookup_batch_size, 20);
    }
}
