//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CredentialsConfig, ElasticsearchConfig, IngestionConfig, LogFormat, LoggingConfig,
    TwitterConfig,
};
