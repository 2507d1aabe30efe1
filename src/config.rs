// src/config.rs
use crate::application::syndication::{QueueSettings, SyndicationSettings};
use std::{env, path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    articles_dir: PathBuf,
    database_url: String,
    credentials_path: PathBuf,
    sync_timeout: Duration,
    sync_max_attempts: u32,
    sync_backoff_base: Duration,
    sync_backoff_cap: Duration,
    sync_queue_capacity: usize,
    sync_max_concurrent: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_articles_dir() -> PathBuf {
    "content/posts".into()
}

fn default_database_url() -> String {
    "sqlite://articles.db?mode=rwc".into()
}

fn default_credentials_path() -> PathBuf {
    "config.json".into()
}

fn parse_u64(name: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(format!("{name} must be an integer, got '{raw}'"))),
    }
}

impl AppConfig {
    /// Build configuration from environment variables. Every knob has a
    /// default; values that are present but unparseable are an error rather
    /// than silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let articles_dir = env::var("ARTICLES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_articles_dir());
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());
        let credentials_path = env::var("PLATFORM_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_credentials_path());

        let sync_timeout_secs =
            parse_u64("SYNC_TIMEOUT_SECS", env::var("SYNC_TIMEOUT_SECS").ok(), 30)?;
        let sync_max_attempts =
            parse_u64("SYNC_MAX_ATTEMPTS", env::var("SYNC_MAX_ATTEMPTS").ok(), 3)?;
        if sync_max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "SYNC_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }
        let sync_backoff_base_ms = parse_u64(
            "SYNC_BACKOFF_BASE_MS",
            env::var("SYNC_BACKOFF_BASE_MS").ok(),
            500,
        )?;
        let sync_backoff_cap_ms = parse_u64(
            "SYNC_BACKOFF_CAP_MS",
            env::var("SYNC_BACKOFF_CAP_MS").ok(),
            10_000,
        )?;
        let sync_queue_capacity = parse_u64(
            "SYNC_QUEUE_CAPACITY",
            env::var("SYNC_QUEUE_CAPACITY").ok(),
            64,
        )?;
        let sync_max_concurrent = parse_u64(
            "SYNC_MAX_CONCURRENT",
            env::var("SYNC_MAX_CONCURRENT").ok(),
            4,
        )?;

        Ok(Self {
            articles_dir,
            database_url,
            credentials_path,
            sync_timeout: Duration::from_secs(sync_timeout_secs),
            sync_max_attempts: u32::try_from(sync_max_attempts)
                .map_err(|_| ConfigError::Invalid("SYNC_MAX_ATTEMPTS is too large".into()))?,
            sync_backoff_base: Duration::from_millis(sync_backoff_base_ms),
            sync_backoff_cap: Duration::from_millis(sync_backoff_cap_ms),
            sync_queue_capacity: sync_queue_capacity as usize,
            sync_max_concurrent: sync_max_concurrent as usize,
        })
    }

    pub fn articles_dir(&self) -> &PathBuf {
        &self.articles_dir
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn credentials_path(&self) -> &PathBuf {
        &self.credentials_path
    }

    pub fn syndication_settings(&self) -> SyndicationSettings {
        SyndicationSettings {
            per_platform_timeout: self.sync_timeout,
            max_attempts: self.sync_max_attempts,
            backoff_base: self.sync_backoff_base,
            backoff_cap: self.sync_backoff_cap,
        }
    }

    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            capacity: self.sync_queue_capacity,
            max_concurrent: self.sync_max_concurrent,
        }
    }
}
