use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub storage_path: Option<PathBuf>,
    pub http_timeout: Duration,
    pub stats_timeout: Duration,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Config {
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_STATS_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const MAX_PAGE_SIZE: usize = 100;

    /// Configuration with defaults for everything but the backend URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            storage_path: None,
            http_timeout: Duration::from_secs(Self::DEFAULT_HTTP_TIMEOUT_SECS),
            stats_timeout: Duration::from_secs(Self::DEFAULT_STATS_TIMEOUT_SECS),
            default_page_size: Self::DEFAULT_PAGE_SIZE,
            max_page_size: Self::MAX_PAGE_SIZE,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            api_base_url: get_env("API_BASE_URL")?,
            storage_path: env::var("STORAGE_PATH").ok().map(PathBuf::from),
            http_timeout: Duration::from_secs(get_env_parse_or(
                "HTTP_TIMEOUT_SECS",
                Self::DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            stats_timeout: Duration::from_secs(get_env_parse_or(
                "STATS_TIMEOUT_SECS",
                Self::DEFAULT_STATS_TIMEOUT_SECS,
            )?),
            default_page_size: get_env_parse_or("DEFAULT_PAGE_SIZE", Self::DEFAULT_PAGE_SIZE)?,
            max_page_size: get_env_parse_or("MAX_PAGE_SIZE", Self::MAX_PAGE_SIZE)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_base_url).map_err(|e| {
            Error::Config(format!("Invalid API_BASE_URL '{}': {}", self.api_base_url, e))
        })?;
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(Error::Config(format!(
                "DEFAULT_PAGE_SIZE must be between 1 and {}",
                self.max_page_size
            )));
        }
        Ok(())
    }

    /// Clamps a requested page size into `1..=max_page_size`.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
