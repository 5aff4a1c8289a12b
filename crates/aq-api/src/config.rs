use serde::Deserialize;
use thiserror::Error;

/// Minimum length of `COOKIE_SECRET`, the private cookie key needs 64 bytes
pub const MIN_COOKIE_SECRET_LEN: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
    #[error("COOKIE_SECRET must be at least {min} bytes, got {0}", min = MIN_COOKIE_SECRET_LEN)]
    CookieSecretTooShort(usize),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Server configuration, read from environment variables
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    pub cookie_secret: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,
    #[serde(default = "default_session_sweep_seconds")]
    pub session_sweep_seconds: u64,
}

fn default_database_url() -> String {
    "sqlite://data/quiz.db".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_allowed_origins() -> String {
    "http://localhost:5050".to_string()
}

fn default_session_ttl_minutes() -> i64 {
    720
}

fn default_session_sweep_seconds() -> u64 {
    300
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(ConfigError::CookieSecretTooShort(self.cookie_secret.len()));
        }
        if self.session_ttl_minutes <= 0 {
            return Err(ConfigError::NotPositive("SESSION_TTL_MINUTES"));
        }
        if self.session_sweep_seconds == 0 {
            return Err(ConfigError::NotPositive("SESSION_SWEEP_SECONDS"));
        }
        Ok(())
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
