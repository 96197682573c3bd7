
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::embeddings::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_URL: &str = "API_URL";
pub const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
pub const ENV_EMBEDDING_DIMENSION: &str = "EMBEDDING_DIMENSION";
pub const ENV_POSTGRES_USER: &str = "POSTGRES_USER";
pub const ENV_POSTGRES_PASSWORD: &str = "POSTGRES_PW";
pub const ENV_POSTGRES_HOST: &str = "POSTGRES_HOST";
pub const ENV_POSTGRES_PORT: &str = "POSTGRES_PORT";
pub const ENV_POSTGRES_DB: &str = "POSTGRES_DB";
pub const ENV_FAQ_TABLE: &str = "FAQ_TABLE";

pub const DEFAULT_FAQ_TABLE: &str = "faqs";
const MAX_EMBEDDING_DIMENSION: usize = 16_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub postgres: PostgresConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: Secret,
    pub api_url: Url,
    pub model: String,
    pub embedding_dimension: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub user: String,
    pub password: Secret,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub table: String,
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid URL for {0}: {1}")]
    InvalidUrl(&'static str, String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid embedding dimension: {0} (must be between 1 and 16000)")]
    InvalidEmbeddingDimension(String),
    #[error("Invalid table name: {0} (must be a plain SQL identifier)")]
    InvalidTableName(String),
    #[error("Failed to load environment file: {0}")]
    EnvFile(String),
}

impl Config {
    /// Build the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Required keys that are absent or blank produce [`ConfigError::Missing`].
    /// The database password is the exception: it must be present but may be empty.
    #[inline]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = required(ENV_API_URL)?;
        let api_url = parse_http_url(&api_url)?;

        let model = lookup(ENV_EMBEDDING_MODEL).unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let embedding_dimension = match optional(ENV_EMBEDDING_DIMENSION) {
            Some(raw) => parse_dimension(&raw)?,
            None => DEFAULT_EMBEDDING_DIMENSION,
        };

        let port = required(ENV_POSTGRES_PORT)?;
        let port = parse_port(&port)?;

        let config = Self {
            openai: OpenAiConfig {
                api_key: Secret::new(required(ENV_API_KEY)?),
                api_url,
                model,
                embedding_dimension,
            },
            postgres: PostgresConfig {
                user: required(ENV_POSTGRES_USER)?,
                password: Secret::new(
                    lookup(ENV_POSTGRES_PASSWORD).ok_or(ConfigError::Missing(ENV_POSTGRES_PASSWORD))?,
                ),
                host: required(ENV_POSTGRES_HOST)?,
                port,
                database: required(ENV_POSTGRES_DB)?,
                table: optional(ENV_FAQ_TABLE).unwrap_or_else(|| DEFAULT_FAQ_TABLE.to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.openai.validate()?;
        self.postgres.validate()?;
        Ok(())
    }
}

impl OpenAiConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if !(1..=MAX_EMBEDDING_DIMENSION).contains(&self.embedding_dimension) {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension.to_string(),
            ));
        }

        Ok(())
    }
}

impl PostgresConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }

        if !is_plain_identifier(&self.table) {
            return Err(ConfigError::InvalidTableName(self.table.clone()));
        }

        self.database_url()?;
        Ok(())
    }

    /// Connection string of the form `postgres://<user>:<password>@<host>:<port>/<db>`.
    ///
    /// User and password are percent-encoded.
    #[inline]
    pub fn database_url(&self) -> Result<Url, ConfigError> {
        let base = format!("postgres://{}:{}/{}", self.host, self.port, self.database);
        let mut url =
            Url::parse(&base).map_err(|e| ConfigError::InvalidUrl(ENV_POSTGRES_HOST, e.to_string()))?;

        url.set_username(&self.user)
            .map_err(|()| ConfigError::InvalidUrl(ENV_POSTGRES_USER, self.user.clone()))?;
        if !self.password.expose().is_empty() {
            url.set_password(Some(self.password.expose()))
                .map_err(|()| ConfigError::InvalidUrl(ENV_POSTGRES_PASSWORD, "***".to_string()))?;
        }

        Ok(url)
    }

    /// Same as [`Self::database_url`] with the password masked, for logging.
    #[inline]
    pub fn redacted_database_url(&self) -> Result<String, ConfigError> {
        let mut url = self.database_url()?;
        if url.password().is_some() {
            url.set_password(Some("***"))
                .map_err(|()| ConfigError::InvalidUrl(ENV_POSTGRES_PASSWORD, "***".to_string()))?;
        }
        Ok(url.to_string())
    }
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(ENV_API_URL, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl(
            ENV_API_URL,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(raw.to_string())),
    }
}

fn parse_dimension(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidEmbeddingDimension(raw.to_string()))
}

/// `[A-Za-z_][A-Za-z0-9_]*`, so the name can be interpolated into SQL safely.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
