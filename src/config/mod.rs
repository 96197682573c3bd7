// Configuration management module
// Settings come from the process environment, optionally seeded from a `.env` file

pub mod settings;

#[cfg(test)]
mod tests;

use console::style;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use settings::{Config, ConfigError, OpenAiConfig, PostgresConfig, Secret};

/// Load variables from an env file into the process environment.
///
/// Without an explicit path a `.env` in the working directory (or its parents) is used
/// when present. Variables already set in the environment are never overridden.
#[inline]
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| ConfigError::EnvFile(format!("{}: {}", path.display(), e)))?;
            debug!("Loaded environment from {}", path.display());
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                debug!("Loaded environment from {}", found.display());
                Ok(Some(found))
            }
            Err(e) if e.not_found() => {
                debug!("No .env file found, using process environment only");
                Ok(None)
            }
            Err(e) => Err(ConfigError::EnvFile(e.to_string())),
        },
    }
}

#[inline]
pub fn show_config(config: &Config) -> Result<(), ConfigError> {
    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Embedding Settings:").bold().yellow());
    eprintln!("  Endpoint: {}", style(&config.openai.api_url).cyan());
    eprintln!("  Model: {}", style(&config.openai.model).cyan());
    eprintln!(
        "  Dimension: {}",
        style(config.openai.embedding_dimension).cyan()
    );
    eprintln!("  API Key: {}", style(mask(config.openai.api_key.expose())).dim());

    eprintln!();
    eprintln!("{}", style("PostgreSQL Settings:").bold().yellow());
    eprintln!(
        "  Connection: {}",
        style(config.postgres.redacted_database_url()?).cyan()
    );
    eprintln!("  Table: {}", style(&config.postgres.table).cyan());

    Ok(())
}

/// Keep the last four characters of a credential visible.
fn mask(secret: &str) -> String {
    let visible: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}
