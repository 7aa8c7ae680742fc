//! Configuration management for the checkpoint server
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Static dashboard document served at `/`
    pub dashboard_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("CHECKPOINT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("CHECKPOINT_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("Invalid CHECKPOINT_PORT")?,

            database_path: env::var("CHECKPOINT_DB_PATH")
                .unwrap_or_else(|_| "data/db.sqlite3".to_string())
                .into(),

            dashboard_path: env::var("CHECKPOINT_DASHBOARD_PATH")
                .unwrap_or_else(|_| "public/dashboard.html".to_string())
                .into(),
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("CHECKPOINT_PORT must be greater than 0");
        }

        if self.database_path.as_os_str().is_empty() {
            anyhow::bail!("CHECKPOINT_DB_PATH must not be empty");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Ensure the database directory exists
    pub fn ensure_directories(&self) -> Result<()> {
        if let Some(parent) = self
            .database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        // A missing dashboard only fails requests to `/`
        if !self.dashboard_path.exists() {
            tracing::warn!(
                "Dashboard asset does not exist: {}",
                self.dashboard_path.display()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            api_host: "127.0.0.1".to_string(),
            api_port: 9000,
            database_path: PathBuf::from("./data/db.sqlite3"),
            dashboard_path: PathBuf::from("./public/dashboard.html"),
        }
    }

    #[test]
    fn test_config_defaults() {
        env::remove_var("CHECKPOINT_HOST");
        env::remove_var("CHECKPOINT_PORT");
        env::remove_var("CHECKPOINT_DB_PATH");
        env::remove_var("CHECKPOINT_DASHBOARD_PATH");

        let config = Config::from_env().expect("Failed to load config");

        assert_eq!(config.api_host, "0.0.0.0");
        assert_eq!(config.api_port, 8000);
        assert_eq!(config.database_path, PathBuf::from("data/db.sqlite3"));
        assert_eq!(config.dashboard_path, PathBuf::from("public/dashboard.html"));
    }

    #[test]
    fn test_api_address() {
        assert_eq!(sample().api_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = Config {
            api_port: 0,
            ..sample()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("CHECKPOINT_PORT must be greater than 0"));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let config = Config {
            database_path: PathBuf::new(),
            ..sample()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ensure_directories_creates_database_parent() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("nested").join("db.sqlite3"),
            dashboard_path: dir.path().join("missing.html"),
            ..sample()
        };

        config.ensure_directories().unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
