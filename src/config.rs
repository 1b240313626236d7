use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::domain::OpsError;

pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";
pub const DEFAULT_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    pub api_version: Option<String>,
    pub page_limit: usize,
    /// `None` runs one remote call per board at once.
    pub max_concurrency: Option<usize>,
    pub timeout_secs: u64,
}

/// Loads a `.env` file into the process environment. An explicit path must
/// exist; otherwise the nearest `.env` in the working directory or its parents
/// is used if there is one. Variables already set are not overridden.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, anyhow::Error> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Self {
            api_url: std::env::var("MONDAY_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            api_token: std::env::var("MONDAY_TOKEN").unwrap_or_default(),
            api_version: std::env::var("MONDAY_API_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            page_limit: std::env::var("BOARD_PAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT),
            max_concurrency: std::env::var("BOARD_SEARCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|cap| *cap > 0),
            timeout_secs: std::env::var("MONDAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }

    pub fn require_token(&self) -> Result<&str, OpsError> {
        let token = self.api_token.trim();
        if token.is_empty() {
            return Err(OpsError::Config("MONDAY_TOKEN is not set".into()));
        }
        Ok(token)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_token: String::new(),
            api_version: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            max_concurrency: None,
            timeout_secs: 30,
        }
    }
}
