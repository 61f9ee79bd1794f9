//! # Client Configuration
//!
//! Settings come from, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config <path>`, else `./roster.toml` when present)
//! 3. Environment: `ROSTER_URL`, `ROSTER_SESSION_FILE`
//! 4. The `--url` flag
//!
//! ```toml
//! base_url = "http://localhost:2231/api"
//! session_file = "/home/ada/.roster/session.json"
//! page_size = 10
//! timeout_secs = 30
//! ```

use crate::error::AppError;
use roster_core::primitives::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default backend API root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:2231/api";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub base_url: String,
    pub session_file: PathBuf,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: default_session_file(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `$HOME/.roster/session.json`, or `./.roster/session.json` without a home.
fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".roster")
        .join("session.json")
}

impl RosterConfig {
    /// Resolve the effective configuration for this process.
    pub fn load(explicit: Option<&Path>, url_flag: Option<String>) -> Result<Self, AppError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };

        let config = config
            .with_overrides(
                std::env::var("ROSTER_URL").ok(),
                std::env::var_os("ROSTER_SESSION_FILE").map(PathBuf::from),
            )
            .with_overrides(url_flag, None);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Replace the backend URL and/or session file when given.
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, session_file: Option<PathBuf>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(path) = session_file {
            self.session_file = path;
        }
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("base_url must not be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
