//! Client configuration.
//!
//! Defaults point at a backend on the local machine. Every value can be
//! overridden from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NotifyError, Result};

/// Default base URL of the versioned REST API.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Default token login endpoint. It lives outside the versioned API.
pub const DEFAULT_LOGIN_URL: &str = "http://127.0.0.1:8000/api-user-login/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by the API client and the session store.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the versioned API, without trailing slash.
    pub api_url: String,
    /// Full URL of the login endpoint.
    pub login_url: String,
    /// File holding the persisted session.
    pub session_file: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            session_file: default_session_file(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `NOTIFY_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("NOTIFY_API_URL") {
            config.api_url = url;
        }
        if let Ok(url) = env::var("NOTIFY_LOGIN_URL") {
            config.login_url = url;
        }
        if let Ok(path) = env::var("NOTIFY_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }
        if let Ok(secs) = env::var("NOTIFY_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                NotifyError::Config(format!("NOTIFY_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Point both endpoints at a single server root, as the test backend does.
    pub fn with_server<S: AsRef<str>>(mut self, root: S) -> Self {
        let root = root.as_ref().trim_end_matches('/');
        self.api_url = format!("{}/api/v1", root);
        self.login_url = format!("{}/api-user-login/", root);
        self
    }

    /// Set the session file path.
    pub fn with_session_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.session_file = path.into();
        self
    }

    /// Check that the URLs parse.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("api_url", &self.api_url), ("login_url", &self.login_url)] {
            reqwest::Url::parse(url)
                .map_err(|e| NotifyError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }
        if self.timeout.is_zero() {
            return Err(NotifyError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notify")
        .join("session.json")
}
