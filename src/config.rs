//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HEARTWISE_API_URL` | `http://127.0.0.1:5000` |
//! | `HEARTWISE_HTTP_TIMEOUT_SECS` | `30` (`0` disables) |
//! | `HEARTWISE_LOG_MODE` | `auto` (`file` when stdout is a TTY, else `stdout`) |
//! | `HEARTWISE_LOG_FILE` | `heartwise.log` |

use std::path::PathBuf;
use std::time::Duration;

use crate::{HeartwiseError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "heartwise.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when interactive, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Whether logs should go to a file, given whether stdout is a terminal.
    ///
    /// Writing logs to the terminal would corrupt the alternate screen.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Server base URL, without trailing slash
    pub api_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub http_timeout: Option<Duration>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `HeartwiseError::Config` for malformed values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns `None` for unset variables.
    ///
    /// # Errors
    /// Returns `HeartwiseError::Config` for malformed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("HEARTWISE_API_URL") {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(HeartwiseError::Config(format!(
                    "HEARTWISE_API_URL must start with http:// or https:// (got {url})"
                )));
            }
            settings.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("HEARTWISE_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                HeartwiseError::Config(format!(
                    "HEARTWISE_HTTP_TIMEOUT_SECS must be a whole number of seconds (got {raw})"
                ))
            })?;
            settings.http_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(mode) = get("HEARTWISE_LOG_MODE") {
            settings.log_mode = match mode.to_ascii_lowercase().as_str() {
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                "auto" => LogMode::Auto,
                other => {
                    return Err(HeartwiseError::Config(format!(
                        "HEARTWISE_LOG_MODE must be auto, file or stdout (got {other})"
                    )))
                }
            };
        }

        if let Some(path) = get("HEARTWISE_LOG_FILE") {
            settings.log_file = PathBuf::from(path);
        }

        Ok(settings)
    }
}
