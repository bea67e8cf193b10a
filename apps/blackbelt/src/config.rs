//! # Configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. `blackbelt.toml` in the working directory, or the file given with
//!    `--config`
//! 2. `BLACKBELT_API_URL`, `BLACKBELT_API_TOKEN`,
//!    `BLACKBELT_SUBMIT_TIMEOUT_SECS`
//! 3. the `--api-url` flag
//!
//! ```toml
//! api_url = "http://localhost:3333"
//! api_token = "..."
//! submit_timeout_secs = 15
//! session_file = "blackbelt-session.toml"
//! master_id = 1
//! ```

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "blackbelt.toml";

pub const ENV_API_URL: &str = "BLACKBELT_API_URL";
pub const ENV_API_TOKEN: &str = "BLACKBELT_API_TOKEN";
pub const ENV_SUBMIT_TIMEOUT: &str = "BLACKBELT_SUBMIT_TIMEOUT_SECS";

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the academy API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Seconds to wait for the account service before failing a submission.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
    /// Where the signed-in session is recorded.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
    /// Master that owns classes created from this install.
    #[serde(default)]
    pub master_id: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            submit_timeout_secs: default_submit_timeout_secs(),
            session_file: default_session_file(),
            master_id: None,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3333".to_string()
}

const fn default_submit_timeout_secs() -> u64 {
    15
}

fn default_session_file() -> PathBuf {
    PathBuf::from("blackbelt-session.toml")
}

impl Config {
    /// Parse a config document.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read the config file, if any.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn read(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Self::from_toml(path, &text)
            }
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(CliError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), CliError> {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(raw) = lookup(ENV_SUBMIT_TIMEOUT) {
            self.submit_timeout_secs = raw.trim().parse().map_err(|_| {
                CliError::Input(format!("{ENV_SUBMIT_TIMEOUT} must be a number of seconds, got {raw:?}"))
            })?;
        }
        Ok(())
    }

    /// Resolve every layer against the process environment.
    pub fn load(explicit: Option<&Path>, api_url: Option<&str>) -> Result<Self, CliError> {
        Self::resolve(explicit, api_url, |key| std::env::var(key).ok())
    }

    /// File, then `lookup` for environment keys, then the `--api-url` flag.
    pub fn resolve(
        explicit: Option<&Path>,
        api_url: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CliError> {
        let mut config = Self::read(explicit)?;
        config.apply_env(lookup)?;
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        if config.submit_timeout_secs == 0 {
            return Err(CliError::Input("submit timeout must be at least 1 second".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let config = Config::from_toml(Path::new("t.toml"), "master_id = 3").expect("parse");
        assert_eq!(config.api_url, "http://localhost:3333");
        assert_eq!(config.submit_timeout_secs, 15);
        assert_eq!(config.master_id, Some(3));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config =
            Config::from_toml(Path::new("t.toml"), "api_url = \"http://file\"").expect("parse");
        config
            .apply_env(env(&[
                (ENV_API_URL, "http://env"),
                (ENV_API_TOKEN, "secret"),
                (ENV_SUBMIT_TIMEOUT, "30"),
            ]))
            .expect("env");
        assert_eq!(config.api_url, "http://env");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.submit_timeout_secs, 30);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[(ENV_SUBMIT_TIMEOUT, "soon")]))
            .expect_err("not a number");
        assert!(err.to_string().contains(ENV_SUBMIT_TIMEOUT));
    }

    #[test]
    fn malformed_file_names_its_path() {
        let err = Config::from_toml(Path::new("broken.toml"), "api_url = ").expect_err("invalid");
        assert!(err.to_string().contains("broken.toml"));
    }
}
