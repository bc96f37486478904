//! Startup configuration, read once from the environment and passed to
//! constructors as an immutable value.

use std::path::PathBuf;
use std::time::Duration;

use cvr_api::{Client, Credentials, DEFAULT_SEARCH_URL};
use thiserror::Error;

/// Errors reading configuration variables.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} is not a valid URL: '{value}'")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{0} is set without {1}")]
    Incomplete(&'static str, &'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Registry connection and export settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Full `_search` URL of the registry index.
    pub search_url: String,
    pub credentials: Option<Credentials>,
    /// Version of the upstream index, informational only.
    pub elasticsearch_version: Option<String>,
    pub request_timeout: Duration,
    pub export: ExportSettings,
}

/// Settings for the document export wait.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Directory the browser session downloads into.
    pub download_dir: PathBuf,
    /// Upper bound on the wait for a finished download.
    pub timeout: Duration,
    /// How often the download directory is checked.
    pub poll_interval: Duration,
    /// Prepended to the CVR number to form the expected file name prefix.
    pub file_prefix: String,
    /// Command line that drives the browser session, if configured.
    pub command: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            download_dir: std::env::temp_dir().join("cvr-exports"),
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            file_prefix: String::new(),
            command: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            credentials: None,
            elasticsearch_version: None,
            request_timeout: Duration::from_secs(30),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Unset and blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        let search_url = match get("CVR_API_URL") {
            Some(url) => {
                url::Url::parse(&url).map_err(|_| ConfigError::InvalidUrl {
                    var: "CVR_API_URL",
                    value: url.clone(),
                })?;
                url
            }
            None => defaults.search_url,
        };

        let credentials = match (get("CVR_API_USERNAME"), get("CVR_API_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Incomplete("CVR_API_USERNAME", "CVR_API_PASSWORD"))
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete("CVR_API_PASSWORD", "CVR_API_USERNAME"))
            }
        };

        let number = |var: &'static str| -> Result<Option<u64>, ConfigError> {
            get(var)
                .map(|value| {
                    value
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidNumber { var, value })
                })
                .transpose()
        };

        let request_timeout = number("CVR_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let export = ExportSettings {
            download_dir: get("CVR_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export.download_dir),
            timeout: number("CVR_EXPORT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.export.timeout),
            poll_interval: match number("CVR_EXPORT_POLL_MS")? {
                Some(0) => return Err(ConfigError::Zero("CVR_EXPORT_POLL_MS")),
                Some(ms) => Duration::from_millis(ms),
                None => defaults.export.poll_interval,
            },
            file_prefix: get("CVR_EXPORT_FILE_PREFIX").unwrap_or_default(),
            command: get("CVR_EXPORT_COMMAND"),
        };

        Ok(Self {
            search_url,
            credentials,
            elasticsearch_version: get("ELASTICSEARCH_VERSION"),
            request_timeout,
            export,
        })
    }

    /// Builds the registry client these settings describe.
    pub fn client(&self) -> Client {
        let client = Client::with_search_url(&self.search_url).with_timeout(self.request_timeout);
        match &self.credentials {
            Some(credentials) => client.with_credentials(credentials.clone()),
            None => client,
        }
    }
}
