//! Client configuration
//!
//! Configuration for the chat stream client: where the backend lives and
//! how the connection is established. Config can be built in code, loaded
//! from a YAML file (with `${ENV_VAR}` interpolation), or taken from
//! defaults.

mod env;
mod error;

pub use error::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Default backend endpoint, matching the dev deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8123/api";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = concat!("genflow/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`ChatStreamClient`](crate::stream::ChatStreamClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API, without the chat endpoint path
    pub base_url: String,

    /// Timeout for establishing the connection. The stream itself carries
    /// no read deadline.
    pub connect_timeout_secs: u64,

    /// User agent sent on every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at the given base URL, defaults elsewhere.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that the configuration can actually produce a connection.
    pub fn validate(&self) -> ConfigResult<()> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            message: format!("base_url '{}' is not a valid URL: {}", self.base_url, e),
        })?;
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "connect_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Load a configuration from a YAML file, interpolating `${ENV_VAR}`
/// references before parsing.
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let interpolated = env::interpolate_env_vars(&content)?;

    let config: ClientConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    config.validate()?;
    Ok(config)
}
