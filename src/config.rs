//! Server configuration loaded from environment variables.

use std::path::PathBuf;

use thiserror::Error;

pub const ROOT_VAR: &str = "BACKLOG_VIEW_ROOT";
pub const HOST_VAR: &str = "BACKLOG_VIEW_HOST";
pub const PORT_VAR: &str = "BACKLOG_VIEW_PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {var}: {value:?} is not a port number")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Backlog root (from BACKLOG_VIEW_ROOT)
    pub workspace: PathBuf,
    /// Bind host (from BACKLOG_VIEW_HOST)
    pub host: String,
    /// Bind port (from BACKLOG_VIEW_PORT)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset or blank values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get(PORT_VAR) {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value,
            })?,
            None => defaults.port,
        };

        Ok(Self {
            workspace: get(ROOT_VAR).map(PathBuf::from).unwrap_or(defaults.workspace),
            host: get(HOST_VAR).unwrap_or(defaults.host),
            port,
        })
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        host: Option<String>,
        port: Option<u16>,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
