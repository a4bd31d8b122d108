//! Configuration file support for halsimd
//!
//! Loads and validates the daemon configuration from a TOML file.
//! Default location: /etc/p4hal/halsimd.conf

use crate::error::{HalSimError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Complete halsimd configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalSimConfig {
    /// Address the event endpoint listens on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Per-sink write budget for transceiver fan-out, in seconds
    #[serde(default = "default_event_write_timeout")]
    pub event_write_timeout_secs: u64,

    /// Idle budget for client connections, in seconds; idle connections
    /// past it are closed
    #[serde(default = "default_client_idle_timeout")]
    pub client_idle_timeout_secs: u64,

    /// Budget for writing one response back to a client, in seconds; a
    /// peer that stops reading past it is disconnected
    #[serde(default = "default_client_write_timeout")]
    pub client_write_timeout_secs: u64,
}

fn default_listen_addr() -> String {
    "127.0.0.1:28010".to_string()
}

fn default_event_write_timeout() -> u64 {
    10
}

fn default_client_idle_timeout() -> u64 {
    600
}

fn default_client_write_timeout() -> u64 {
    30
}

impl Default for HalSimConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            event_write_timeout_secs: default_event_write_timeout(),
            client_idle_timeout_secs: default_client_idle_timeout(),
            client_write_timeout_secs: default_client_write_timeout(),
        }
    }
}

impl HalSimConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content).map_err(|e| {
                    HalSimError::Configuration(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(HalSimError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default("/etc/p4hal/halsimd.conf")
    }

    /// Get the per-sink write budget as Duration
    pub fn event_write_timeout(&self) -> Duration {
        Duration::from_secs(self.event_write_timeout_secs)
    }

    /// Get the client idle budget as Duration
    pub fn client_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.client_idle_timeout_secs)
    }

    /// Get the client write budget as Duration
    pub fn client_write_timeout(&self) -> Duration {
        Duration::from_secs(self.client_write_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(HalSimError::Configuration(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            )));
        }

        if self.event_write_timeout_secs == 0 {
            return Err(HalSimError::Configuration(
                "event_write_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.client_idle_timeout_secs == 0 {
            return Err(HalSimError::Configuration(
                "client_idle_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.client_write_timeout_secs == 0 {
            return Err(HalSimError::Configuration(
                "client_write_timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
