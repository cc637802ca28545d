use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{handle_entry, Result};

pub const PROJECT_ENV: &str = "GCE_PROJECT";
pub const ZONE_ENV: &str = "GCE_ZONE";

// env names to make operation polling configurable
pub const POLL_INTERVAL_ENV: &str = "VMFLEET_POLL_INTERVAL_SECS";
pub const POLL_TIMEOUT_ENV: &str = "VMFLEET_POLL_TIMEOUT_SECS";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 300;

/// Out-of-band configuration for one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FleetConfig {
    /// Project the fleet lives in.
    pub project: Option<String>,

    /// Zone the fleet lives in.
    pub zone: Option<String>,

    /// Seconds between operation status polls.
    pub poll_interval_secs: u64,

    /// Total seconds an operation may stay non-terminal before the waiter
    /// gives up.
    pub poll_timeout_secs: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            project: None,
            zone: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

impl FleetConfig {
    pub fn from_env() -> Self {
        Self {
            project: std::env::var(PROJECT_ENV).ok(),
            zone: std::env::var(ZONE_ENV).ok(),
            poll_interval_secs: env_u64(POLL_INTERVAL_ENV).unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            poll_timeout_secs: env_u64(POLL_TIMEOUT_ENV).unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let _ = self.project()?;
        let _ = self.zone()?;
        Ok(())
    }

    pub fn project(&self) -> Result<String> {
        handle_entry(&self.project, PROJECT_ENV)
    }

    pub fn zone(&self) -> Result<String> {
        handle_entry(&self.zone, ZONE_ENV)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
