//! Configuration module for the portcheck prober

use std::time::Duration;
use tokio::sync::Semaphore;

/// Per-attempt connect timeout used when none is given, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// In-flight attempts allowed per logical core
pub const WORKERS_PER_CORE: usize = 10;

/// Main configuration structure for a probe run.
///
/// Every value a run depends on lives here and is handed to the engine at
/// construction, so tests can inject a tiny pool and a short timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Host name or IP address to probe
    pub target: String,

    /// Port specification (`80`, `8000-8100`, `22,80,443,8000-8002`).
    /// `None` means every port from 1 to 65535.
    pub port_spec: Option<String>,

    /// Maximum number of connection attempts in flight at once
    pub workers: usize,

    /// Timeout for each connection attempt in milliseconds
    pub timeout: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1".to_string(),
            port_spec: None,
            workers: default_workers(),
            timeout: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Default pool size: ten attempts per logical core
pub fn default_workers() -> usize {
    num_cpus::get().max(1) * WORKERS_PER_CORE
}

impl ScanConfig {
    /// Create a new scan configuration
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Set the port specification
    pub fn with_ports(mut self, port_spec: impl Into<String>) -> Self {
        self.port_spec = Some(port_spec.into());
        self
    }

    /// Set the number of concurrent attempts
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the timeout in milliseconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.target.trim().is_empty() {
            return Err(crate::ScanError::InvalidTarget("Target cannot be empty".to_string()));
        }

        if self.workers == 0 {
            return Err(crate::ScanError::ConfigError(
                "Worker count must be greater than 0".to_string(),
            ));
        }

        if self.workers > Semaphore::MAX_PERMITS {
            return Err(crate::ScanError::ConfigError(format!(
                "Worker count must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }

        if self.timeout == 0 {
            return Err(crate::ScanError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
