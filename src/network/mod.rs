//! Network module: probe targets, port states and the TCP connect scanner

pub mod socket;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A concrete (host, port) pair to be probed.
///
/// The host is shared between all endpoints of a run, so building the full
/// 65535-port list costs one allocation for the name. Endpoints are never
/// mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: Arc<str>,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint. A bracketed IPv6 literal (`[::1]`) is stored bare.
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        Self::with_shared_host(normalize_host(host.as_ref()).into(), port)
    }

    /// Create an endpoint reusing an already interned host name
    pub fn with_shared_host(host: Arc<str>, port: u16) -> Self {
        Self { host, port }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Formats as `host:port`, bracketing hosts that contain a colon (`[::1]:22`).
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

pub(crate) fn normalize_host(host: &str) -> &str {
    let host = host.trim();
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

/// Outcome of a single connection attempt.
///
/// Only `Open` is ever reported; the other states are kept apart for
/// logging and the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    /// The three-way handshake completed within the timeout
    Open,
    /// The connection was actively refused
    Closed,
    /// No answer before the timeout elapsed
    Filtered,
    /// Any other connect failure (no route, resolution failure, local resource exhaustion)
    Unreachable,
}

impl PortState {
    pub fn is_open(&self) -> bool {
        matches!(self, PortState::Open)
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Open => write!(f, "open"),
            PortState::Closed => write!(f, "closed"),
            PortState::Filtered => write!(f, "filtered"),
            PortState::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Result of probing one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortResult {
    pub endpoint: Endpoint,
    pub state: PortState,
    pub response_time: Duration,
}

impl PortResult {
    pub fn new(endpoint: Endpoint, state: PortState) -> Self {
        Self {
            endpoint,
            state,
            response_time: Duration::from_millis(0),
        }
    }

    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }
}
