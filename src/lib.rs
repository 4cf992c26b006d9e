//! portcheck - bounded-concurrency TCP reachability prober
//!
//! Expands a port specification into endpoints for one host and attempts a
//! full TCP handshake against each of them, with a fixed number of attempts
//! in flight. Every port that accepts a connection within the timeout is
//! reported as soon as it is known.

pub mod config;
pub mod error;
pub mod network;
pub mod output;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{ScanError, ScanResult};
pub use network::{Endpoint, PortState};
pub use output::{MemoryReporter, Reporter, StreamReporter};
pub use scanner::engine::ScanEngine;
pub use scanner::ScanSummary;
pub use utils::port_parser::{expand_endpoints, expand_ports};

pub type Result<T> = std::result::Result<T, ScanError>;
