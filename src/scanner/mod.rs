//! Scanner module containing the probe engine and its worker pool

pub mod engine;
pub mod pool;

use crate::network::{Endpoint, PortResult, PortState};
use std::fmt;
use std::time::Duration;

pub use engine::ScanEngine;
pub use pool::{AttemptPool, Slot};

/// Tally of one probe run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Endpoints handed to the run
    pub total: usize,

    /// Open endpoints, in the order their attempts finished
    pub open: Vec<Endpoint>,

    /// Attempts refused by the target
    pub closed: usize,

    /// Attempts that hit the timeout
    pub filtered: usize,

    /// Attempts that failed any other way
    pub unreachable: usize,

    /// Endpoints never attempted because the run was cancelled
    pub skipped: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ScanSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Add a finished attempt to the tally
    pub fn record(&mut self, result: PortResult) {
        match result.state {
            PortState::Open => self.open.push(result.endpoint),
            PortState::Closed => self.closed += 1,
            PortState::Filtered => self.filtered += 1,
            PortState::Unreachable => self.unreachable += 1,
        }
    }

    /// Number of attempts that ran to a verdict
    pub fn attempted(&self) -> usize {
        self.open.len() + self.closed + self.filtered + self.unreachable
    }

    /// Open port numbers in discovery order
    pub fn open_ports(&self) -> Vec<u16> {
        self.open.iter().map(Endpoint::port).collect()
    }

    /// True when every endpoint was attempted
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.attempted() == self.total
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} endpoints: {} open, {} closed, {} filtered, {} unreachable, {} skipped in {:.2}s",
            self.total,
            self.open.len(),
            self.closed,
            self.filtered,
            self.unreachable,
            self.skipped,
            self.duration.as_secs_f64()
        )
    }
}
