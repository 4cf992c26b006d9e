//! Probe engine: bounded concurrent TCP connect attempts

use crate::config::ScanConfig;
use crate::network::{socket::TcpConnectScanner, Endpoint, PortResult};
use crate::output::Reporter;
use crate::scanner::pool::{AttemptPool, Slot};
use crate::scanner::ScanSummary;
use crate::utils::port_parser::expand_endpoints;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Main probing engine
pub struct ScanEngine {
    config: ScanConfig,
    tcp_scanner: TcpConnectScanner,
    reporter: Arc<dyn Reporter>,
    cancel: CancellationToken,
}

impl ScanEngine {
    /// Create a new engine with the given configuration and result sink
    pub fn new(config: ScanConfig, reporter: Arc<dyn Reporter>) -> crate::Result<Self> {
        config.validate()?;

        let tcp_scanner = TcpConnectScanner::new(config.timeout_duration());

        Ok(Self {
            config,
            tcp_scanner,
            reporter,
            cancel: CancellationToken::new(),
        })
    }

    /// Stop admitting new attempts once `token` is cancelled.
    ///
    /// Attempts already in flight still run to their own timeout.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Endpoints described by the configured target and port specification
    pub fn endpoints(&self) -> Vec<Endpoint> {
        expand_endpoints(&self.config.target, self.config.port_spec.as_deref())
    }

    /// Probe every configured endpoint
    pub async fn scan(&self) -> crate::Result<ScanSummary> {
        self.run(self.endpoints()).await
    }

    /// Probe `endpoints` with at most `workers` attempts in flight.
    ///
    /// Returns once every admitted attempt has finished. Open endpoints are
    /// reported as they are found, not in input order.
    pub async fn run<I>(&self, endpoints: I) -> crate::Result<ScanSummary>
    where
        I: IntoIterator<Item = Endpoint>,
    {
        let start_time = Instant::now();
        let endpoints: Vec<Endpoint> = endpoints.into_iter().collect();
        let mut summary = ScanSummary::new(endpoints.len());

        info!(
            "Probing {} endpoints with {} workers, {}ms timeout",
            endpoints.len(),
            self.config.workers,
            self.config.timeout
        );

        let mut pool = AttemptPool::new(self.config.workers);
        let mut pending = endpoints.into_iter();

        while let Some(endpoint) = pending.next() {
            let slot = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    summary.skipped = 1 + pending.len();
                    info!("Scan cancelled, {} endpoints not attempted", summary.skipped);
                    break;
                }
                slot = pool.acquire() => slot?,
            };

            let scanner = self.tcp_scanner;
            let reporter = self.reporter.clone();
            pool.spawn(slot, move |slot| probe_endpoint(scanner, endpoint, slot, reporter));
        }

        let drained = pool.drain().await;
        for result in drained.completed {
            summary.record(result);
        }
        summary.unreachable += drained.failed;
        summary.duration = start_time.elapsed();

        info!("Scan finished: {}", summary);
        Ok(summary)
    }
}

/// Run one attempt while holding `slot`.
///
/// The slot is released as soon as the connect call resolves, before the
/// result is reported and before an open connection is closed.
pub async fn probe_endpoint(
    scanner: TcpConnectScanner,
    endpoint: Endpoint,
    slot: Slot,
    reporter: Arc<dyn Reporter>,
) -> PortResult {
    let attempt = scanner.connect(&endpoint).await;
    slot.release();

    debug!(
        "{} is {} after {}ms",
        endpoint,
        attempt.state,
        attempt.elapsed.as_millis()
    );

    if let Some(stream) = attempt.stream {
        reporter.open_port(&endpoint);
        if let Err(e) = TcpConnectScanner::close(stream).await {
            reporter.close_failed(&endpoint, &e);
        }
    }

    PortResult::new(endpoint, attempt.state).with_response_time(attempt.elapsed)
}
