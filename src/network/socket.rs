//! TCP connect scanning: one full handshake per endpoint

use crate::network::{Endpoint, PortState};
use std::io;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// TCP connect scanner.
///
/// Name resolution is left to the connect call and counts against the same
/// timeout as the handshake.
#[derive(Debug, Clone, Copy)]
pub struct TcpConnectScanner {
    timeout: Duration,
}

/// What a single connect attempt produced
#[derive(Debug)]
pub struct ConnectAttempt {
    pub state: PortState,
    pub elapsed: Duration,
    /// The established connection, present only when `state` is `Open`
    pub stream: Option<TcpStream>,
}

impl TcpConnectScanner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt one connection. Never fails: every failure is a port state.
    pub async fn connect(&self, endpoint: &Endpoint) -> ConnectAttempt {
        let start_time = Instant::now();

        let result = tokio::time::timeout(
            self.timeout,
            TcpStream::connect((endpoint.host(), endpoint.port())),
        )
        .await;

        let (state, stream) = match result {
            Ok(Ok(stream)) => (PortState::Open, Some(stream)),
            Ok(Err(e)) => (classify_connect_error(&e), None),
            Err(_elapsed) => (PortState::Filtered, None),
        };

        ConnectAttempt {
            state,
            elapsed: start_time.elapsed(),
            stream,
        }
    }

    /// Close an established connection, surfacing any shutdown error
    pub async fn close(mut stream: TcpStream) -> io::Result<()> {
        stream.shutdown().await
    }
}

fn classify_connect_error(e: &io::Error) -> PortState {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => PortState::Closed,
        io::ErrorKind::TimedOut => PortState::Filtered,
        _ => {
            log::trace!("Connect failed: {}", e);
            PortState::Unreachable
        }
    }
}
