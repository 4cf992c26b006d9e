//! Result reporting
//!
//! Open ports are written as `SUCCESS: <host>:<port>` the moment they are
//! found. Diagnostics go to a separate stream. Each line is written and
//! flushed under a lock, so concurrent attempts never interleave partial lines.

use crate::network::Endpoint;
use std::io::{self, Stderr, Stdout, Write};
use std::sync::{Mutex, PoisonError};

/// Sink for probe results, shared by every in-flight attempt
pub trait Reporter: Send + Sync {
    /// An endpoint accepted a connection
    fn open_port(&self, endpoint: &Endpoint);

    /// Closing an already reported connection failed
    fn close_failed(&self, endpoint: &Endpoint, error: &io::Error);
}

/// Line reported for an open port
pub fn success_line(endpoint: &Endpoint) -> String {
    format!("SUCCESS: {}", endpoint)
}

/// Diagnostic line for a connection that could not be closed cleanly
pub fn close_failure_line(endpoint: &Endpoint, error: &io::Error) -> String {
    format!("error closing connection to {}: {}", endpoint, error)
}

/// Writes success lines to one stream and diagnostics to another
pub struct StreamReporter<O, E> {
    out: Mutex<O>,
    err: Mutex<E>,
}

impl StreamReporter<Stdout, Stderr> {
    /// Report to the process' stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> StreamReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Recover the underlying writers
    pub fn into_inner(self) -> (O, E) {
        (
            self.out.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.err.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

fn write_line<W: Write>(sink: &Mutex<W>, line: &str) -> io::Result<()> {
    let mut writer = sink.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(writer, "{}", line)?;
    writer.flush()
}

impl<O: Write + Send, E: Write + Send> Reporter for StreamReporter<O, E> {
    fn open_port(&self, endpoint: &Endpoint) {
        if let Err(e) = write_line(&self.out, &success_line(endpoint)) {
            log::warn!("Failed to report open port {}: {}", endpoint, e);
        }
    }

    fn close_failed(&self, endpoint: &Endpoint, error: &io::Error) {
        log::warn!("Failed to close connection to {}: {}", endpoint, error);
        if let Err(e) = write_line(&self.err, &close_failure_line(endpoint, error)) {
            log::warn!("Failed to write diagnostic: {}", e);
        }
    }
}

/// Keeps reported lines in memory, in the order they were reported
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
    diagnostics: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Success lines reported so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Diagnostic lines reported so far
    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for MemoryReporter {
    fn open_port(&self, endpoint: &Endpoint) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(success_line(endpoint));
    }

    fn close_failed(&self, endpoint: &Endpoint, error: &io::Error) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(close_failure_line(endpoint, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_success_line_format() {
        assert_eq!(
            success_line(&Endpoint::new("127.0.0.1", 8001)),
            "SUCCESS: 127.0.0.1:8001"
        );
        assert_eq!(success_line(&Endpoint::new("::1", 22)), "SUCCESS: [::1]:22");
    }

    #[test]
    fn test_stream_reporter_separates_streams() {
        let reporter = StreamReporter::new(Vec::new(), Vec::new());
        let endpoint = Endpoint::new("localhost", 80);

        reporter.open_port(&endpoint);
        reporter.close_failed(&endpoint, &io::Error::from(io::ErrorKind::NotConnected));

        let (out, err) = reporter.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "SUCCESS: localhost:80\n");
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("error closing connection to localhost:80: "));
        assert_eq!(err.lines().count(), 1);
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let reporter = Arc::new(StreamReporter::new(Vec::new(), Vec::new()));

        let handles: Vec<_> = (0..8u16)
            .map(|t| {
                let reporter = reporter.clone();
                std::thread::spawn(move || {
                    for port in 1..=200u16 {
                        reporter.open_port(&Endpoint::new("10.0.0.1", t * 1000 + port));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reporter = Arc::try_unwrap(reporter).ok().unwrap();
        let (out, _) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1600);
        assert!(lines.iter().all(|l| l.starts_with("SUCCESS: 10.0.0.1:")));
    }

    #[test]
    fn test_memory_reporter_keeps_order() {
        let reporter = MemoryReporter::new();
        reporter.open_port(&Endpoint::new("h", 2));
        reporter.open_port(&Endpoint::new("h", 1));
        assert_eq!(reporter.lines(), vec!["SUCCESS: h:2", "SUCCESS: h:1"]);
        assert!(reporter.diagnostics().is_empty());
    }
}
