//! Port specification parsing and endpoint expansion
//!
//! Grammar: `PORT(,PORT)*` where `PORT := NUMBER | NUMBER-NUMBER`. A token that
//! does not parse, lies outside 1-65535, or describes a reversed range is
//! dropped on its own; its siblings are still expanded.

use crate::network::{normalize_host, Endpoint};
use std::ops::RangeInclusive;
use std::sync::Arc;
use thiserror::Error;

/// Lowest port that can be probed
pub const MIN_PORT: u16 = 1;

/// Highest port that can be probed
pub const MAX_PORT: u16 = 65535;

/// Why a single port token contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("empty port token")]
    Empty,

    #[error("'{0}' is not a decimal port number")]
    NotANumber(String),

    #[error("port {0} is outside 1-65535")]
    OutOfRange(String),

    #[error("range {0}-{1} is reversed")]
    Reversed(u16, u16),

    #[error("'{0}' has more than one range separator")]
    TooManySeparators(String),
}

/// Parse one comma-separated token into the inclusive range of ports it names.
///
/// A single port `p` yields `p..=p`.
pub fn parse_token(token: &str) -> Result<RangeInclusive<u16>, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let parts: Vec<&str> = token.split('-').collect();
    match parts.as_slice() {
        [single] => {
            let port = parse_bound(single)?;
            Ok(port..=port)
        }
        [low, high] => {
            let start = parse_bound(low)?;
            let end = parse_bound(high)?;
            if start > end {
                return Err(TokenError::Reversed(start, end));
            }
            Ok(start..=end)
        }
        _ => Err(TokenError::TooManySeparators(token.to_string())),
    }
}

fn parse_bound(text: &str) -> Result<u16, TokenError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenError::NotANumber(text.to_string()));
    }

    // Only digits remain, so a failed parse means the value overflowed u16
    match text.parse::<u16>() {
        Ok(port) if port >= MIN_PORT => Ok(port),
        _ => Err(TokenError::OutOfRange(text.to_string())),
    }
}

/// Expand a port specification into an ordered list of ports.
///
/// `None` expands to every port from 1 to 65535. Tokens are expanded left to
/// right, each range in ascending order; malformed tokens are skipped.
pub fn expand_ports(port_spec: Option<&str>) -> Vec<u16> {
    let Some(spec) = port_spec else {
        return (MIN_PORT..=MAX_PORT).collect();
    };

    let mut ports = Vec::new();
    for token in spec.split(',') {
        match parse_token(token) {
            Ok(range) => ports.extend(range),
            Err(e) => log::debug!("Dropping port token '{}': {}", token, e),
        }
    }
    ports
}

/// Expand a host and port specification into the endpoints to probe
pub fn expand_endpoints(host: &str, port_spec: Option<&str>) -> Vec<Endpoint> {
    let host: Arc<str> = Arc::from(normalize_host(host));

    expand_ports(port_spec)
        .into_iter()
        .map(|port| Endpoint::with_shared_host(host.clone(), port))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_port() {
        assert_eq!(parse_token("80"), Ok(80..=80));
        assert_eq!(parse_token("1"), Ok(1..=1));
        assert_eq!(parse_token("65535"), Ok(65535..=65535));
        assert_eq!(expand_ports(Some("80")), vec![80]);
    }

    #[test]
    fn test_range_is_inclusive() {
        assert_eq!(expand_ports(Some("8000-8002")), vec![8000, 8001, 8002]);
        assert_eq!(expand_ports(Some("22-22")), vec![22]);
        assert_eq!(expand_ports(Some("65534-65535")), vec![65534, 65535]);
    }

    #[test]
    fn test_mixed_spec_keeps_token_order() {
        assert_eq!(
            expand_ports(Some("80,443,8000-8002")),
            vec![80, 443, 8000, 8001, 8002]
        );
        assert_eq!(expand_ports(Some("443,22")), vec![443, 22]);
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(parse_token(""), Err(TokenError::Empty));
        assert_eq!(parse_token("http"), Err(TokenError::NotANumber("http".to_string())));
        assert_eq!(parse_token("+80"), Err(TokenError::NotANumber("+80".to_string())));
        assert_eq!(parse_token("0"), Err(TokenError::OutOfRange("0".to_string())));
        assert_eq!(parse_token("65536"), Err(TokenError::OutOfRange("65536".to_string())));
        assert_eq!(parse_token("70000"), Err(TokenError::OutOfRange("70000".to_string())));
        assert_eq!(parse_token("5-3"), Err(TokenError::Reversed(5, 3)));
        assert_eq!(
            parse_token("1-2-3"),
            Err(TokenError::TooManySeparators("1-2-3".to_string()))
        );
        assert_eq!(parse_token("-5"), Err(TokenError::NotANumber(String::new())));
        assert_eq!(parse_token("5-"), Err(TokenError::NotANumber(String::new())));
        assert_eq!(parse_token("1-65536"), Err(TokenError::OutOfRange("65536".to_string())));
    }

    #[test]
    fn test_malformed_tokens_do_not_abort_siblings() {
        assert_eq!(
            expand_ports(Some(",0,22,abc,65536,5-3,1-2-3,443")),
            vec![22, 443]
        );
    }

    #[test]
    fn test_rejected_specs_expand_to_nothing() {
        assert!(expand_ports(Some("70000")).is_empty());
        assert!(expand_ports(Some("10-5")).is_empty());
        assert!(expand_ports(Some("")).is_empty());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(expand_ports(Some("80, 443 , 1000 - 1001")), vec![80, 443, 1000, 1001]);
    }

    #[test]
    fn test_no_spec_covers_every_port() {
        let ports = expand_ports(None);
        assert_eq!(ports.len(), 65535);
        assert_eq!(ports.first(), Some(&1));
        assert_eq!(ports.last(), Some(&65535));
    }

    #[test]
    fn test_expand_endpoints() {
        let endpoints = expand_endpoints("127.0.0.1", Some("80,8000-8001"));
        let rendered: Vec<String> = endpoints.iter().map(|e| e.to_string()).collect();
        assert_eq!(rendered, vec!["127.0.0.1:80", "127.0.0.1:8000", "127.0.0.1:8001"]);

        let v6 = expand_endpoints("[::1]", Some("22"));
        assert_eq!(v6[0].host(), "::1");
        assert_eq!(v6[0].to_string(), "[::1]:22");
    }
}
