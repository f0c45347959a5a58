use serde::Serialize;
use thiserror::Error;

/// Failure descriptor carried in [`FetchState::error`](crate::FetchState).
///
/// Every failure a request run can produce is folded into the state through
/// this enum; nothing is thrown at the caller. The display strings are part
/// of the rendered surface, so they stay stable.
#[derive(Error, Debug, Clone, Eq, PartialEq, Serialize)]
pub enum FetchError {
    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("failed to fetch.")]
    Transport { inner: String },

    /// A response arrived but its body could not be read as text.
    #[error("failed to read the response body.")]
    BodyRead { inner: String },

    /// The configured body parser rejected the body. The raw text is kept
    /// alongside the cause so the consumer can inspect what was received.
    #[error("failed to parse the response body.")]
    Parse { raw: String, inner: String },

    /// The response carried a non-success status. Non-fatal: the body is
    /// still parsed and surfaced as data next to this error.
    #[error("Http-status not OK:{0}")]
    HttpStatus(u16),

    /// The state was explicitly reset while a request may have been live.
    #[error("aborted")]
    Aborted,
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    pub fn is_body_read(&self) -> bool {
        matches!(self, FetchError::BodyRead { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }

    pub fn is_http_status(&self) -> bool {
        matches!(self, FetchError::HttpStatus(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        let transport = FetchError::Transport {
            inner: "connection refused".to_string(),
        };
        assert_eq!(transport.to_string(), "failed to fetch.");

        let http = FetchError::HttpStatus(404);
        assert_eq!(http.to_string(), "Http-status not OK:404");

        assert_eq!(FetchError::Aborted.to_string(), "aborted");
    }

    #[test]
    fn test_predicates() {
        let parse = FetchError::Parse {
            raw: "not json {".to_string(),
            inner: "expected value".to_string(),
        };
        assert!(parse.is_parse());
        assert!(!parse.is_transport());

        let body_read = FetchError::BodyRead {
            inner: "stream cut".to_string(),
        };
        assert!(body_read.is_body_read());

        assert!(FetchError::Aborted.is_aborted());
        assert!(FetchError::HttpStatus(500).is_http_status());
    }

    #[test]
    fn test_serializes_with_cause() {
        let transport = FetchError::Transport {
            inner: "dns error".to_string(),
        };
        let serialized = serde_json::to_string(&transport).expect("serializable");
        assert!(serialized.contains("dns error"));
    }
}
