//! Error types for the Picsmize client.
//!
//! # Design
//! Precondition, transport and API failures share one `Error` enum so a
//! caller handles every way `request` can fail through a single `match`.
//! Variants are listed in the order the client can raise them.

use std::fmt;

use thiserror::Error;

/// Errors returned by `PicsmizeClient::request` and `PicsmizeClient::header`.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration carried an `errorMessage` override.
    #[error("{0}")]
    Forced(String),

    #[error("Requires a valid API key for image processing.")]
    MissingCredential,

    #[error("HTTP transport is not available")]
    TransportUnavailable,

    #[error("the HTTP transport does not support secure connections")]
    InsecureTransport,

    #[error("unable to initialize a new transport session")]
    TransportInitFailed,

    /// The raw response had no blank line between headers and body.
    #[error("malformed response: no header/body delimiter found")]
    MalformedResponse,

    /// A network-level fault such as DNS, connect or timeout. HTTP error
    /// statuses are not transport failures.
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    #[error("Unable to parse JSON response from the Picsmize API")]
    InvalidResponseBody,

    /// The API answered with `status` other than `true`; carries its `message`.
    #[error("{0}")]
    Api(String),

    #[error("Cannot be called before an API call.")]
    NoPriorRequest,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of a transport fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Dns,
    Connect,
    Timeout,
    Proxy,
    Redirect,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Dns => "dns",
            FailureKind::Connect => "connect",
            FailureKind::Timeout => "timeout",
            FailureKind::Proxy => "proxy",
            FailureKind::Redirect => "redirect",
            FailureKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A transport fault: what kind, plus the transport's own description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_error_displays_literal_message() {
        let err = Error::Forced("config broke".to_string());
        assert_eq!(err.to_string(), "config broke");
    }

    #[test]
    fn api_error_displays_remote_message() {
        assert_eq!(Error::Api("bad image".to_string()).to_string(), "bad image");
    }

    #[test]
    fn transport_failure_converts_into_error() {
        let err: Error = TransportFailure::new(FailureKind::Timeout, "timed out").into();
        assert!(matches!(
            err,
            Error::Transport(TransportFailure { kind: FailureKind::Timeout, .. })
        ));
        assert_eq!(err.to_string(), "timed out");
    }
}
