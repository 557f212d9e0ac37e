//! Error types for the news core.
//!
//! [`FetchError`] is what a [`NewsSource`](crate::source::NewsSource)
//! reports.  [`FailureKind`] is the small taxonomy the paginated resources
//! publish to the presentation layer; every failure ends up as one of its
//! variants and never escapes the controller boundary.

use thiserror::Error;

/// A failure reported by the fetch capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Low-level I/O failure: DNS, socket, TLS, timeout.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request reached the server, which answered with a non-success
    /// status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Anything else (undecodable body, unexpected payload, ...).
    #[error("{0}")]
    Other(String),
}

/// Classified failure, as published in an error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The connectivity gate was closed; no fetch was attempted.
    NoConnectivity,
    /// The fetch failed at the transport level.
    TransportUnreachable,
    /// The server rejected the request; carries its message verbatim.
    ServerError(String),
    /// Any other failure during the fetch.
    Unknown,
}

impl FailureKind {
    /// Text published in [`State::Error`](crate::state::State::Error).
    pub fn message(&self) -> String {
        match self {
            FailureKind::NoConnectivity => "No internet connection".to_string(),
            FailureKind::TransportUnreachable => "Unable to connect".to_string(),
            FailureKind::ServerError(message) => message.clone(),
            FailureKind::Unknown => "No signal".to_string(),
        }
    }
}

impl From<&FetchError> for FailureKind {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Transport(_) => FailureKind::TransportUnreachable,
            FetchError::Server { message, .. } => FailureKind::ServerError(message.clone()),
            FetchError::Other(_) => FailureKind::Unknown,
        }
    }
}

/// Errors raised while loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
