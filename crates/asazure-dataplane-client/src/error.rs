//! Error types for the dataplane client.

use thiserror::Error;

/// Errors that can occur while building or dispatching a dataplane request.
///
/// Collaborator failures (credential provider, transport) surface through
/// these variants unchanged; the client performs no retry, wrapping, or
/// reclassification. HTTP error statuses (4xx/5xx) are *not* errors at this
/// layer — they come back as ordinary [`reqwest::Response`] values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network or HTTP-level failure from the transport.
    ///
    /// DNS resolution, connection, or socket errors from the underlying
    /// `reqwest` client, passed through as-is.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The relative request path could not be resolved against the base URI.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid client configuration.
    ///
    /// For example, a base URI that cannot serve as a base for relative
    /// path resolution (`mailto:`, `data:`, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No base URI was available at call time.
    ///
    /// Neither the client was constructed with one nor did the call supply
    /// one explicitly.
    #[error("no base URI: the client holds none and the call supplied none")]
    MissingBaseUri,

    /// Cancellation was requested before or during the request.
    #[error("operation cancelled")]
    Cancelled,

    /// Authentication failure reported by the credential provider.
    #[error("authentication error: {0}")]
    Auth(String),
}

impl ClientError {
    /// Check if this error is a cancellation.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error came from the credential provider.
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
