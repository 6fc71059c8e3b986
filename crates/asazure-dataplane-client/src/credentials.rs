//! Pluggable request authentication.
//!
//! A [`CredentialProvider`] gets the fully-built outgoing request just before
//! it is handed to the transport and returns the request it wants sent,
//! typically after adding an `Authorization` header. Token acquisition and
//! refresh live entirely behind this seam; the client never inspects what a
//! provider does to the request.

use std::fmt;

use async_trait::async_trait;
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// Authenticates outgoing requests.
///
/// Implementations take ownership of the request and return the (possibly
/// modified) request to send, rather than mutating shared header state in
/// place. A provider may suspend for its own I/O (token refresh) and must
/// honor the cancellation token across that suspension.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Attach authentication to `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Cancelled`] if cancellation was requested, or
    /// [`ClientError::Auth`] if credentials could not be applied. Errors
    /// surface to the caller unchanged.
    async fn apply(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Request, ClientError>;
}

/// Static bearer-token credentials.
///
/// Sets `Authorization: Bearer <token>` on every request. The token is held
/// in a [`SecretString`] so it never shows up in debug output, and the header
/// value is marked sensitive.
pub struct BearerTokenCredential {
    token: SecretString,
}

impl BearerTokenCredential {
    /// Create credentials from an already-acquired access token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

// Custom Debug implementation to avoid exposing the token
impl fmt::Debug for BearerTokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenCredential")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for BearerTokenCredential {
    async fn apply(
        &self,
        mut request: Request,
        cancel: &CancellationToken,
    ) -> Result<Request, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
                .map_err(|e| ClientError::Auth(format!("token is not a valid header value: {e}")))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);

        Ok(request)
    }
}
