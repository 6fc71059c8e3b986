//! Transport abstraction over the actual HTTP send.
//!
//! The client never talks to the network directly; it hands fully-prepared
//! requests to an [`HttpTransport`]. The default transport is a plain
//! [`reqwest::Client`]. Connection reuse, TLS, proxies, and timeouts are all
//! the transport's business — callers that need specific behavior supply
//! their own factory.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Request, Response};
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// A handle that can perform one HTTP exchange.
///
/// Implementations must be safe to share across concurrent callers; the
/// client imposes no locking of its own around `send`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and resolve once the response headers have arrived.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] on transport failure or
    /// [`ClientError::Cancelled`] if the token fires mid-exchange. HTTP
    /// error statuses are successful returns, not errors.
    async fn send(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response, ClientError>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response, ClientError> {
        tokio::select! {
            () = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.execute(request) => Ok(result?),
        }
    }
}

/// Produces transport handles on demand.
///
/// Invoked once at client construction and again on every
/// [`DataplaneClient::reset_transport`](crate::DataplaneClient::reset_transport).
pub type TransportFactory =
    Arc<dyn Fn() -> Result<Arc<dyn HttpTransport>, ClientError> + Send + Sync>;

/// Factory used when the caller does not supply one: a stock
/// [`reqwest::Client`] with default settings.
pub(crate) fn default_transport_factory() -> TransportFactory {
    Arc::new(|| {
        let client = reqwest::Client::builder().build()?;
        Ok(Arc::new(client) as Arc<dyn HttpTransport>)
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn reqwest_transport_performs_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = (default_transport_factory())().unwrap();
        let request = Request::new(
            reqwest::Method::GET,
            url::Url::parse(&format!("{}/ping", server.uri())).unwrap(),
        );

        let response = transport
            .send(request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
    }

    #[tokio::test]
    async fn reqwest_transport_honors_cancellation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let transport = (default_transport_factory())().unwrap();
        let request = Request::new(
            reqwest::Method::GET,
            url::Url::parse(&server.uri()).unwrap(),
        );

        let result = transport.send(request, &cancel).await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
    }
}
