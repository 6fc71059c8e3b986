//! The dataplane client: request construction and dispatch.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method, Request, Response};
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use crate::credentials::CredentialProvider;
use crate::error::ClientError;
use crate::transport::{HttpTransport, TransportFactory, default_transport_factory};

/// Name of the correlation header attached to every outgoing request.
pub const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

/// Configuration for [`DataplaneClient`].
///
/// Every field is optional; omissions fall back at well-defined points:
/// no base URI defers the requirement to call time, no credentials means
/// requests go out without automatic auth injection, and no transport
/// factory means a stock [`reqwest::Client`].
///
/// # Examples
///
/// ```no_run
/// use asazure_dataplane_client::{BearerTokenCredential, ClientConfig, DataplaneClient};
/// use url::Url;
///
/// # fn example() -> Result<(), asazure_dataplane_client::ClientError> {
/// let config = ClientConfig::new()
///     .with_base_uri(Url::parse("https://westus.asazure.windows.net/")?)
///     .with_credentials(BearerTokenCredential::new("token"));
///
/// let client = DataplaneClient::new(config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Clone)]
pub struct ClientConfig {
    base_uri: Option<Url>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    transport_factory: Option<TransportFactory>,
}

impl ClientConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URI that relative request paths resolve against.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// Set the credential provider applied to every outgoing request.
    #[must_use]
    pub fn with_credentials(mut self, credentials: impl CredentialProvider + 'static) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    /// Set an already-shared credential provider.
    #[must_use]
    pub fn with_shared_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the factory that produces transport handles.
    ///
    /// Invoked once during [`DataplaneClient::new`] and again on every
    /// [`DataplaneClient::reset_transport`].
    #[must_use]
    pub fn with_transport_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn HttpTransport>, ClientError> + Send + Sync + 'static,
    {
        self.transport_factory = Some(Arc::new(factory));
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_uri", &self.base_uri)
            .field("credentials", &self.credentials.as_ref().map(|_| "<provider>"))
            .field(
                "transport_factory",
                &self.transport_factory.as_ref().map(|_| "<factory>"),
            )
            .finish()
    }
}

/// Per-call overrides for [`DataplaneClient::get_with`] and
/// [`DataplaneClient::post_with`].
#[derive(Default, Clone, Debug)]
pub struct CallOptions {
    base_uri: Option<Url>,
    correlation_id: Option<Uuid>,
    access_token: Option<String>,
    headers: HeaderMap,
    cancellation: Option<CancellationToken>,
}

impl CallOptions {
    /// Create options with every field defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve this call against `base_uri` instead of the client's stored
    /// base URI.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// Set the correlation id for this call.
    ///
    /// Defaults to [`Uuid::nil`] when omitted.
    #[must_use]
    pub const fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Accepted for call-site compatibility with the historical client
    /// surface; the token is deliberately never read and has no effect on
    /// the outgoing request. Authenticate through
    /// [`ClientConfig::with_credentials`] instead.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Extra headers for this call, typically content headers for a POST
    /// body. A `x-ms-client-request-id` entry here is always overwritten by
    /// the correlation id.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Cancellation signal for this call, observed before credential
    /// processing and during the network exchange.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = Some(cancellation);
        self
    }
}

/// Thin HTTP client for dataplane operations against an analytics service.
///
/// Builds one request per call — method, resolved URI, correlation header,
/// optional body — routes it through the configured [`CredentialProvider`]
/// (if any) and sends it over the current transport. The raw
/// [`reqwest::Response`] comes back verbatim: no status inspection, no
/// retries, no response parsing.
pub struct DataplaneClient {
    base_uri: Option<Url>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    transport_factory: TransportFactory,
    transport: RwLock<Arc<dyn HttpTransport>>,
}

impl fmt::Debug for DataplaneClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataplaneClient")
            .field("base_uri", &self.base_uri)
            .field("credentials", &self.credentials.as_ref().map(|_| "<provider>"))
            .finish_non_exhaustive()
    }
}

impl DataplaneClient {
    /// Create a client from `config`.
    ///
    /// The transport is materialized here by invoking the factory, so
    /// [`get`](Self::get) and [`post`](Self::post) never construct one
    /// mid-call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the base URI cannot serve
    /// as a base for relative resolution, or the factory's error if it fails
    /// to produce a transport.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if let Some(base_uri) = &config.base_uri {
            if base_uri.cannot_be_a_base() {
                return Err(ClientError::Configuration(format!(
                    "base URI cannot serve as a base for relative paths: {base_uri}"
                )));
            }
        }

        let transport_factory = config
            .transport_factory
            .unwrap_or_else(default_transport_factory);
        let transport = (transport_factory)()?;

        Ok(Self {
            base_uri: config.base_uri,
            credentials: config.credentials,
            transport_factory,
            transport: RwLock::new(transport),
        })
    }

    /// The base URI this client resolves relative paths against, if any.
    #[must_use]
    pub const fn base_uri(&self) -> Option<&Url> {
        self.base_uri.as_ref()
    }

    /// Replace the current transport with a fresh one from the factory.
    ///
    /// Useful when the caller wants new connection state without rebuilding
    /// the client. The swap is guarded, so an in-flight send keeps the
    /// handle it already took; callers should still avoid resetting while
    /// requests are outstanding if they expect those requests to see the
    /// fresh transport.
    ///
    /// # Errors
    ///
    /// Propagates the factory's error; the previous transport stays in
    /// place on failure.
    pub fn reset_transport(&self) -> Result<(), ClientError> {
        let fresh = (self.transport_factory)()?;
        let mut slot = self
            .transport
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = fresh;
        Ok(())
    }

    /// Issue a GET for `path` against the stored base URI with a nil
    /// correlation id.
    ///
    /// # Errors
    ///
    /// See [`get_with`](Self::get_with).
    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        self.get_with(path, CallOptions::new()).await
    }

    /// Issue a GET for `path` with explicit per-call options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingBaseUri`] when neither the client nor
    /// `opts` carries a base URI, [`ClientError::Cancelled`] when
    /// cancellation is observed, and credential or transport errors
    /// unchanged.
    pub async fn get_with(&self, path: &str, opts: CallOptions) -> Result<Response, ClientError> {
        self.send_request(Method::GET, path, None, opts).await
    }

    /// Issue a POST for `path` against the stored base URI with a nil
    /// correlation id. `body`, when given, is attached verbatim; content
    /// type and encoding are the caller's responsibility.
    ///
    /// # Errors
    ///
    /// See [`get_with`](Self::get_with).
    pub async fn post(&self, path: &str, body: Option<Body>) -> Result<Response, ClientError> {
        self.post_with(path, body, CallOptions::new()).await
    }

    /// Issue a POST for `path` with explicit per-call options.
    ///
    /// # Errors
    ///
    /// See [`get_with`](Self::get_with).
    pub async fn post_with(
        &self,
        path: &str,
        body: Option<Body>,
        opts: CallOptions,
    ) -> Result<Response, ClientError> {
        self.send_request(Method::POST, path, body, opts).await
    }

    /// Build and dispatch one request.
    ///
    /// The sequence is fixed: resolve the target URI, attach body and caller
    /// headers, stamp the correlation header (last write wins), run the
    /// credential provider, send. Each step's failure surfaces unchanged.
    async fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
        opts: CallOptions,
    ) -> Result<Response, ClientError> {
        let CallOptions {
            base_uri,
            correlation_id,
            // Accepted but intentionally unused, see CallOptions::with_access_token.
            access_token: _,
            headers,
            cancellation,
        } = opts;

        let base = base_uri
            .as_ref()
            .or(self.base_uri.as_ref())
            .ok_or(ClientError::MissingBaseUri)?;
        let url = base.join(path)?;
        let correlation_id = correlation_id.unwrap_or_else(Uuid::nil);

        debug!("dispatching {method} {url} (correlation id {correlation_id})");

        let mut request = Request::new(method, url);
        *request.body_mut() = body;
        *request.headers_mut() = headers;

        let correlation_value = HeaderValue::from_str(&correlation_id.to_string())
            .map_err(|e| {
                ClientError::Configuration(format!(
                    "correlation id is not a valid header value: {e}"
                ))
            })?;
        request
            .headers_mut()
            .insert(HeaderName::from_static(CLIENT_REQUEST_ID), correlation_value);

        let cancel = cancellation.unwrap_or_default();

        let request = match &self.credentials {
            Some(provider) => {
                if cancel.is_cancelled() {
                    return Err(ClientError::Cancelled);
                }
                provider.apply(request, &cancel).await?
            }
            None => request,
        };

        self.transport().send(request, &cancel).await
    }

    /// Clone the current transport handle out of the guarded slot.
    ///
    /// The lock is released before any await point.
    fn transport(&self) -> Arc<dyn HttpTransport> {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
