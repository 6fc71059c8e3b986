//! # asazure-dataplane-client
//!
//! Thin dataplane HTTP client for Azure Analysis Services endpoints.
//!
//! The crate does one thing: build a single authenticated GET or POST against
//! a dataplane base URI, stamp it with a `x-ms-client-request-id` correlation
//! header, run it through a pluggable [`CredentialProvider`], and hand back
//! the raw [`reqwest::Response`]. There is no retry, no response parsing, and
//! no interpretation of HTTP status codes — a 4xx/5xx is a successful call at
//! this layer. Policy above (retries, deserialization) and below (connection
//! pooling, timeouts) belongs to the caller and the transport respectively.
//!
//! ## Example
//!
//! ```no_run
//! use asazure_dataplane_client::{
//!     BearerTokenCredential, CallOptions, ClientConfig, DataplaneClient,
//! };
//! use url::Url;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), asazure_dataplane_client::ClientError> {
//! let config = ClientConfig::new()
//!     .with_base_uri(Url::parse("https://westus.asazure.windows.net/")?)
//!     .with_credentials(BearerTokenCredential::new("access-token"));
//!
//! let client = DataplaneClient::new(config)?;
//!
//! let response = client
//!     .get_with(
//!         "servers/myserver/status",
//!         CallOptions::new().with_correlation_id(Uuid::new_v4()),
//!     )
//!     .await?;
//!
//! println!("status: {}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod transport;

pub use client::{CLIENT_REQUEST_ID, CallOptions, ClientConfig, DataplaneClient};
pub use credentials::{BearerTokenCredential, CredentialProvider};
pub use error::ClientError;
pub use transport::{HttpTransport, TransportFactory};
