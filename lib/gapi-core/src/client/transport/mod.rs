//! The HTTP transport seam.
//!
//! An [`ApiClient`](crate::ApiClient) hands every request to a [`Transport`].
//! [`ReqwestTransport`] is the default: it attaches credentials and performs
//! the call with `reqwest`. Tests and other HTTP stacks plug their own
//! implementation in with
//! [`ApiClientBuilder::with_transport`](crate::ApiClientBuilder::with_transport).

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use http::{HeaderMap, Method, StatusCode};
use url::Url;

use super::ApiClientError;

mod reqwest_transport;
pub use self::reqwest_transport::ReqwestTransport;

/// Future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, ApiClientError>> + Send + 'a>>;

/// Performs HTTP requests for an [`ApiClient`](crate::ApiClient).
///
/// A transport sends exactly one request per call to [`send`](Self::send), it
/// never retries.
pub trait Transport: Debug + Send + Sync {
    /// Sends the request and returns the response, whatever its status.
    fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// A fully resolved request.
#[derive(Clone, derive_more::Debug)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: Method,
    /// Base URL joined with the resolved path, without query.
    pub url: Url,
    /// Query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Request headers, without credentials.
    pub headers: HeaderMap,
    /// The serialized body.
    #[debug(ignore)]
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Returns the URL with the query string appended.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }
}

/// A response, whatever its status.
#[derive(Clone, derive_more::Debug)]
pub struct TransportResponse {
    /// The HTTP status.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The body, `None` when empty.
    #[debug(ignore)]
    pub body: Option<Vec<u8>>,
}

impl TransportResponse {
    /// Creates a response, an empty body is stored as `None`.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        let body = (!body.is_empty()).then_some(body);
        Self {
            status,
            headers,
            body,
        }
    }
}
