use std::sync::Arc;

use http::{HeaderMap, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

mod builder;
pub use self::builder::{API_CLIENT_HEADER, ApiClientBuilder, USER_PROJECT_HEADER};

mod call;
pub use self::call::ApiCall;

mod parameters;
pub use self::parameters::{
    CallBody, CallParams, CallPath, CallQuery, NoBody, NoParams, ParamValue, StandardParams,
};

mod response;
pub use self::response::{CallResult, NoContent};

mod auth;
pub use self::auth::{
    Authentication, AuthenticationError, GOOGLE_API_KEY_HEADER, SecureString, TokenFuture,
    TokenProvider,
};

#[cfg(feature = "oauth2")]
pub mod oauth2;
#[cfg(feature = "oauth2")]
pub use self::oauth2::{OAuth2Config, OAuth2ConfigBuilder, OAuth2Error, OAuth2Token};

pub mod transport;
pub use self::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

mod pagination;
pub use self::pagination::{PageTokenParams, Paginated};

mod error;
pub use self::error::{ApiClientError, ApiError, ApiErrorItem};

/// HTTP client for a Google REST API.
///
/// An `ApiClient` holds the base URL of a service, the default headers and
/// standard parameters, and the [`Transport`] that performs the requests and
/// attaches credentials. Use [`ApiClientBuilder`] to create instances.
///
/// Cloning is cheap, the transport is shared.
///
/// # Example
///
/// ```rust,no_run
/// use gapi_core::{ApiClient, CallParams, CallPath, NoBody};
/// use http::Method;
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct File { id: String, name: String }
///
/// struct GetFile {
///     file_id: String,
/// }
///
/// impl CallParams for GetFile {
///     fn add_path_params(&self, path: CallPath) -> CallPath {
///         path.add_param("fileId", &self.file_id)
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://www.googleapis.com/drive/v3/")
///     .with_bearer_token("ya29.a0...")
///     .build()?;
///
/// let params = GetFile { file_id: "1a2b3c".to_string() };
/// let file: File = client
///     .perform(Method::GET, "files/{fileId}", &params, None::<&NoBody>)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    default_headers: HeaderMap,
    standard_params: StandardParams,
}

// Create
impl ApiClient {
    /// Creates a builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Returns the base URL of the service.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

// Call
impl ApiClient {
    /// Starts a call.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidPath`] if the template has unbalanced braces,
    /// a query or a fragment.
    pub fn call(&self, method: Method, path: CallPath) -> Result<ApiCall, ApiClientError> {
        ApiCall::build(
            Arc::clone(&self.transport),
            self.base_url.clone(),
            method,
            path,
            self.default_headers.clone(),
            self.standard_params.clone(),
        )
    }

    /// Starts a `GET` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn get(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::GET, path.into())
    }

    /// Starts a `POST` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn post(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::POST, path.into())
    }

    /// Starts a `PUT` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn put(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::PUT, path.into())
    }

    /// Starts a `DELETE` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn delete(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::DELETE, path.into())
    }

    /// Starts a `PATCH` call.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn patch(&self, path: impl Into<CallPath>) -> Result<ApiCall, ApiClientError> {
        self.call(Method::PATCH, path.into())
    }

    /// Performs an API method and decodes its result.
    ///
    /// This is the single entry point used by generated clients:
    ///
    /// - no parameters: pass `&NoParams`,
    /// - no request body: pass `None::<&NoBody>`,
    /// - no typed result: decode into [`NoContent`].
    ///
    /// Exactly one request is sent, after the path template is resolved.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::PathUnresolved`] if a path parameter is absent, nothing is sent
    /// - [`ApiClientError::Api`] if the service answers with an error
    /// - [`ApiClientError::JsonError`] if the response does not match `O`
    /// - [`ApiClientError::InvalidResponse`] if the response has no body
    /// - transport and authentication errors
    pub async fn perform<P, B, O>(
        &self,
        method: Method,
        path: &str,
        params: &P,
        body: Option<&B>,
    ) -> Result<O, ApiClientError>
    where
        P: CallParams + ?Sized,
        B: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let mut call = self.call(method, CallPath::from(path))?.with_params(params);
        if let Some(body) = body {
            call = call.json(body)?;
        }

        let result = call.await?;
        result.as_json()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::client::transport::TransportFuture;

    #[derive(Debug)]
    struct StubTransport {
        status: StatusCode,
        body: &'static str,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl StubTransport {
        fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                requests: Mutex::default(),
            })
        }

        fn count(&self) -> usize {
            self.requests.lock().expect("not poisoned").len()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
            self.requests.lock().expect("not poisoned").push(request);
            let response =
                TransportResponse::new(self.status, HeaderMap::new(), self.body.as_bytes().to_vec());
            Box::pin(async move { Ok(response) })
        }
    }

    fn client(transport: &Arc<StubTransport>) -> ApiClient {
        ApiClient::builder()
            .with_base_url("https://www.googleapis.com/drive/v3")
            .with_shared_transport(Arc::clone(transport) as Arc<dyn Transport>)
            .build()
            .expect("valid client")
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Point {
        x: i32,
    }

    #[tokio::test]
    async fn should_decode_bare_and_data_payloads() {
        for body in [r#"{"x": 1}"#, r#"{"data": {"x": 1}}"#] {
            let transport = StubTransport::new(StatusCode::OK, body);

            let point: Point = client(&transport)
                .perform(Method::GET, "points", &NoParams, None::<&NoBody>)
                .await
                .expect("decoded");

            assert_eq!(point, Point { x: 1 });
            assert_eq!(transport.count(), 1);
        }
    }

    #[tokio::test]
    async fn should_return_api_error() {
        let transport = StubTransport::new(
            StatusCode::FORBIDDEN,
            r#"{"error": {"code": 403, "status": "PERMISSION_DENIED", "message": "no"}}"#,
        );

        let result: Result<Point, _> = client(&transport)
            .perform(Method::GET, "points", &NoParams, None::<&NoBody>)
            .await;

        let Err(ApiClientError::Api(error)) = result else {
            panic!("expected API error, got {result:?}");
        };
        assert_eq!(error.code, 403);
        assert_eq!(error.message, "no");
    }

    #[tokio::test]
    async fn should_report_empty_response() {
        let transport = StubTransport::new(StatusCode::OK, "");

        let result: Result<Point, _> = client(&transport)
            .perform(Method::GET, "points", &NoParams, None::<&NoBody>)
            .await;

        assert!(
            matches!(result, Err(ApiClientError::InvalidResponse { status_code: 200 })),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn should_accept_no_content() {
        let transport = StubTransport::new(StatusCode::NO_CONTENT, "");

        let result: NoContent = client(&transport)
            .perform(Method::DELETE, "files/abc", &NoParams, None::<&NoBody>)
            .await
            .expect("no content");

        assert_eq!(result, NoContent);
    }

    #[tokio::test]
    async fn should_send_json_body() {
        let transport = StubTransport::new(StatusCode::OK, r#"{"x": 2}"#);

        let _: Point = client(&transport)
            .perform(Method::POST, "points", &NoParams, Some(&json!({"x": 2})))
            .await
            .expect("decoded");

        let requests = transport.requests.lock().expect("not poisoned");
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].body.as_deref(), Some(br#"{"x":2}"#.as_slice()));
    }

    #[tokio::test]
    async fn should_name_failing_field() {
        let transport = StubTransport::new(StatusCode::OK, r#"{"x": "one"}"#);

        let result: Result<Point, _> = client(&transport)
            .perform(Method::GET, "points", &NoParams, None::<&NoBody>)
            .await;

        let Err(ApiClientError::JsonError { path, field, .. }) = result else {
            panic!("expected JSON error, got {result:?}");
        };
        assert_eq!(path, "points");
        assert_eq!(field, "x");
    }

    #[test]
    fn should_reject_malformed_template() {
        let transport = StubTransport::new(StatusCode::OK, "{}");

        let result = client(&transport).get("files/{fileId");

        assert!(matches!(result, Err(ApiClientError::InvalidPath { .. })));
    }
}
