use reqwest::{Body, Request};
use tracing::debug;

use super::{Transport, TransportFuture, TransportRequest, TransportResponse};
use crate::client::{ApiClientError, Authentication};

/// The default [`Transport`], backed by a [`reqwest::Client`].
///
/// Credentials are attached to every request, marked as sensitive so that
/// `reqwest` never logs them.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    authentication: Option<Authentication>,
}

impl ReqwestTransport {
    /// Creates a transport from a configured client.
    pub fn new(client: reqwest::Client, authentication: Option<Authentication>) -> Self {
        Self {
            client,
            authentication,
        }
    }

    /// Returns the configured authentication.
    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    async fn build_request(&self, request: TransportRequest) -> Result<Request, ApiClientError> {
        let url = request.full_url();
        let TransportRequest {
            method,
            headers,
            body,
            ..
        } = request;

        let mut req = Request::new(method, url);
        *req.headers_mut() = headers;

        if let Some(auth) = &self.authentication {
            let (header_name, mut header_value) = auth.to_header().await?;
            header_value.set_sensitive(true);
            req.headers_mut().insert(header_name, header_value);
        }

        if let Some(body) = body {
            *req.body_mut() = Some(Body::from(body));
        }

        Ok(req)
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ApiClientError> {
        let request = self.build_request(request).await?;

        debug!(?request, "sending...");
        let response = self.client.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(TransportResponse::new(status, headers, body.to_vec()))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
        Box::pin(self.execute(request))
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, HeaderValue, Method};
    use url::Url;

    use super::*;

    fn request() -> TransportRequest {
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-client", HeaderValue::from_static("gl-rust/1"));
        TransportRequest {
            method: Method::POST,
            url: Url::parse("https://pubsub.googleapis.com/v1/projects/p/topics/t:publish")
                .expect("valid url"),
            query: vec![("alt".to_string(), "json".to_string())],
            headers,
            body: Some(br#"{"messages":[]}"#.to_vec()),
        }
    }

    #[tokio::test]
    async fn should_build_request_with_credentials() {
        let transport = ReqwestTransport::new(
            reqwest::Client::new(),
            Some(Authentication::Bearer("ya29.token".into())),
        );

        let req = transport.build_request(request()).await.expect("valid request");

        assert_eq!(req.method(), Method::POST);
        insta::assert_snapshot!(req.url(), @"https://pubsub.googleapis.com/v1/projects/p/topics/t:publish?alt=json");
        let authorization = req.headers().get("authorization").expect("credentials");
        assert_eq!(authorization, "Bearer ya29.token");
        assert!(authorization.is_sensitive());
        assert_eq!(
            req.headers().get("x-goog-api-client"),
            Some(&HeaderValue::from_static("gl-rust/1"))
        );
        assert!(req.body().is_some());
    }

    #[tokio::test]
    async fn should_build_anonymous_request() {
        let transport = ReqwestTransport::default();

        let req = transport.build_request(request()).await.expect("valid request");

        assert!(req.headers().get("authorization").is_none());
        assert!(transport.authentication().is_none());
    }

    #[tokio::test]
    async fn should_fail_before_sending_on_invalid_credentials() {
        let transport = ReqwestTransport::new(
            reqwest::Client::new(),
            Some(Authentication::google_api_key("\0invalid")),
        );

        let error = transport.send(request()).await.expect_err("invalid credentials");
        assert!(matches!(error, ApiClientError::Authentication(_)), "{error:?}");
    }
}
