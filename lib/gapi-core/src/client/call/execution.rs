use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use headers::HeaderMapExt;
use http::{HeaderMap, Method};
use tracing::debug;
use url::Url;

use super::ApiCall;
use crate::client::parameters::{PathResolved, is_placeholder};
use crate::client::transport::{Transport, TransportRequest};
use crate::client::{
    ApiClientError, CallBody, CallParams, CallPath, CallQuery, CallResult, StandardParams,
};

impl ApiCall {
    pub(in crate::client) fn build(
        transport: Arc<dyn Transport>,
        base_url: Url,
        method: Method,
        path: CallPath,
        headers: HeaderMap,
        standard_params: StandardParams,
    ) -> Result<Self, ApiClientError> {
        check_template(path.template())?;

        let result = Self {
            transport,
            base_url,
            method,
            path,
            query: CallQuery::default(),
            standard_params,
            headers,
            body: None,
        };
        Ok(result)
    }

    /// Resolves the request and hands it to the transport.
    ///
    /// A missing path parameter fails before the transport is called.
    async fn exchange(self) -> Result<CallResult, ApiClientError> {
        let Self {
            transport,
            base_url,
            method,
            path,
            query,
            standard_params,
            headers,
            body,
        } = self;

        let url = Self::build_url(&base_url, &path)?;
        let query = query.merge_missing(&standard_params.add_query_params(CallQuery::new()));
        let request = Self::build_request(method, url, &query, headers, body);

        debug!(?request, "dispatching...");
        let response = transport.send(request).await?;
        debug!(status = %response.status, "...dispatched");

        Ok(CallResult::new(
            path.path,
            response.status,
            response.headers,
            response.body,
        ))
    }

    pub(super) fn build_url(base_url: &Url, path: &CallPath) -> Result<Url, ApiClientError> {
        let path_resolved = PathResolved::try_from(path)?;
        let url = format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            path_resolved.path.trim_start_matches('/')
        );
        let url = url.parse::<Url>()?;
        Ok(url)
    }

    pub(super) fn build_request(
        method: Method,
        url: Url,
        query: &CallQuery,
        mut headers: HeaderMap,
        body: Option<CallBody>,
    ) -> TransportRequest {
        let body = body.map(|body| {
            headers.typed_insert(body.content_type);
            body.data
        });

        TransportRequest {
            method,
            url,
            query: query.pairs(),
            headers,
            body,
        }
    }
}

fn check_template(path: &str) -> Result<(), ApiClientError> {
    let mut open = None;
    for (index, ch) in path.char_indices() {
        match ch {
            '{' if open.is_some() => return Err(invalid_path(path, "nested '{'")),
            '{' => open = Some(index),
            '}' => {
                let Some(start) = open.take() else {
                    return Err(invalid_path(path, "unexpected '}'"));
                };
                let token = &path[start..=index];
                if !is_placeholder(token) {
                    return Err(invalid_path(
                        path,
                        &format!("'{token}' is not a valid placeholder"),
                    ));
                }
            }
            '?' | '#' => return Err(invalid_path(path, "query and fragment are not allowed")),
            _ => {}
        }
    }
    if open.is_some() {
        return Err(invalid_path(path, "unclosed '{'"));
    }
    Ok(())
}

fn invalid_path(path: &str, reason: &str) -> ApiClientError {
    ApiClientError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Implement IntoFuture for ApiCall to enable direct .await syntax
///
/// ```rust,no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let client = gapi_core::ApiClient::builder()
/// #     .with_base_url("https://www.googleapis.com/drive/v3/")
/// #     .build()?;
/// let response = client.get("about")?.await?;
/// # Ok(())
/// # }
/// ```
impl IntoFuture for ApiCall {
    type Output = Result<CallResult, ApiClientError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exchange())
    }
}
