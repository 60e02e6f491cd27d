use std::sync::Arc;

use http::{HeaderMap, Method};
use url::Url;

use super::transport::Transport;
use super::{CallBody, CallPath, CallQuery, StandardParams};

mod builder;
mod execution;
#[cfg(test)]
mod tests;

/// Builder for a single API call.
///
/// Obtained from [`ApiClient::call`](crate::ApiClient::call) or one of its
/// method shortcuts. Awaiting it sends exactly one request and yields a
/// [`CallResult`](crate::CallResult).
///
/// # Method Groups
///
/// ## Parameters
/// - [`with_params(params)`](Self::with_params) - Bind a typed parameter bag
/// - [`with_path_param(name, value)`](Self::with_path_param) - Bind a single path parameter
/// - [`with_query(query)`](Self::with_query) - Merge query parameters
/// - [`with_query_param(name, value)`](Self::with_query_param) - Add a single query parameter
/// - [`with_standard_params(params)`](Self::with_standard_params) - Override the client's standard parameters
///
/// ## Headers and body
/// - [`with_header(name, value)`](Self::with_header) - Add a request header
/// - [`json(data)`](Self::json) - Set the JSON request body
///
/// # Example
///
/// ```rust,no_run
/// use gapi_core::{ApiClient, CallQuery};
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct FileList { files: Vec<serde_json::Value> }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://www.googleapis.com/drive/v3/")
///     .build()?;
///
/// let files: FileList = client
///     .get("files")?
///     .with_query(CallQuery::new().add_param("pageSize", 10))
///     .await?
///     .as_json()?;
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
pub struct ApiCall {
    pub(super) transport: Arc<dyn Transport>,
    pub(super) base_url: Url,

    pub(super) method: Method,
    pub(super) path: CallPath,
    pub(super) query: CallQuery,
    pub(super) standard_params: StandardParams,
    pub(super) headers: HeaderMap,

    #[debug(ignore)]
    pub(super) body: Option<CallBody>,
}
