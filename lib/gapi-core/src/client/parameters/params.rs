use serde::{Deserialize, Serialize};

use super::{CallPath, CallQuery};

/// A typed parameter bag for an API method.
///
/// Implementors bind their path fields with [`CallPath::add_param`] and their
/// query fields with [`CallQuery::add_param`]. Both methods default to binding
/// nothing, so a bag with only query fields implements a single method.
///
/// Generated clients usually derive it:
///
/// ```rust
/// # #[cfg(feature = "derive")]
/// # {
/// use gapi_core::{CallParams, CallPath, CallQuery};
///
/// #[derive(CallParams)]
/// #[params(rename_all = "camelCase")]
/// struct GetFileParams {
///     #[param(path)]
///     file_id: String,
///     #[param(query)]
///     supports_all_drives: Option<bool>,
/// }
///
/// let params = GetFileParams {
///     file_id: "abc".to_string(),
///     supports_all_drives: Some(true),
/// };
/// let query = params.add_query_params(CallQuery::new());
/// assert_eq!(query.to_query_string(), "supportsAllDrives=true");
/// # }
/// ```
pub trait CallParams {
    /// Binds the path fields of this bag.
    fn add_path_params(&self, path: CallPath) -> CallPath {
        path
    }

    /// Binds the query fields of this bag.
    fn add_query_params(&self, query: CallQuery) -> CallQuery {
        query
    }
}

impl<T> CallParams for &T
where
    T: CallParams + ?Sized,
{
    fn add_path_params(&self, path: CallPath) -> CallPath {
        (**self).add_path_params(path)
    }

    fn add_query_params(&self, query: CallQuery) -> CallQuery {
        (**self).add_query_params(query)
    }
}

impl<T> CallParams for Option<T>
where
    T: CallParams,
{
    fn add_path_params(&self, path: CallPath) -> CallPath {
        match self {
            Some(params) => params.add_path_params(path),
            None => path,
        }
    }

    fn add_query_params(&self, query: CallQuery) -> CallQuery {
        match self {
            Some(params) => params.add_query_params(query),
            None => query,
        }
    }
}

/// The empty parameter bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoParams;

impl CallParams for NoParams {}

/// Query parameters every Google API method accepts.
///
/// Set them on the client with
/// [`ApiClientBuilder::with_standard_params`](crate::ApiClientBuilder::with_standard_params)
/// to apply them to every call, or on a single call with
/// [`ApiCall::with_standard_params`](crate::ApiCall::with_standard_params).
/// Parameters bound by the method's own bag take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardParams {
    /// Selector specifying a subset of fields to include in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    /// Quota attribution for server-side applications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_user: Option<String>,
    /// Returns the response with indentations and line breaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty_print: Option<bool>,
    /// Data format for the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// V1 error format.
    #[serde(
        default,
        rename = "$.xgafv",
        skip_serializing_if = "Option::is_none"
    )]
    pub xgafv: Option<String>,
    /// API key sent as a query parameter.
    ///
    /// Prefer [`Authentication::google_api_key`](crate::Authentication::google_api_key),
    /// which sends the key in a header and keeps it out of logged URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl StandardParams {
    /// Creates empty standard parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the response to a field selector, e.g. `files(id,name),nextPageToken`.
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Sets the quota user.
    #[must_use]
    pub fn with_quota_user(mut self, quota_user: impl Into<String>) -> Self {
        self.quota_user = Some(quota_user.into());
        self
    }

    /// Sets `prettyPrint`.
    #[must_use]
    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = Some(pretty_print);
        self
    }

    /// Sets the response format.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Sets the error format (`1` or `2`).
    #[must_use]
    pub fn with_xgafv(mut self, xgafv: impl Into<String>) -> Self {
        self.xgafv = Some(xgafv.into());
        self
    }

    /// Sets the API key query parameter.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl CallParams for StandardParams {
    fn add_query_params(&self, query: CallQuery) -> CallQuery {
        query
            .add_param("fields", &self.fields)
            .add_param("quotaUser", &self.quota_user)
            .add_param("prettyPrint", self.pretty_print)
            .add_param("alt", &self.alt)
            .add_param("$.xgafv", &self.xgafv)
            .add_param("key", &self.key)
    }
}
