use std::borrow::Cow;

use http::{HeaderMap, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};

use super::envelope;
use crate::client::ApiClientError;

/// Result type for calls that expect no typed payload.
///
/// Decodes from any JSON value, from `null`, and from an empty `204 No Content`
/// response. An error envelope is still reported as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoContent;

impl<'de> Deserialize<'de> for NoContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self)
    }
}

/// The response of an API call, before decoding.
///
/// Obtained by awaiting an [`ApiCall`](crate::ApiCall). Decode it with
/// [`as_json`](Self::as_json) or check it with [`as_empty`](Self::as_empty).
///
/// # Example
///
/// ```rust,no_run
/// use gapi_core::ApiClient;
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct About { kind: String }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://www.googleapis.com/drive/v3/")
///     .build()?;
///
/// let about: About = client
///     .get("about")?
///     .with_query_param("fields", "kind")
///     .await?
///     .as_json()?;
///
/// client.delete("files/{fileId}")?
///     .with_path_param("fileId", "abc")
///     .await?
///     .as_empty()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CallResult {
    path: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl CallResult {
    pub(in crate::client) fn new(
        path: String,
        status: StatusCode,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            path,
            status,
            headers,
            body,
        }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body, `None` when the response has no body.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Decodes the response payload.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Api`] for an error envelope or a non-success status
    /// - [`ApiClientError::JsonError`] when the body does not match `T`
    /// - [`ApiClientError::InvalidResponse`] when there is no body
    pub fn as_json<T>(&self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        envelope::decode(&self.path, self.status, self.body())
    }

    /// Decodes the response payload, `None` for `404 Not Found` and `204 No Content`.
    pub fn as_optional_json<T>(&self) -> Result<Option<T>, ApiClientError>
    where
        T: DeserializeOwned,
    {
        if self.status == StatusCode::NOT_FOUND || self.status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        self.as_json().map(Some)
    }

    /// Checks the response is not an error, ignoring any payload.
    pub fn as_empty(&self) -> Result<(), ApiClientError> {
        envelope::check(&self.path, self.status, self.body())
    }

    /// Returns the body as text, after checking the response is not an error.
    ///
    /// Invalid UTF-8 sequences are replaced.
    pub fn as_text(&self) -> Result<Cow<'_, str>, ApiClientError> {
        self.as_empty()?;
        let bytes = self.body().unwrap_or_default();
        Ok(String::from_utf8_lossy(bytes))
    }
}
