use http::header::{HeaderName, HeaderValue};
use serde::Serialize;

use super::ApiCall;
use crate::client::{
    ApiClientError, CallBody, CallParams, CallQuery, ParamValue, StandardParams,
};

impl ApiCall {
    /// Binds a typed parameter bag.
    ///
    /// Path fields fill the placeholders of the path template, query fields are
    /// added to the query string. Absent values are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gapi_core::{ApiClient, CallParams, CallPath, CallQuery};
    /// struct GetFile {
    ///     file_id: String,
    ///     fields: Option<String>,
    /// }
    ///
    /// impl CallParams for GetFile {
    ///     fn add_path_params(&self, path: CallPath) -> CallPath {
    ///         path.add_param("fileId", &self.file_id)
    ///     }
    ///
    ///     fn add_query_params(&self, query: CallQuery) -> CallQuery {
    ///         query.add_param("fields", &self.fields)
    ///     }
    /// }
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ApiClient::builder()
    ///     .with_base_url("https://www.googleapis.com/drive/v3/")
    ///     .build()?;
    /// let params = GetFile { file_id: "abc".to_string(), fields: None };
    /// let call = client.get("files/{fileId}")?.with_params(&params);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_params<P>(mut self, params: &P) -> Self
    where
        P: CallParams + ?Sized,
    {
        self.path = params.add_path_params(self.path);
        self.query = params.add_query_params(self.query);
        self
    }

    /// Binds a single path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl ParamValue) -> Self {
        self.path = self.path.add_param(name, value);
        self
    }

    /// Merges query parameters, the given values win.
    #[must_use]
    pub fn with_query(mut self, query: CallQuery) -> Self {
        self.query = self.query.merge(query);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl ParamValue) -> Self {
        self.query = self.query.add_param(name, value);
        self
    }

    /// Overrides the standard parameters configured on the client.
    #[must_use]
    pub fn with_standard_params(mut self, params: StandardParams) -> Self {
        self.standard_params = params;
        self
    }

    /// Adds a request header.
    ///
    /// # Errors
    ///
    /// Fails if the name or value is not a valid HTTP header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ApiClientError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sets the JSON request body.
    ///
    /// # Errors
    ///
    /// Fails if the value cannot be serialized to JSON.
    pub fn json<T>(self, data: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let body = CallBody::json(data)?;
        Ok(self.with_body(body))
    }

    /// Sets a prepared request body.
    #[must_use]
    pub fn with_body(mut self, body: CallBody) -> Self {
        self.body = Some(body);
        self
    }
}
