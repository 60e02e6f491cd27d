use headers::ContentType;
use serde::Serialize;

use crate::client::ApiClientError;

/// The JSON body of an API call.
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(in crate::client) content_type: ContentType,
    #[debug(ignore)]
    pub(in crate::client) data: Vec<u8>,
}

impl CallBody {
    /// Creates a JSON body from a serializable type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gapi_core::CallBody;
    /// # use serde::Serialize;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// #[derive(Serialize)]
    /// struct Permission {
    ///     role: String,
    ///     r#type: String,
    /// }
    ///
    /// let body = CallBody::json(&Permission {
    ///     role: "reader".to_string(),
    ///     r#type: "anyone".to_string(),
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn json<T>(t: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let content_type = ContentType::json();
        let data = serde_json::to_vec(t)?;

        let result = Self { content_type, data };
        Ok(result)
    }

    /// Returns the serialized bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }
}

/// Marker for calls that send no request body.
///
/// Used as the body type of [`ApiClient::perform`](crate::ApiClient::perform):
/// `None::<&NoBody>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoBody;
