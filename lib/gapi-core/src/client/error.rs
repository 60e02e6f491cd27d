use std::fmt::{self, Debug};

use serde::Deserialize;
use serde_json::Value;

use super::AuthenticationError;

/// Errors that can occur when using the [`ApiClient`](crate::ApiClient).
///
/// The variants cover every outcome of a call that is not a decoded value:
/// transport failures, errors reported by the Google API, missing path
/// parameters, malformed and empty responses.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    ///
    /// Occurs when header values contain invalid characters.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// JSON serialization error of a request body.
    JsonValueError(serde_json::Error),

    /// Credentials could not be attached to the request.
    Authentication(AuthenticationError),

    /// The Google API answered with an error.
    ///
    /// Carries the content of the `{"error": {...}}` envelope, or the HTTP
    /// status and body when a non-success response has no envelope.
    Api(ApiError),

    /// Invalid base URL configuration.
    #[display("Invalid base URL '{url}': {error}")]
    #[from(skip)]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Description of why the base URL is invalid.
        error: String,
    },

    /// JSON response deserialization failure.
    ///
    /// Occurs when the response body is not JSON, or does not match the expected type.
    #[display("Failed to deserialize JSON at '{path}' (field '{field}'): {error}\n{body}")]
    #[from(skip)]
    JsonError {
        /// The request path where the error occurred.
        path: String,
        /// The path of the failing field in the JSON document, `.` for the root.
        field: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// The server answered without a body where one was expected.
    #[display("Invalid response from server: status {status_code} without body")]
    #[from(skip)]
    InvalidResponse {
        /// The HTTP status code received.
        status_code: u16,
    },

    /// Path template contains unresolved parameters.
    ///
    /// Occurs before any network I/O when path parameters are absent.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that couldn't be resolved.
        path: String,
        /// List of missing parameter names.
        missings: Vec<String>,
    },

    /// Malformed path template.
    #[display("Invalid path template '{path}': {reason}")]
    #[from(skip)]
    InvalidPath {
        /// The rejected template.
        path: String,
        /// Description of the problem.
        reason: String,
    },

    /// Failure reported by a custom [`Transport`](crate::Transport).
    #[display("Transport error: {message}")]
    #[from(skip)]
    Transport {
        /// Description of the failure.
        message: String,
    },
}

impl ApiClientError {
    /// Returns the API error if the server reported one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

/// An error reported by a Google API.
///
/// Google APIs answer failures with an envelope:
///
/// ```json
/// {
///   "error": {
///     "code": 404,
///     "message": "File not found: abc.",
///     "status": "NOT_FOUND",
///     "errors": [{"domain": "global", "reason": "notFound", "message": "File not found: abc."}]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiError {
    /// The error code, the HTTP status when the envelope omits it.
    pub code: u16,
    /// The canonical status, e.g. `PERMISSION_DENIED`.
    pub status: Option<String>,
    /// The developer-facing message.
    pub message: String,
    /// The legacy `errors` items.
    pub errors: Vec<ApiErrorItem>,
    /// The typed `details` items, kept as raw JSON.
    pub details: Vec<Value>,
}

/// An item of the legacy `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiErrorItem {
    /// The error domain, e.g. `global` or `usageLimits`.
    #[serde(default)]
    pub domain: Option<String>,
    /// The error reason, e.g. `notFound`.
    #[serde(default)]
    pub reason: Option<String>,
    /// The item message.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
    #[serde(default)]
    details: Vec<Value>,
}

impl ApiError {
    /// Reads the value of the `error` field of an envelope.
    ///
    /// Accepts the Google object form and the OAuth form where `error` is a
    /// string and the message is in `error_description`.
    pub(in crate::client) fn from_envelope(http_status: u16, envelope: &Value) -> Self {
        let Some(error) = envelope.get("error") else {
            return Self::from_status(http_status, &envelope.to_string());
        };

        if let Value::String(status) = error {
            let message = envelope
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or(status)
                .to_string();
            return Self {
                code: http_status,
                status: Some(status.clone()),
                message,
                ..Self::default()
            };
        }

        match ErrorBody::deserialize(error) {
            Ok(body) => Self {
                code: body.code.unwrap_or(http_status),
                status: body.status,
                message: body.message.unwrap_or_default(),
                errors: body.errors,
                details: body.details,
            },
            Err(_) => Self::from_status(http_status, &error.to_string()),
        }
    }

    /// Builds an error for a non-success response without envelope.
    pub(in crate::client) fn from_status(http_status: u16, body: &str) -> Self {
        Self {
            code: http_status,
            message: truncate(body, MAX_MESSAGE_LEN),
            ..Self::default()
        }
    }

    /// Returns the first legacy reason, e.g. `rateLimitExceeded`.
    pub fn reason(&self) -> Option<&str> {
        self.errors.iter().find_map(|item| item.reason.as_deref())
    }
}

const MAX_MESSAGE_LEN: usize = 512;

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", body.get(..end).unwrap_or_default())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}", self.code)?;
        if let Some(status) = &self.status {
            write!(f, " ({status})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ApiError {}
