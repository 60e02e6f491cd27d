//! # gapi Core
//!
//! Runtime for Rust clients generated from Google API Discovery documents.
//!
//! Generated code describes every API method as a path template, a typed
//! parameter bag, an optional request body and a result type. This crate
//! binds the parameters, sends the request and decodes the response:
//!
//! - **[`ApiClient::perform`]** - The single generic operation used by generated code
//! - **[`ApiCall`]** - The fluent form, awaited directly thanks to `IntoFuture`
//! - **[`CallParams`]** - Typed parameter bags, usually `#[derive(CallParams)]`
//! - **[`Authentication`]** - Bearer token, API key, OAuth2 or a custom token provider
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gapi_core::{ApiClient, CallParams, NoBody};
//! use http::Method;
//! # use serde::Deserialize;
//! # #[derive(Deserialize)]
//! # struct FileList { files: Vec<serde_json::Value> }
//!
//! #[derive(CallParams)]
//! #[params(rename_all = "camelCase")]
//! struct ListFiles {
//!     #[param(query)]
//!     page_size: Option<u32>,
//!     #[param(query)]
//!     q: Option<String>,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder()
//!     .with_base_url("https://www.googleapis.com/drive/v3/")
//!     .with_api_key("AIzaSy...")
//!     .build()?;
//!
//! let params = ListFiles {
//!     page_size: Some(10),
//!     q: Some("mimeType = 'application/pdf'".to_string()),
//! };
//! let files: FileList = client
//!     .perform(Method::GET, "files", &params, None::<&NoBody>)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Path Templates
//!
//! Templates use the Discovery syntax. `{name}` is replaced by the
//! percent-encoded value, `{+name}` keeps reserved characters such as `/`:
//!
//! ```rust
//! use gapi_core::CallPath;
//!
//! let path = CallPath::from("files/{fileId}").add_param("fileId", "1a2b3c");
//! let topic = CallPath::from("v1/{+topic}:publish")
//!     .add_param("topic", "projects/my-project/topics/events");
//! ```
//!
//! A call whose template has an unbound placeholder fails with
//! [`ApiClientError::PathUnresolved`] before anything is sent.
//!
//! ## Responses
//!
//! Google APIs answer with one of three shapes:
//!
//! - an error envelope `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`,
//!   reported as [`ApiClientError::Api`],
//! - a payload wrapped in `{"data": ...}`,
//! - the bare payload.
//!
//! Methods without a typed result decode into [`NoContent`].
//!
//! ## Authentication
//!
//! ```rust,no_run
//! # #[cfg(feature = "oauth2")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use gapi_core::{ApiClient, OAuth2Config};
//!
//! // reads `GOOGLE_APPLICATION_CREDENTIALS` or the gcloud default credentials
//! let config = OAuth2Config::application_default()?
//!     .add_scope("https://www.googleapis.com/auth/drive.readonly")
//!     .build()?;
//!
//! let client = ApiClient::builder()
//!     .with_base_url("https://www.googleapis.com/drive/v3/")
//!     .with_oauth2(config)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `oauth2` (default): OAuth2 token acquisition and refresh
//! - `derive` (default): `#[derive(CallParams)]`

extern crate self as gapi_core;

mod client;

pub use self::client::{
    API_CLIENT_HEADER, ApiCall, ApiClient, ApiClientBuilder, ApiClientError, ApiError,
    ApiErrorItem, Authentication, AuthenticationError, CallBody, CallParams, CallPath, CallQuery,
    CallResult, GOOGLE_API_KEY_HEADER, NoBody, NoContent, NoParams, PageTokenParams, Paginated,
    ParamValue, SecureString, StandardParams, TokenFuture, TokenProvider, USER_PROJECT_HEADER,
};

pub use self::client::transport;
pub use self::client::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

#[cfg(feature = "oauth2")]
pub use self::client::oauth2;
#[cfg(feature = "oauth2")]
pub use self::client::{OAuth2Config, OAuth2ConfigBuilder, OAuth2Error, OAuth2Token};

#[cfg(feature = "derive")]
pub use gapi_macro::CallParams;
