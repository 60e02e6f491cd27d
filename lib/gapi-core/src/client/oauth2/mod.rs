//! OAuth2 authentication support for Google APIs.
//!
//! Token acquisition is delegated to the `oauth2` crate. Tokens are cached and
//! renewed shortly before they expire.
//!
//! # Feature Flag
//!
//! This module is only available when the `oauth2` feature is enabled (default).
//!
//! # Supported Flows
//!
//! - **Authorized user**: a refresh token, as in the file written by
//!   `gcloud auth application-default login`
//! - **Client Credentials**: machine-to-machine authentication
//! - **Pre-Acquired Token**: tokens obtained externally (e.g. `gcloud auth print-access-token`)
//!
//! # Example
//!
//! ```rust,no_run
//! use gapi_core::{ApiClient, OAuth2Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let oauth2 = OAuth2Config::application_default()?
//!     .add_scope("https://www.googleapis.com/auth/drive.readonly")
//!     .build()?;
//!
//! let client = ApiClient::builder()
//!     .with_base_url("https://www.googleapis.com/drive/v3/")
//!     .with_oauth2(oauth2)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod credentials;
mod error;
mod provider;
mod token;

pub use self::config::{
    GOOGLE_TOKEN_URL, OAuth2Config, OAuth2ConfigBuilder, OAuth2GrantType, SharedOAuth2Config,
};
pub use self::credentials::CREDENTIALS_ENV;
pub use self::error::OAuth2Error;
pub use self::token::{OAuth2Token, TokenCache};
