use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::HeaderValue;
use reqwest::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "oauth2")]
use super::oauth2::SharedOAuth2Config;

/// Header used by Google APIs for API keys.
pub const GOOGLE_API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors that can occur during authentication processing.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// Bearer token contains invalid characters for HTTP headers.
    #[display("Bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// API key header name is invalid.
    #[display("Invalid API key header name '{header_name}': {message}")]
    InvalidHeaderName {
        /// The invalid header name that was provided.
        header_name: String,
        /// Description of why the header name is invalid.
        message: String,
    },

    /// API key value contains invalid characters for HTTP headers.
    #[display("API key contains invalid characters: {message}")]
    InvalidApiKey {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// OAuth2 error.
    #[cfg(feature = "oauth2")]
    #[display("OAuth2 error: {message}")]
    OAuth2Error {
        /// Description of the OAuth2 error.
        message: String,
    },

    /// A [`TokenProvider`] failed to supply a token.
    #[display("Token provider error: {message}")]
    TokenProvider {
        /// Description of the failure.
        message: String,
    },
}

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the SecureString and returns the inner String.
    ///
    /// # Security Note
    /// The caller becomes responsible for the secure handling of the returned String.
    pub fn into_string(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    /// Checks if the secure string equals the given string slice.
    pub fn equals_str(&self, other: &str) -> bool {
        self.0 == other
    }

    /// Masks sensitive data for display/logging purposes.
    fn mask_sensitive(value: &str) -> String {
        let chars = value.chars().collect::<Vec<_>>();
        if chars.len() <= 8 {
            return "***".to_string();
        }
        let head = chars.iter().take(4).collect::<String>();
        let tail = chars.iter().skip(chars.len() - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Future returned by [`TokenProvider::access_token`].
pub type TokenFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SecureString, AuthenticationError>> + Send + 'a>>;

/// A source of OAuth2 access tokens.
///
/// Implement it to plug an external credential source (a metadata server, a
/// workload identity library, `gcloud auth print-access-token`, ...) into
/// [`Authentication::Provider`]. The provider owns caching and renewal.
///
/// ```rust
/// use gapi_core::{Authentication, SecureString, TokenFuture, TokenProvider};
///
/// #[derive(Debug)]
/// struct EnvToken;
///
/// impl TokenProvider for EnvToken {
///     fn access_token(&self) -> TokenFuture<'_> {
///         Box::pin(async {
///             let token = std::env::var("ACCESS_TOKEN").unwrap_or_default();
///             Ok(SecureString::from(token))
///         })
///     }
/// }
///
/// let auth = Authentication::provider(EnvToken);
/// ```
pub trait TokenProvider: fmt::Debug + Send + Sync {
    /// Returns a valid access token.
    fn access_token(&self) -> TokenFuture<'_>;
}

/// Authentication configuration for API requests.
///
/// # Security Features
///
/// - **Memory Protection**: Sensitive data is automatically cleared from memory when dropped
/// - **Display Masking**: Credentials are never displayed in full for logging safety
/// - **Debug Safety**: Authentication data is redacted in debug output
///
/// # Examples
///
/// ```rust
/// use gapi_core::Authentication;
///
/// // Static OAuth2 access token
/// let auth = Authentication::Bearer("ya29.a0Af...".into());
///
/// // Google API key, sent in the `x-goog-api-key` header
/// let auth = Authentication::google_api_key("AIzaSy...");
/// ```
#[derive(Clone)]
pub enum Authentication {
    /// Bearer token authentication (RFC 6750).
    /// Adds `Authorization: Bearer <token>` header.
    Bearer(SecureString),

    /// API key authentication with custom header.
    /// Adds `<header_name>: <key>` header.
    ApiKey {
        /// The header name for the API key.
        header_name: String,
        /// The API key value.
        key: SecureString,
    },

    /// OAuth2 authentication.
    ///
    /// Tokens are acquired on first use, cached, and renewed before expiry.
    #[cfg(feature = "oauth2")]
    OAuth2(SharedOAuth2Config),

    /// Bearer token from an external provider, asked before every request.
    Provider(Arc<dyn TokenProvider>),
}

impl Authentication {
    /// API key authentication with Google's `x-goog-api-key` header.
    pub fn google_api_key(key: impl Into<SecureString>) -> Self {
        Self::ApiKey {
            header_name: GOOGLE_API_KEY_HEADER.to_string(),
            key: key.into(),
        }
    }

    /// Bearer authentication with tokens from a [`TokenProvider`].
    pub fn provider(provider: impl TokenProvider + 'static) -> Self {
        Self::Provider(Arc::new(provider))
    }

    /// Converts the authentication into an HTTP header.
    ///
    /// OAuth2 tokens are acquired or renewed when needed, so this may reach the
    /// token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if no token can be obtained, or if the
    /// credentials contain characters that are invalid in HTTP headers.
    pub async fn to_header(&self) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
        match self {
            Self::Bearer(token) => bearer_header(token),

            Self::ApiKey { header_name, key } => {
                let header = HeaderName::from_bytes(header_name.as_bytes()).map_err(|err| {
                    AuthenticationError::InvalidHeaderName {
                        header_name: header_name.clone(),
                        message: err.to_string(),
                    }
                })?;
                let value = HeaderValue::from_str(key.as_str()).map_err(|err| {
                    AuthenticationError::InvalidApiKey {
                        message: err.to_string(),
                    }
                })?;
                Ok((header, value))
            }

            #[cfg(feature = "oauth2")]
            Self::OAuth2(config) => {
                let token = config.inner().access_token().await?;
                bearer_header(&token)
            }

            Self::Provider(provider) => {
                let token = provider.access_token().await?;
                bearer_header(&token)
            }
        }
    }
}

fn bearer_header(token: &SecureString) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
    let header_value = format!("Bearer {}", token.as_str());
    let value = HeaderValue::from_str(&header_value).map_err(|err| {
        AuthenticationError::InvalidBearerToken {
            message: err.to_string(),
        }
    })?;
    Ok((AUTHORIZATION, value))
}

#[cfg(feature = "oauth2")]
impl From<super::oauth2::OAuth2Config> for Authentication {
    fn from(config: super::oauth2::OAuth2Config) -> Self {
        Self::OAuth2(config.into())
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", &"[REDACTED]")
                .finish(),
            #[cfg(feature = "oauth2")]
            Self::OAuth2(config) => f.debug_tuple("OAuth2").field(config).finish(),
            Self::Provider(provider) => f.debug_tuple("Provider").field(provider).finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
            Self::ApiKey { header_name, key } => write!(f, "ApiKey ({header_name}: {key})"),
            #[cfg(feature = "oauth2")]
            Self::OAuth2(config) => {
                write!(f, "OAuth2 ({:?})", config.inner().grant_type())
            }
            Self::Provider(_) => write!(f, "Provider"),
        }
    }
}
