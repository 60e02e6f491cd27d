//! OAuth2-specific error types.

use std::fmt;

/// Errors that can occur during OAuth2 authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuth2Error {
    /// Token endpoint URL is invalid.
    InvalidTokenEndpoint {
        /// The invalid URL that was provided.
        url: String,
        /// Description of why the URL is invalid.
        reason: String,
    },

    /// Token acquisition failed.
    TokenAcquisitionFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Token has expired and cannot be renewed.
    TokenExpired,

    /// Token refresh failed, e.g. the refresh token was revoked.
    TokenRefreshFailed {
        /// Description of the failure.
        reason: String,
    },

    /// A credentials file could not be read or parsed.
    InvalidCredentials {
        /// Where the credentials come from.
        source: String,
        /// Description of what was invalid.
        reason: String,
    },

    /// Configuration error.
    ConfigurationError {
        /// Description of the configuration issue.
        reason: String,
    },
}

impl std::error::Error for OAuth2Error {}

impl fmt::Display for OAuth2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTokenEndpoint { url, reason } => {
                write!(f, "Invalid token endpoint URL '{url}': {reason}")
            }
            Self::TokenAcquisitionFailed { reason } => {
                write!(f, "Token acquisition failed: {reason}")
            }
            Self::TokenExpired => {
                write!(f, "OAuth2 token has expired and cannot be renewed")
            }
            Self::TokenRefreshFailed { reason } => {
                write!(f, "Token refresh failed: {reason}")
            }
            Self::InvalidCredentials { source, reason } => {
                write!(f, "Invalid credentials from {source}: {reason}")
            }
            Self::ConfigurationError { reason } => {
                write!(f, "OAuth2 configuration error: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_invalid_token_endpoint() {
        let error = OAuth2Error::InvalidTokenEndpoint {
            url: "not-a-url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid token endpoint URL 'not-a-url': relative URL without a base"
        );
    }

    #[test]
    fn should_display_token_expired() {
        assert_eq!(
            OAuth2Error::TokenExpired.to_string(),
            "OAuth2 token has expired and cannot be renewed"
        );
    }

    #[test]
    fn should_display_invalid_credentials() {
        let error = OAuth2Error::InvalidCredentials {
            source: "/home/me/adc.json".to_string(),
            reason: "missing field `refresh_token`".to_string(),
        };
        insta::assert_snapshot!(error, @"Invalid credentials from /home/me/adc.json: missing field `refresh_token`");
    }
}
