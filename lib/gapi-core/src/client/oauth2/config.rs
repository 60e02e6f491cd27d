//! OAuth2 configuration and builder.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::error::OAuth2Error;
use super::token::{OAuth2Token, TokenCache};
use crate::client::SecureString;

/// Google's OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default threshold for token refresh (60 seconds before expiry).
const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

/// OAuth2 grant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuth2GrantType {
    /// Client Credentials grant (machine-to-machine).
    ClientCredentials,
    /// Refresh Token grant, used by Google "authorized user" credentials.
    RefreshToken,
    /// Pre-acquired token (externally obtained).
    PreAcquired,
}

/// OAuth2 authentication configuration.
///
/// Use [`OAuth2ConfigBuilder`] to create instances, usually through one of
/// [`OAuth2Config::client_credentials`], [`OAuth2Config::authorized_user`],
/// [`OAuth2Config::pre_acquired`] or [`OAuth2Config::application_default`].
#[derive(Clone)]
pub struct OAuth2Config {
    pub(crate) client_id: Option<String>,
    pub(crate) client_secret: Option<SecureString>,
    pub(crate) refresh_token: Option<SecureString>,
    pub(crate) token_url: Url,
    pub(crate) scopes: Vec<String>,
    pub(crate) grant_type: OAuth2GrantType,
    pub(crate) auto_refresh: bool,
    pub(crate) refresh_threshold: Duration,
    pub(crate) quota_project_id: Option<String>,
    pub(crate) token_cache: TokenCache,
}

impl OAuth2Config {
    /// Creates a builder for the client credentials flow.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> OAuth2ConfigBuilder {
        OAuth2ConfigBuilder::new(OAuth2GrantType::ClientCredentials)
            .with_client_id(client_id)
            .with_client_secret(client_secret)
    }

    /// Creates a builder for the refresh token flow.
    ///
    /// This is the flow of Google "authorized user" credentials, as written by
    /// `gcloud auth application-default login`.
    pub fn authorized_user(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        refresh_token: impl Into<SecureString>,
    ) -> OAuth2ConfigBuilder {
        OAuth2ConfigBuilder::new(OAuth2GrantType::RefreshToken)
            .with_client_id(client_id)
            .with_client_secret(client_secret)
            .with_refresh_token(refresh_token)
    }

    /// Creates a builder for a pre-acquired access token.
    ///
    /// The token is used until it expires, it is never renewed.
    pub fn pre_acquired(access_token: impl Into<String>) -> OAuth2ConfigBuilder {
        OAuth2ConfigBuilder::new(OAuth2GrantType::PreAcquired)
            .with_pre_acquired_token(OAuth2Token::new(access_token))
    }

    /// Returns the grant type.
    pub fn grant_type(&self) -> OAuth2GrantType {
        self.grant_type
    }

    /// Returns the token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Returns the requested scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the project billed for quota, read from the credentials file.
    pub fn quota_project_id(&self) -> Option<&str> {
        self.quota_project_id.as_deref()
    }

    /// Checks if a new token should be acquired.
    pub async fn needs_token(&self) -> bool {
        self.token_cache
            .should_refresh(self.refresh_threshold)
            .await
    }

    /// Gets the cached token if available and not expired.
    pub async fn get_token(&self) -> Option<OAuth2Token> {
        self.token_cache.get().await
    }

    /// Stores a token in the cache.
    pub async fn set_token(&self, token: OAuth2Token) {
        self.token_cache.set(token).await;
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_url", &self.token_url.as_str())
            .field("scopes", &self.scopes)
            .field("grant_type", &self.grant_type)
            .field("auto_refresh", &self.auto_refresh)
            .field("refresh_threshold", &self.refresh_threshold)
            .field("quota_project_id", &self.quota_project_id)
            .finish()
    }
}

/// Builder for OAuth2 configuration.
#[derive(Clone)]
pub struct OAuth2ConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecureString>,
    refresh_token: Option<SecureString>,
    token_url: String,
    scopes: Vec<String>,
    grant_type: OAuth2GrantType,
    auto_refresh: bool,
    refresh_threshold: Duration,
    quota_project_id: Option<String>,
    pre_acquired_token: Option<OAuth2Token>,
}

impl OAuth2ConfigBuilder {
    /// Creates a builder for the given grant, targeting Google's token endpoint.
    pub fn new(grant_type: OAuth2GrantType) -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            scopes: Vec::new(),
            grant_type,
            auto_refresh: true,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            quota_project_id: None,
            pre_acquired_token: None,
        }
    }

    /// Sets the client ID.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<SecureString>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<SecureString>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Overrides the token endpoint, validated by [`build`](Self::build).
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Adds a scope, e.g. `https://www.googleapis.com/auth/drive.readonly`.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds multiple scopes.
    #[must_use]
    pub fn add_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Sets whether tokens are renewed before they expire.
    ///
    /// When disabled, a token is renewed only once it has expired.
    #[must_use]
    pub fn with_auto_refresh(mut self, auto_refresh: bool) -> Self {
        self.auto_refresh = auto_refresh;
        self
    }

    /// Sets the refresh threshold (how long before expiry to refresh).
    #[must_use]
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    /// Sets the project billed for quota.
    #[must_use]
    pub fn with_quota_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.quota_project_id = Some(project_id.into());
        self
    }

    /// Sets a pre-acquired token.
    #[must_use]
    pub fn with_pre_acquired_token(mut self, token: OAuth2Token) -> Self {
        self.pre_acquired_token = Some(token);
        self
    }

    /// Builds the OAuth2 configuration.
    ///
    /// # Errors
    ///
    /// Fails when the token endpoint is not a valid URL, or when the grant
    /// misses a client ID, a client secret or a refresh token it needs.
    pub fn build(self) -> Result<OAuth2Config, OAuth2Error> {
        let token_url =
            Url::parse(&self.token_url).map_err(|err| OAuth2Error::InvalidTokenEndpoint {
                url: self.token_url.clone(),
                reason: err.to_string(),
            })?;

        let missing = |what: &str| OAuth2Error::ConfigurationError {
            reason: format!("{:?} grant requires a {what}", self.grant_type),
        };
        match self.grant_type {
            OAuth2GrantType::ClientCredentials | OAuth2GrantType::RefreshToken => {
                if self.client_id.is_none() {
                    return Err(missing("client ID"));
                }
                if self.client_secret.is_none() {
                    return Err(missing("client secret"));
                }
                if self.grant_type == OAuth2GrantType::RefreshToken
                    && self.refresh_token.is_none()
                {
                    return Err(missing("refresh token"));
                }
            }
            OAuth2GrantType::PreAcquired => {
                if self.pre_acquired_token.is_none() {
                    return Err(missing("access token"));
                }
            }
        }

        let token_cache = match self.pre_acquired_token {
            Some(token) => TokenCache::with_token(token),
            None => TokenCache::new(),
        };

        Ok(OAuth2Config {
            client_id: self.client_id,
            client_secret: self.client_secret,
            refresh_token: self.refresh_token,
            token_url,
            scopes: self.scopes,
            grant_type: self.grant_type,
            auto_refresh: self.auto_refresh,
            refresh_threshold: self.refresh_threshold,
            quota_project_id: self.quota_project_id,
            token_cache,
        })
    }
}

impl fmt::Debug for OAuth2ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2ConfigBuilder")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .field("grant_type", &self.grant_type)
            .finish_non_exhaustive()
    }
}

/// Wraps OAuth2Config in an Arc for sharing across async tasks.
#[derive(Debug, Clone)]
pub struct SharedOAuth2Config(pub(crate) Arc<OAuth2Config>);

impl SharedOAuth2Config {
    /// Creates a new shared config.
    pub fn new(config: OAuth2Config) -> Self {
        Self(Arc::new(config))
    }

    /// Returns a reference to the inner config.
    pub fn inner(&self) -> &OAuth2Config {
        &self.0
    }
}

impl From<OAuth2Config> for SharedOAuth2Config {
    fn from(config: OAuth2Config) -> Self {
        Self::new(config)
    }
}
