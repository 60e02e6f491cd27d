//! OAuth2 token provider for acquiring and refreshing tokens.

use std::time::Duration;

use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken, Scope,
    TokenResponse, TokenUrl,
};
use tracing::debug;

use super::config::{OAuth2Config, OAuth2GrantType};
use super::error::OAuth2Error;
use super::token::OAuth2Token;
use crate::client::auth::{AuthenticationError, TokenFuture, TokenProvider};
use crate::client::SecureString;

type TokenClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

impl OAuth2Config {
    /// Acquires a new access token using the configured grant type.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint cannot be reached or rejects the
    /// request, or if a pre-acquired token has expired.
    pub async fn acquire_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        match self.grant_type {
            OAuth2GrantType::ClientCredentials => self.acquire_client_credentials_token().await,
            OAuth2GrantType::RefreshToken => self.refresh_access_token().await,
            OAuth2GrantType::PreAcquired => self.get_pre_acquired_token().await,
        }
    }

    async fn acquire_client_credentials_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        let client = self.create_oauth2_client()?;
        let http_client = Self::create_http_client()?;

        let response = client
            .exchange_client_credentials()
            .add_scopes(self.oauth2_scopes())
            .request_async(&http_client)
            .await
            .map_err(|err| OAuth2Error::TokenAcquisitionFailed {
                reason: err.to_string(),
            })?;

        Ok(self.store(&response, None).await)
    }

    async fn refresh_access_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        // a rotated refresh token wins over the configured one
        let refresh_token = match self.token_cache.refresh_token().await {
            Some(token) => token,
            None => self
                .refresh_token
                .as_ref()
                .map(|token| token.as_str().to_string())
                .ok_or(OAuth2Error::TokenExpired)?,
        };

        let client = self.create_oauth2_client()?;
        let http_client = Self::create_http_client()?;

        let response = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.clone()))
            .add_scopes(self.oauth2_scopes())
            .request_async(&http_client)
            .await
            .map_err(|err| OAuth2Error::TokenRefreshFailed {
                reason: err.to_string(),
            })?;

        Ok(self.store(&response, Some(refresh_token)).await)
    }

    async fn get_pre_acquired_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        self.get_token().await.ok_or(OAuth2Error::TokenExpired)
    }

    async fn store(
        &self,
        response: &BasicTokenResponse,
        previous_refresh_token: Option<String>,
    ) -> OAuth2Token {
        let mut token =
            Self::convert_token_response(response.access_token().secret(), response.expires_in());
        let refresh_token = response
            .refresh_token()
            .map(|token| token.secret().clone())
            .or(previous_refresh_token);
        if let Some(refresh_token) = refresh_token {
            token = token.with_refresh_token(refresh_token);
        }

        debug!(
            grant_type = ?self.grant_type,
            expires_in = ?response.expires_in(),
            "OAuth2 token acquired"
        );
        self.set_token(token.clone()).await;
        token
    }

    fn convert_token_response(access_token: &str, expires_in: Option<Duration>) -> OAuth2Token {
        match expires_in {
            Some(duration) => OAuth2Token::with_expiry(access_token, duration),
            None => OAuth2Token::new(access_token),
        }
    }

    /// Gets a valid token, acquiring a new one if necessary.
    ///
    /// This is the main entry point for getting an access token. Concurrent
    /// callers share a single acquisition.
    pub async fn get_valid_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        if let Some(token) = self.usable_cached_token().await {
            return Ok(token);
        }

        let _guard = self.token_cache.lock_refresh().await;
        // another caller may have acquired a token while we waited
        if let Some(token) = self.usable_cached_token().await {
            return Ok(token);
        }

        self.acquire_token().await
    }

    async fn usable_cached_token(&self) -> Option<OAuth2Token> {
        let token = self.get_token().await?;
        let fresh = !self.auto_refresh
            || self.grant_type == OAuth2GrantType::PreAcquired
            || !self.needs_token().await;
        fresh.then_some(token)
    }

    /// Creates an oauth2 client for token requests.
    fn create_oauth2_client(&self) -> Result<TokenClient, OAuth2Error> {
        let client_id = self
            .client_id
            .clone()
            .ok_or_else(|| OAuth2Error::ConfigurationError {
                reason: "missing client ID".to_string(),
            })?;
        let token_url = TokenUrl::from_url(self.token_url.clone());

        let mut client = BasicClient::new(ClientId::new(client_id))
            .set_token_uri(token_url)
            .set_auth_type(AuthType::RequestBody);
        if let Some(secret) = &self.client_secret {
            client = client.set_client_secret(ClientSecret::new(secret.as_str().to_string()));
        }

        Ok(client)
    }

    /// Creates the HTTP client used to reach the token endpoint.
    ///
    /// Redirects are disabled for SSRF prevention.
    fn create_http_client() -> Result<oauth2::reqwest::Client, OAuth2Error> {
        oauth2::reqwest::ClientBuilder::new()
            .redirect(oauth2::reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| OAuth2Error::ConfigurationError {
                reason: format!("cannot create HTTP client: {err}"),
            })
    }

    fn oauth2_scopes(&self) -> Vec<Scope> {
        self.scopes.iter().cloned().map(Scope::new).collect()
    }
}

impl TokenProvider for OAuth2Config {
    fn access_token(&self) -> TokenFuture<'_> {
        Box::pin(async move {
            let token = self
                .get_valid_token()
                .await
                .map_err(|err| AuthenticationError::OAuth2Error {
                    message: err.to_string(),
                })?;
            Ok(SecureString::from(token.access_token()))
        })
    }
}
