use std::sync::Arc;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue, USER_AGENT};
use http::HeaderMap;
use url::Url;

use super::transport::{ReqwestTransport, Transport};
use super::{ApiClient, ApiClientError, Authentication, SecureString, StandardParams};

/// The `x-goog-api-client` header, identifying the client library.
pub const API_CLIENT_HEADER: &str = "x-goog-api-client";

/// The `x-goog-user-project` header, naming the project billed for quota.
pub const USER_PROJECT_HEADER: &str = "x-goog-user-project";

const DEFAULT_USER_AGENT: &str = concat!("gapi-core/", env!("CARGO_PKG_VERSION"));
const DEFAULT_API_CLIENT: &str = concat!("gl-rust gdcl/", env!("CARGO_PKG_VERSION"));

/// Builder for creating [`ApiClient`] instances.
///
/// The base URL is required, it is the `rootUrl` joined with the `servicePath`
/// of the Discovery document, e.g. `https://www.googleapis.com/drive/v3/`.
///
/// # Default Configuration
///
/// - **User agent**: `gapi-core/<version>`
/// - **`x-goog-api-client`**: `gl-rust gdcl/<version>`
/// - **Authentication**: None (anonymous calls)
/// - **Transport**: [`ReqwestTransport`] with a default `reqwest::Client`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use gapi_core::{ApiClient, StandardParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://www.googleapis.com/drive/v3/")
///     .with_api_key("AIzaSy...")
///     .with_quota_project("my-project")
///     .with_timeout(Duration::from_secs(30))
///     .with_standard_params(StandardParams::new().with_pretty_print(false))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    client: Option<reqwest::Client>,
    base_url: Option<String>,
    authentication: Option<Authentication>,
    user_agent: String,
    api_client: String,
    quota_project: Option<String>,
    timeout: Option<Duration>,
    standard_params: StandardParams,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::InvalidBaseUrl`] if the base URL is missing, not an absolute
    ///   `http` or `https` URL, or has a query
    /// - header errors if the user agent or quota project are not valid header values
    /// - [`ApiClientError::ReqwestError`] if the HTTP client cannot be created
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            client,
            base_url,
            authentication,
            user_agent,
            api_client,
            quota_project,
            timeout,
            standard_params,
            transport,
        } = self;

        let base_url = parse_base_url(base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_str(&user_agent)?);
        default_headers.insert(
            HeaderName::from_static(API_CLIENT_HEADER),
            HeaderValue::from_str(&api_client)?,
        );
        if let Some(project) = &quota_project {
            default_headers.insert(
                HeaderName::from_static(USER_PROJECT_HEADER),
                HeaderValue::from_str(project)?,
            );
        }

        let transport = match transport {
            Some(transport) => transport,
            None => {
                let client = match client {
                    Some(client) => client,
                    None => {
                        let mut builder = reqwest::Client::builder();
                        if let Some(timeout) = timeout {
                            builder = builder.timeout(timeout);
                        }
                        builder.build()?
                    }
                };
                Arc::new(ReqwestTransport::new(client, authentication)) as Arc<dyn Transport>
            }
        };

        Ok(ApiClient {
            transport,
            base_url,
            default_headers,
            standard_params,
        })
    }

    /// Sets the base URL of the service.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Uses a configured `reqwest::Client`.
    ///
    /// The timeout set with [`with_timeout`](Self::with_timeout) is not applied to it.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the request timeout of the default HTTP client.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the authentication attached to every request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gapi_core::{ApiClient, Authentication};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ApiClient::builder()
    ///     .with_base_url("https://www.googleapis.com/drive/v3/")
    ///     .with_authentication(Authentication::Bearer("ya29.a0...".into()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Authenticates with a static bearer token.
    #[must_use]
    pub fn with_bearer_token(self, token: impl Into<SecureString>) -> Self {
        self.with_authentication(Authentication::Bearer(token.into()))
    }

    /// Authenticates with a Google API key, sent in the `x-goog-api-key` header.
    #[must_use]
    pub fn with_api_key(self, key: impl Into<SecureString>) -> Self {
        self.with_authentication(Authentication::google_api_key(key))
    }

    /// Authenticates with OAuth2.
    ///
    /// The quota project of the credentials is used unless one is set with
    /// [`with_quota_project`](Self::with_quota_project).
    #[cfg(feature = "oauth2")]
    #[must_use]
    pub fn with_oauth2(mut self, config: super::OAuth2Config) -> Self {
        if self.quota_project.is_none() {
            self.quota_project = config.quota_project_id().map(str::to_string);
        }
        self.with_authentication(Authentication::from(config))
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the `x-goog-api-client` header.
    #[must_use]
    pub fn with_api_client_header(mut self, value: impl Into<String>) -> Self {
        self.api_client = value.into();
        self
    }

    /// Sets the project billed for quota, sent in the `x-goog-user-project` header.
    #[must_use]
    pub fn with_quota_project(mut self, project: impl Into<String>) -> Self {
        self.quota_project = Some(project.into());
        self
    }

    /// Sets the standard parameters applied to every call.
    #[must_use]
    pub fn with_standard_params(mut self, params: StandardParams) -> Self {
        self.standard_params = params;
        self
    }

    /// Uses a custom transport.
    ///
    /// The transport attaches credentials itself: the authentication, client
    /// and timeout configured on this builder are not used.
    #[must_use]
    pub fn with_transport(self, transport: impl Transport + 'static) -> Self {
        self.with_shared_transport(Arc::new(transport))
    }

    /// Uses a shared custom transport.
    ///
    /// See [`with_transport`](Self::with_transport).
    #[must_use]
    pub fn with_shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: None,
            authentication: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_client: DEFAULT_API_CLIENT.to_string(),
            quota_project: None,
            timeout: None,
            standard_params: StandardParams::default(),
            transport: None,
        }
    }
}

fn parse_base_url(base_url: Option<String>) -> Result<Url, ApiClientError> {
    let Some(base_url) = base_url else {
        return Err(ApiClientError::InvalidBaseUrl {
            url: String::new(),
            error: "a base URL is required".to_string(),
        });
    };

    let invalid = |error: &str| ApiClientError::InvalidBaseUrl {
        url: base_url.clone(),
        error: error.to_string(),
    };

    let url = Url::parse(&base_url).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("not an absolute URL with a host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(url)
}
