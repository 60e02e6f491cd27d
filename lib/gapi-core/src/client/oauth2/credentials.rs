//! Google credentials files.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::config::{OAuth2Config, OAuth2ConfigBuilder};
use super::error::OAuth2Error;
use crate::client::SecureString;

/// Environment variable pointing to the application default credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

const AUTHORIZED_USER: &str = "authorized_user";

/// The content of an `authorized_user` credentials file.
#[derive(Deserialize)]
struct AuthorizedUserCredentials {
    #[serde(rename = "type")]
    kind: String,
    client_id: String,
    client_secret: SecureString,
    refresh_token: SecureString,
    #[serde(default)]
    quota_project_id: Option<String>,
}

impl OAuth2Config {
    /// Reads Google `authorized_user` credentials.
    ///
    /// ```rust
    /// use gapi_core::OAuth2Config;
    ///
    /// let json = r#"{
    ///     "type": "authorized_user",
    ///     "client_id": "123.apps.googleusercontent.com",
    ///     "client_secret": "secret",
    ///     "refresh_token": "1//refresh"
    /// }"#;
    ///
    /// let config = OAuth2Config::from_authorized_user_json(json)?
    ///     .add_scope("https://www.googleapis.com/auth/drive.readonly")
    ///     .build()?;
    /// # Ok::<(), gapi_core::OAuth2Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails when the JSON is invalid, or describes another type of credentials.
    pub fn from_authorized_user_json(json: &str) -> Result<OAuth2ConfigBuilder, OAuth2Error> {
        parse_authorized_user("JSON", json)
    }

    /// Reads a Google `authorized_user` credentials file.
    pub fn from_authorized_user_file(
        path: impl AsRef<Path>,
    ) -> Result<OAuth2ConfigBuilder, OAuth2Error> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|err| OAuth2Error::InvalidCredentials {
            source: source.clone(),
            reason: err.to_string(),
        })?;
        parse_authorized_user(&source, &json)
    }

    /// Reads the application default credentials.
    ///
    /// Looks at the file named by `GOOGLE_APPLICATION_CREDENTIALS`, then at the
    /// file written by `gcloud auth application-default login`.
    pub fn application_default() -> Result<OAuth2ConfigBuilder, OAuth2Error> {
        let path = application_default_path().ok_or_else(|| OAuth2Error::InvalidCredentials {
            source: CREDENTIALS_ENV.to_string(),
            reason: "no application default credentials found".to_string(),
        })?;
        debug!(path = %path.display(), "reading application default credentials");
        Self::from_authorized_user_file(path)
    }
}

fn parse_authorized_user(source: &str, json: &str) -> Result<OAuth2ConfigBuilder, OAuth2Error> {
    let invalid = |reason: String| OAuth2Error::InvalidCredentials {
        source: source.to_string(),
        reason,
    };

    let credentials: AuthorizedUserCredentials =
        serde_json::from_str(json).map_err(|err| invalid(err.to_string()))?;
    if credentials.kind != AUTHORIZED_USER {
        return Err(invalid(format!(
            "unsupported credentials type '{}', expected '{AUTHORIZED_USER}'",
            credentials.kind
        )));
    }

    let AuthorizedUserCredentials {
        client_id,
        client_secret,
        refresh_token,
        quota_project_id,
        ..
    } = credentials;

    let mut builder = OAuth2Config::authorized_user(client_id, client_secret, refresh_token);
    if let Some(project_id) = quota_project_id {
        builder = builder.with_quota_project_id(project_id);
    }
    Ok(builder)
}

fn application_default_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CREDENTIALS_ENV).filter(|path| !path.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let config_dir = if cfg!(windows) {
        env::var_os("APPDATA").map(PathBuf::from)
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    }?;
    let path = config_dir
        .join("gcloud")
        .join("application_default_credentials.json");
    path.is_file().then_some(path)
}
