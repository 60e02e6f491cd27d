//! Lists the PDF files of a Google Drive.
//!
//! Uses the application default credentials, see
//! `gcloud auth application-default login`, or an access token:
//!
//! ```sh
//! GOOGLE_ACCESS_TOKEN=$(gcloud auth print-access-token) cargo run --example drive_files
//! ```

use gapi_core::{ApiClient, CallParams, NoBody, PageTokenParams, Paginated, StandardParams};
use http::Method;
use serde::Deserialize;
use tracing::info;

const DRIVE_READONLY: &str = "https://www.googleapis.com/auth/drive.metadata.readonly";

#[derive(Debug, Default, CallParams)]
#[params(rename_all = "camelCase")]
struct ListFiles {
    #[param(query)]
    q: Option<String>,
    #[param(query)]
    page_size: Option<u32>,
    #[param(query)]
    page_token: Option<String>,
    #[param(query)]
    order_by: Option<String>,
}

impl PageTokenParams for ListFiles {
    fn set_page_token(&mut self, token: Option<String>) {
        self.page_token = token;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<File>,
}

impl Paginated for FileList {
    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct File {
    id: String,
    name: String,
    modified_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct About {
    user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    display_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let builder = ApiClient::builder()
        .with_base_url("https://www.googleapis.com/drive/v3/")
        .with_standard_params(StandardParams::new().with_pretty_print(false));
    let builder = match std::env::var("GOOGLE_ACCESS_TOKEN") {
        Ok(token) => builder.with_bearer_token(token),
        Err(_) => {
            let config = gapi_core::OAuth2Config::application_default()?
                .add_scope(DRIVE_READONLY)
                .build()?;
            builder.with_oauth2(config)
        }
    };
    let client = builder.build()?;

    // `about` requires an explicit field selection
    let fields = StandardParams::new().with_fields("user(displayName)");
    let about: About = client
        .perform(Method::GET, "about", &fields, None::<&NoBody>)
        .await?;
    info!(user = %about.user.display_name, "connected");

    let params = ListFiles {
        q: Some("mimeType = 'application/pdf' and trashed = false".to_string()),
        page_size: Some(100),
        order_by: Some("modifiedTime desc".to_string()),
        ..ListFiles::default()
    };
    let pages: Vec<FileList> = client
        .perform_all_pages(Method::GET, "files", params, Some(5))
        .await?;

    for file in pages.iter().flat_map(|page| &page.files) {
        info!(
            id = %file.id,
            name = %file.name,
            modified = file.modified_time.as_deref().unwrap_or("-"),
            "file"
        );
    }

    Ok(())
}
