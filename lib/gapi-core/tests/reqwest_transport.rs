//! `ReqwestTransport` against a local axum server.

use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use gapi_core::{
    ApiClient, ApiClientError, CallParams, NoBody, NoContent, NoParams, StandardParams,
};
use http::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

fn header(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map_or(Value::Null, |value| Value::String(value.to_string()))
}

fn seen(headers: &HeaderMap) -> Value {
    json!({
        "authorization": header(headers, "authorization"),
        "apiKey": header(headers, "x-goog-api-key"),
        "userAgent": header(headers, "user-agent"),
        "apiClient": header(headers, "x-goog-api-client"),
        "userProject": header(headers, "x-goog-user-project"),
        "contentType": header(headers, "content-type"),
    })
}

async fn get_file(
    Path(file_id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    Json(json!({
        "data": {
            "id": file_id,
            "query": query,
            "headers": seen(&headers),
        }
    }))
}

async fn create_file(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "id": "created",
            "query": null,
            "headers": seen(&headers),
            "body": body,
        })),
    )
}

async fn delete_file() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn forbidden() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": {
                "code": 403,
                "message": "The user does not have sufficient permissions for this file.",
                "status": "PERMISSION_DENIED",
                "errors": [{"domain": "global", "reason": "insufficientFilePermissions"}]
            }
        })),
    )
}

async fn start_server() -> anyhow::Result<String> {
    let app = Router::new()
        .route("/drive/v3/files", post(create_file))
        .route("/drive/v3/files/{file_id}", get(get_file).delete(delete_file))
        .route("/drive/v3/forbidden", get(forbidden));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });
    info!(%addr, "test server started");

    Ok(format!("http://{addr}/drive/v3/"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Seen {
    authorization: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    api_client: Option<String>,
    user_project: Option<String>,
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Echo {
    id: String,
    query: Option<String>,
    headers: Seen,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Debug, CallParams)]
#[params(rename_all = "camelCase")]
struct GetFile {
    #[param(path)]
    file_id: String,
    #[param(query)]
    acknowledge_abuse: Option<bool>,
}

#[tokio::test]
async fn should_send_bearer_token_and_google_headers() -> anyhow::Result<()> {
    init_tracing();
    let base_url = start_server().await?;
    let client = ApiClient::builder()
        .with_base_url(base_url)
        .with_bearer_token("ya29.test-token")
        .with_quota_project("billing-project")
        .with_standard_params(StandardParams::new().with_pretty_print(false))
        .build()?;
    let params = GetFile {
        file_id: "report 2024".to_string(),
        acknowledge_abuse: Some(true),
    };

    let echo: Echo = client
        .perform(Method::GET, "files/{fileId}", &params, None::<&NoBody>)
        .await?;

    assert_eq!(echo.id, "report 2024");
    assert_eq!(
        echo.query.as_deref(),
        Some("acknowledgeAbuse=true&prettyPrint=false")
    );
    assert_eq!(
        echo.headers.authorization.as_deref(),
        Some("Bearer ya29.test-token")
    );
    assert!(
        echo.headers
            .user_agent
            .as_deref()
            .is_some_and(|agent| agent.starts_with("gapi-core/"))
    );
    assert!(
        echo.headers
            .api_client
            .as_deref()
            .is_some_and(|value| value.contains("gdcl/"))
    );
    assert_eq!(echo.headers.user_project.as_deref(), Some("billing-project"));
    assert_eq!(echo.headers.api_key, None);
    Ok(())
}

#[tokio::test]
async fn should_send_api_key() -> anyhow::Result<()> {
    let base_url = start_server().await?;
    let client = ApiClient::builder()
        .with_base_url(base_url)
        .with_api_key("AIzaSy-test")
        .build()?;

    let echo: Echo = client.get("files/abc")?.await?.as_json()?;

    assert_eq!(echo.headers.api_key.as_deref(), Some("AIzaSy-test"));
    assert_eq!(echo.headers.authorization, None);
    assert_eq!(echo.headers.user_project, None);
    Ok(())
}

#[tokio::test]
async fn should_post_json_body() -> anyhow::Result<()> {
    let base_url = start_server().await?;
    let client = ApiClient::builder().with_base_url(base_url).build()?;

    let echo: Echo = client
        .perform(
            Method::POST,
            "files",
            &NoParams,
            Some(&json!({"name": "notes.txt", "mimeType": "text/plain"})),
        )
        .await?;

    assert_eq!(echo.id, "created");
    assert_eq!(
        echo.headers.content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(
        echo.body,
        Some(json!({"name": "notes.txt", "mimeType": "text/plain"}))
    );
    Ok(())
}

#[tokio::test]
async fn should_accept_no_content() -> anyhow::Result<()> {
    let base_url = start_server().await?;
    let client = ApiClient::builder().with_base_url(base_url).build()?;

    let result: NoContent = client
        .perform(Method::DELETE, "files/abc", &NoParams, None::<&NoBody>)
        .await?;

    assert_eq!(result, NoContent);
    Ok(())
}

#[tokio::test]
async fn should_report_api_error() -> anyhow::Result<()> {
    let base_url = start_server().await?;
    let client = ApiClient::builder().with_base_url(base_url).build()?;

    let result: Result<Echo, _> = client
        .perform(Method::GET, "forbidden", &NoParams, None::<&NoBody>)
        .await;

    let Err(ApiClientError::Api(error)) = result else {
        panic!("expected API error, got {result:?}");
    };
    assert_eq!(error.code, 403);
    assert_eq!(error.status.as_deref(), Some("PERMISSION_DENIED"));
    assert_eq!(error.reason(), Some("insufficientFilePermissions"));
    Ok(())
}

#[tokio::test]
async fn should_report_unreachable_server() -> anyhow::Result<()> {
    let client = ApiClient::builder()
        .with_base_url("http://127.0.0.1:9/drive/v3/")
        .build()?;

    let result: Result<Echo, _> = client
        .perform(Method::GET, "files/abc", &NoParams, None::<&NoBody>)
        .await;

    assert!(
        matches!(result, Err(ApiClientError::ReqwestError(_))),
        "{result:?}"
    );
    Ok(())
}
