use std::sync::{Arc, Mutex};

use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::json;
use url::Url;

use super::*;
use crate::client::transport::{TransportFuture, TransportRequest, TransportResponse};
use crate::client::{ApiClientError, CallParams, CallQuery, StandardParams};

#[derive(Debug, Default)]
struct RecordingTransport {
    requests: Mutex<Vec<TransportRequest>>,
}

impl RecordingTransport {
    fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().expect("not poisoned").clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
        self.requests.lock().expect("not poisoned").push(request);
        Box::pin(async {
            Ok(TransportResponse::new(
                StatusCode::OK,
                HeaderMap::new(),
                br#"{"id":"abc"}"#.to_vec(),
            ))
        })
    }
}

fn create_test_call(
    transport: &Arc<RecordingTransport>,
    method: Method,
    path: &str,
) -> Result<ApiCall, ApiClientError> {
    let base_url = Url::parse("https://www.googleapis.com/drive/v3/").expect("valid url");
    ApiCall::build(
        Arc::clone(transport) as Arc<dyn Transport>,
        base_url,
        method,
        CallPath::from(path),
        HeaderMap::new(),
        StandardParams::default(),
    )
}

#[derive(Debug)]
struct GetFile {
    file_id: Option<String>,
    fields: Option<String>,
    supports_all_drives: bool,
}

impl CallParams for GetFile {
    fn add_path_params(&self, path: CallPath) -> CallPath {
        path.add_param("fileId", &self.file_id)
    }

    fn add_query_params(&self, query: CallQuery) -> CallQuery {
        query
            .add_param("fields", &self.fields)
            .add_param("supportsAllDrives", self.supports_all_drives)
    }
}

#[test]
fn should_reject_malformed_templates() {
    let transport = Arc::new(RecordingTransport::default());

    for template in [
        "files/{fileId",
        "files/fileId}",
        "files/{{fileId}}",
        "files?q=1",
        "files/{file-id}",
        "files/{}",
        "files/{a.b}",
        "v1/{+}:publish",
    ] {
        let result = create_test_call(&transport, Method::GET, template);
        assert!(
            matches!(result, Err(ApiClientError::InvalidPath { .. })),
            "{template}: {result:?}"
        );
    }
}

#[test]
fn should_join_base_url_and_path() {
    let base_url = Url::parse("https://www.googleapis.com/drive/v3/").expect("valid url");
    let path = CallPath::from("/files/{fileId}").add_param("fileId", "a b");

    let url = ApiCall::build_url(&base_url, &path).expect("resolved");

    insta::assert_snapshot!(url, @"https://www.googleapis.com/drive/v3/files/a%20b");
}

#[test]
fn should_keep_slashes_in_reserved_expansion() {
    let base_url = Url::parse("https://pubsub.googleapis.com/v1").expect("valid url");
    let path = CallPath::from("v1/{+topic}:publish").add_param("topic", "projects/p/topics/t");

    let url = ApiCall::build_url(&base_url, &path).expect("resolved");

    insta::assert_snapshot!(url, @"https://pubsub.googleapis.com/v1/v1/projects/p/topics/t:publish");
}

#[test]
fn should_set_json_content_type_with_body() {
    let url = Url::parse("https://www.googleapis.com/drive/v3/files").expect("valid url");
    let body = CallBody::json(&json!({"name": "report.pdf"})).expect("serializable");

    let request = ApiCall::build_request(
        Method::POST,
        url,
        &CallQuery::new(),
        HeaderMap::new(),
        Some(body),
    );

    assert_eq!(
        request.headers.get("content-type"),
        Some(&HeaderValue::from_static("application/json"))
    );
    assert_eq!(request.body.as_deref(), Some(br#"{"name":"report.pdf"}"#.as_slice()));
}

#[tokio::test]
async fn should_fail_before_transport_when_path_param_is_missing() {
    let transport = Arc::new(RecordingTransport::default());
    let params = GetFile {
        file_id: None,
        fields: None,
        supports_all_drives: false,
    };

    let result = create_test_call(&transport, Method::GET, "files/{fileId}")
        .expect("valid template")
        .with_params(&params)
        .await;

    let Err(ApiClientError::PathUnresolved { path, missings }) = result else {
        panic!("expected unresolved path, got {result:?}");
    };
    assert_eq!(path, "files/{fileId}");
    assert_eq!(missings, vec!["fileId".to_string()]);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn should_fail_before_transport_when_path_param_is_a_dot_segment() {
    let transport = Arc::new(RecordingTransport::default());

    let result = create_test_call(
        &transport,
        Method::DELETE,
        "files/{fileId}/permissions/{permissionId}",
    )
    .expect("valid template")
    .with_path_param("fileId", "abc")
    .with_path_param("permissionId", "..")
    .await;

    assert!(
        matches!(result, Err(ApiClientError::InvalidPath { .. })),
        "{result:?}"
    );
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn should_send_one_request_with_bound_params() {
    let transport = Arc::new(RecordingTransport::default());
    let params = GetFile {
        file_id: Some("abc".to_string()),
        fields: None,
        supports_all_drives: true,
    };

    let result = create_test_call(&transport, Method::GET, "files/{fileId}")
        .expect("valid template")
        .with_params(&params)
        .with_standard_params(StandardParams::new().with_pretty_print(false))
        .await
        .expect("success");

    assert_eq!(result.status(), StatusCode::OK);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    insta::assert_snapshot!(requests[0].full_url(), @"https://www.googleapis.com/drive/v3/files/abc?supportsAllDrives=true&prettyPrint=false");
}

#[tokio::test]
async fn should_let_call_query_win_over_standard_params() {
    let transport = Arc::new(RecordingTransport::default());

    create_test_call(&transport, Method::GET, "files")
        .expect("valid template")
        .with_standard_params(StandardParams::new().with_fields("files(id)"))
        .with_query_param("fields", "files(id,name)")
        .await
        .expect("success");

    let requests = transport.requests();
    insta::assert_debug_snapshot!(requests[0].query, @r#"
    [
        (
            "fields",
            "files(id,name)",
        ),
    ]
    "#);
}

#[tokio::test]
async fn should_send_headers_and_json_body() {
    let transport = Arc::new(RecordingTransport::default());

    create_test_call(&transport, Method::POST, "files/{fileId}/permissions")
        .expect("valid template")
        .with_path_param("fileId", "abc")
        .with_header("x-goog-request-reason", "audit")
        .expect("valid header")
        .json(&json!({"role": "reader", "type": "anyone"}))
        .expect("serializable")
        .await
        .expect("success");

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.headers.get("x-goog-request-reason"),
        Some(&HeaderValue::from_static("audit"))
    );
    assert_eq!(
        request.headers.get("content-type"),
        Some(&HeaderValue::from_static("application/json"))
    );
    assert!(request.body.is_some());
}

#[test]
fn should_reject_invalid_header() {
    let transport = Arc::new(RecordingTransport::default());

    let result = create_test_call(&transport, Method::GET, "files")
        .expect("valid template")
        .with_header("invalid header", "value");

    assert!(matches!(result, Err(ApiClientError::InvalidHeaderName(_))));
}
