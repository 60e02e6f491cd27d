use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use gapi_core::transport::TransportFuture;
use gapi_core::{
    ApiClient, CallParams, CallPath, CallQuery, NoBody, NoContent, Transport, TransportRequest,
    TransportResponse,
};
use http::{HeaderMap, Method, StatusCode};

#[derive(Debug, CallParams)]
#[params(rename_all = "camelCase")]
struct GetRevision {
    #[param(path)]
    file_id: String,
    #[param(path)]
    revision_id: String,
    #[param(query)]
    acknowledge_abuse: Option<bool>,
    #[param(query)]
    fields: Option<String>,
    #[param(query)]
    labels: Vec<String>,
}

#[derive(Debug, CallParams)]
struct Publish {
    #[param(path)]
    topic: String,
}

/// Answers every request with an empty JSON object.
#[derive(Debug)]
struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, _request: TransportRequest) -> TransportFuture<'_> {
        Box::pin(async {
            Ok(TransportResponse::new(
                StatusCode::OK,
                HeaderMap::new(),
                b"{}".to_vec(),
            ))
        })
    }
}

fn revision() -> GetRevision {
    GetRevision {
        file_id: "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms".to_string(),
        revision_id: "head".to_string(),
        acknowledge_abuse: Some(false),
        fields: Some("id,modifiedTime,size".to_string()),
        labels: vec!["draft".to_string(), "shared drive".to_string()],
    }
}

fn benchmark_binding(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding");
    let params = revision();

    group.bench_function("path_params", |b| {
        b.iter(|| {
            let path = black_box(&params)
                .add_path_params(CallPath::from("files/{fileId}/revisions/{revisionId}"));
            black_box(path);
        });
    });

    group.bench_function("query_params", |b| {
        b.iter(|| {
            let query = black_box(&params).add_query_params(CallQuery::new());
            black_box(query.to_query_string());
        });
    });

    group.finish();
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };
    let Ok(client) = ApiClient::builder()
        .with_base_url("https://www.googleapis.com/drive/v3/")
        .with_transport(NullTransport)
        .build()
    else {
        return;
    };

    let params = revision();
    group.bench_function("segment", |b| {
        b.iter(|| {
            let result = runtime.block_on(client.perform::<_, NoBody, NoContent>(
                Method::GET,
                "files/{fileId}/revisions/{revisionId}",
                black_box(&params),
                None,
            ));
            black_box(result.is_ok());
        });
    });

    let publish = Publish {
        topic: "projects/my-project/topics/events".to_string(),
    };
    group.bench_function("reserved", |b| {
        b.iter(|| {
            let result = runtime.block_on(client.perform::<_, NoBody, NoContent>(
                Method::POST,
                "v1/{+topic}:publish",
                black_box(&publish),
                None,
            ));
            black_box(result.is_ok());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_binding, benchmark_dispatch);
criterion_main!(benches);
