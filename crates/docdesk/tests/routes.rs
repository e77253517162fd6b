use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use docdesk::{
    config::DeskConfig,
    extraction::tabular::read_workbook,
    server::{build_router, state::AppState},
    storage::{LocalDocumentStore, UploadPolicy},
    DocumentStore, InMemoryDocumentStore,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(documents: Vec<(&str, Vec<u8>)>) -> Router {
    let store = Arc::new(InMemoryDocumentStore::from_documents(documents));
    build_router(AppState::with_store(DeskConfig::default(), store))
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body must be collected")
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = body_bytes(response).await;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    serde_json::from_slice(&bytes).unwrap_or_else(|err| panic!("invalid json: {err}; body={text}"))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builder must not fail")
}

fn merge_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/merge")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builder must not fail")
}

fn people_documents() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("base.csv", "이름,홍길동\n나이,30\n".as_bytes().to_vec()),
        (
            "people.csv",
            "이름,나이,도시\n홍길동,30,서울\n김철수,25,부산\n".as_bytes().to_vec(),
        ),
    ]
}

#[tokio::test]
async fn health_returns_ok() {
    let app = app_with(Vec::new());
    let response = app.oneshot(get("/health")).await.expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn search_returns_matched_first_in_listing_order() {
    let app = app_with(vec![
        ("budget.csv", "item,cost\n".as_bytes().to_vec()),
        ("report_2023.csv", "sales data".as_bytes().to_vec()),
        ("notes.csv", "quarterly report summary".as_bytes().to_vec()),
    ]);

    let response = app
        .oneshot(get("/api/search?keyword=report"))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {"filename": "report_2023.csv", "matched": true},
            {"filename": "notes.csv", "matched": true},
            {"filename": "budget.csv", "matched": false},
        ])
    );
}

#[tokio::test]
async fn search_blank_keyword_is_empty_list() {
    let app = app_with(vec![("report.csv", b"x".to_vec())]);
    let response = app
        .oneshot(get("/api/search?keyword=%20%20"))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn merge_returns_xlsx_attachment() {
    let app = app_with(people_documents());
    let response = app
        .oneshot(merge_request(json!({"base": "base.csv", "candidate": "people.csv"})))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"merged.xlsx\""
    );

    let bytes = body_bytes(response).await;
    let sheets = read_workbook(&bytes).expect("artifact must be a readable workbook");
    assert_eq!(sheets.len(), 1);
    assert_eq!(
        sheets[0].1,
        vec![
            vec!["이름".to_string(), "나이".to_string()],
            vec!["홍길동".to_string(), "30".to_string()],
            vec!["김철수".to_string(), "25".to_string()],
        ]
    );
}

#[tokio::test]
async fn merge_csv_format() {
    let app = app_with(people_documents());
    let response = app
        .oneshot(merge_request(
            json!({"base": "base.csv", "candidate": "people.csv", "format": "csv"}),
        ))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        "\u{feff}이름,나이\n홍길동,30\n김철수,25\n"
    );
}

#[tokio::test]
async fn merge_missing_document_returns_404() {
    let app = app_with(people_documents());
    let response = app
        .oneshot(merge_request(json!({"base": "base.csv", "candidate": "ghost.csv"})))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value = body_json(response).await;
    assert_eq!(value["error"], json!("not_found"));
    assert!(value["message"].as_str().unwrap().contains("ghost.csv"));
}

#[tokio::test]
async fn merge_malformed_input_returns_422() {
    let mut documents = people_documents();
    documents.push(("empty.csv", Vec::new()));
    let app = app_with(documents);

    let response = app
        .oneshot(merge_request(json!({"base": "base.csv", "candidate": "empty.csv"})))
        .await
        .expect("handler should respond");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"], json!("malformed_input"));
}

#[tokio::test]
async fn upload_list_download_delete() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut config = DeskConfig::default();
    config.storage.upload_dir = dir.path().join("uploads");
    let store = LocalDocumentStore::new(
        &config.storage.upload_dir,
        UploadPolicy::new(&config.storage.allowed_extensions),
    )
    .expect("store must be created");
    let store: Arc<dyn DocumentStore> = Arc::new(store);
    let app = build_router(AppState::with_store(config, store.clone()));

    let boundary = "docdesk-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"sales report.csv\"\r\nContent-Type: text/csv\r\n\r\nregion,amount\r\nnorth,10\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"macro.exe\"\r\nContent-Type: application/octet-stream\r\n\r\nMZ\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("request builder must not fail");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("handler should respond");
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["files"], json!(["sales_report.csv"]));
    assert_eq!(value["rejected"][0]["filename"], json!("macro.exe"));

    let response = app
        .clone()
        .oneshot(get("/api/documents"))
        .await
        .expect("handler should respond");
    let value = body_json(response).await;
    assert_eq!(value["total_count"], json!(1));
    assert_eq!(value["documents"][0]["filename"], json!("sales_report.csv"));
    assert_eq!(value["documents"][0]["file_type"], json!("csv"));

    let response = app
        .clone()
        .oneshot(get("/api/documents/sales_report.csv"))
        .await
        .expect("handler should respond");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(body_bytes(response).await, b"region,amount\r\nnorth,10");

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/documents/sales_report.csv")
        .body(Body::empty())
        .expect("request builder must not fail");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("handler should respond");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!store.exists("sales_report.csv").unwrap());

    let response = app
        .oneshot(get("/api/documents/sales_report.csv"))
        .await
        .expect("handler should respond");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_over_body_limit_returns_413() {
    let mut config = DeskConfig::default();
    config.server.max_upload_size = 64;
    let store = Arc::new(InMemoryDocumentStore::new());
    let app = build_router(AppState::with_store(config, store.clone()));

    let boundary = "docdesk-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"big.csv\"\r\nContent-Type: text/csv\r\n\r\n{data}\r\n--{b}--\r\n",
        b = boundary,
        data = "x,".repeat(512)
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("request builder must not fail");

    let response = app.oneshot(request).await.expect("handler should respond");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"], json!("upload_error"));
    assert!(store.list_documents().unwrap().is_empty());
}
