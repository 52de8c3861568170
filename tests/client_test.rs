//! HTTPクライアントの結合テスト
//!
//! axumでOCR/RAGのスタブサーバを立て、実際のmultipart/JSON送信を検証する。

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use medicine_ocr::client::HttpTransport;
use medicine_ocr::processor::{process_batch, process_image};
use medicine_ocr::scanner::ImageInfo;
use medicine_ocr_common::Endpoints;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

#[derive(Debug, Clone)]
struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

struct Stub {
    ocr: (StatusCode, String),
    rag: (StatusCode, String),
    uploads: Mutex<Vec<Upload>>,
    rag_bodies: Mutex<Vec<Value>>,
}

impl Stub {
    fn new(ocr: (StatusCode, Value), rag: (StatusCode, Value)) -> Arc<Self> {
        Arc::new(Self {
            ocr: (ocr.0, ocr.1.to_string()),
            rag: (rag.0, rag.1.to_string()),
            uploads: Mutex::new(Vec::new()),
            rag_bodies: Mutex::new(Vec::new()),
        })
    }

    fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }

    fn rag_bodies(&self) -> Vec<Value> {
        self.rag_bodies.lock().unwrap().clone()
    }
}

async fn ocr_handler(State(stub): State<Arc<Stub>>, mut multipart: Multipart) -> (StatusCode, String) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        stub.uploads.lock().unwrap().push(Upload {
            field: field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    stub.ocr.clone()
}

async fn rag_handler(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> (StatusCode, String) {
    stub.rag_bodies.lock().unwrap().push(body);
    stub.rag.clone()
}

async fn spawn_server(stub: Arc<Stub>) -> String {
    let app = Router::new()
        .route("/ocr", post(ocr_handler))
        .route("/rag", post(rag_handler))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn write_image(dir: &std::path::Path) -> ImageInfo {
    let path = dir.join("label.png");
    std::fs::write(&path, PNG_BYTES).unwrap();
    ImageInfo {
        path,
        file_name: "label.png".to_string(),
    }
}

#[tokio::test]
async fn test_ocr_then_rag() {
    let stub = Stub::new(
        (StatusCode::OK, json!({ "ocr_text": "PARACETAMOL 500 MG" })),
        (
            StatusCode::OK,
            json!({ "llm_text": "# Paracetamol\n\nลดไข้", "med_name": "PARACETAMOL" }),
        ),
    );
    let base = spawn_server(stub.clone()).await;
    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    let transport = HttpTransport::new().unwrap();
    let report = process_image(&transport, &Endpoints::from_base(&base), &image, false)
        .await
        .unwrap();

    assert_eq!(report.file_name, "label.png");
    assert_eq!(report.extracted_status, "ready");
    assert_eq!(report.extracted_text, "PARACETAMOL 500 MG");
    assert_eq!(report.contextual_status, "ready");
    assert_eq!(report.contextual_text, "# Paracetamol\n\nลดไข้");
    assert_eq!(report.medicine.as_deref(), Some("PARACETAMOL"));

    let uploads = stub.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(uploads[0].file_name.as_deref(), Some("label.png"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(uploads[0].bytes, PNG_BYTES);

    assert_eq!(stub.rag_bodies(), vec![json!({ "ocr_text": "PARACETAMOL 500 MG" })]);
}

#[tokio::test]
async fn test_empty_ocr_text_skips_rag() {
    let stub = Stub::new(
        (StatusCode::OK, json!({ "ocr_text": "" })),
        (StatusCode::OK, json!({ "llm_text": "unused" })),
    );
    let base = spawn_server(stub.clone()).await;
    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    let transport = HttpTransport::new().unwrap();
    let report = process_image(&transport, &Endpoints::from_base(&base), &image, false)
        .await
        .unwrap();

    assert_eq!(report.extracted_text, "No text found");
    assert_eq!(report.contextual_status, "idle");
    assert!(stub.rag_bodies().is_empty());
}

#[tokio::test]
async fn test_ocr_server_error() {
    let stub = Stub::new(
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "typhoon down" })),
        (StatusCode::OK, json!({ "llm_text": "unused" })),
    );
    let base = spawn_server(stub.clone()).await;
    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    let transport = HttpTransport::new().unwrap();
    let report = process_image(&transport, &Endpoints::from_base(&base), &image, false)
        .await
        .unwrap();

    assert_eq!(report.extracted_status, "failed");
    assert_eq!(report.extracted_text, "Error uploading file");
    assert_eq!(report.contextual_status, "idle");
    assert!(stub.rag_bodies().is_empty());
}

#[tokio::test]
async fn test_rag_server_error_keeps_ocr_text() {
    let stub = Stub::new(
        (StatusCode::OK, json!({ "ocr_text": "abc" })),
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "ollama down" })),
    );
    let base = spawn_server(stub.clone()).await;
    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    let transport = HttpTransport::new().unwrap();
    let report = process_image(&transport, &Endpoints::from_base(&base), &image, false)
        .await
        .unwrap();

    assert_eq!(report.extracted_text, "abc");
    assert_eq!(report.contextual_status, "failed");
    assert_eq!(report.contextual_text, "Error fetching RAG");
    assert_eq!(stub.rag_bodies(), vec![json!({ "ocr_text": "abc" })]);
}

#[tokio::test]
async fn test_connection_refused_sets_both_errors() {
    // 空きポートを確保してすぐ閉じる
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    let transport = HttpTransport::new().unwrap();
    let endpoints = Endpoints::from_base(&format!("http://{}", addr));
    let report = process_image(&transport, &endpoints, &image, false).await.unwrap();

    assert_eq!(report.extracted_text, "Error uploading file");
    assert_eq!(report.contextual_text, "Error uploading file");
}

#[tokio::test]
async fn test_missing_image_file() {
    let transport = HttpTransport::new().unwrap();
    let image = ImageInfo {
        path: "/nonexistent/label.png".into(),
        file_name: "label.png".to_string(),
    };
    let result = process_image(&transport, &Endpoints::default(), &image, false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_batch_continues_after_unreadable_image() {
    let stub = Stub::new(
        (StatusCode::OK, json!({ "ocr_text": "abc" })),
        (StatusCode::OK, json!({ "llm_text": "context" })),
    );
    let base = spawn_server(stub.clone()).await;
    let dir = tempdir().unwrap();
    let images = vec![
        ImageInfo {
            path: dir.path().join("missing.png"),
            file_name: "missing.png".to_string(),
        },
        write_image(dir.path()),
    ];

    let transport = HttpTransport::new().unwrap();
    let mut seen = Vec::new();
    let reports = process_batch(&transport, &Endpoints::from_base(&base), &images, false, |r| {
        seen.push(r.file_name.clone())
    })
    .await;

    assert_eq!(seen, vec!["missing.png", "label.png"]);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].extracted_status, "failed");
    assert!(reports[0].error.is_some());
    assert_eq!(reports[1].extracted_text, "abc");
    assert_eq!(reports[1].contextual_text, "context");
    assert_eq!(stub.uploads().len(), 1);
}

#[tokio::test]
async fn test_ocr_error_text_is_reported_as_failure() {
    let stub = Stub::new(
        (StatusCode::OK, json!({ "ocr_text": "Error: 401, invalid api key" })),
        (StatusCode::OK, json!({ "error": "No medicine detected from OCR text." })),
    );
    let base = spawn_server(stub.clone()).await;
    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    let transport = HttpTransport::new().unwrap();
    let report = process_image(&transport, &Endpoints::from_base(&base), &image, false)
        .await
        .unwrap();

    assert_eq!(report.extracted_status, "failed");
    assert_eq!(report.extracted_text, "Error: 401, invalid api key");
}
