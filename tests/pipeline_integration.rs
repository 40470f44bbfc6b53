//! Integration tests for the end-to-end download pipeline.
//!
//! These tests drive `download_images` against a mock Figma API and a mock
//! image CDN served by the same wiremock instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use figma_images::{
    ApiError, DocumentNode, DocumentSource, DownloadRequest, DownloadTask, Fill, PipelineError,
    ProgressReporter, ProgressSnapshot, download_images, download_images_with_source,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;
use support::{FILE_KEY, api_base, mount_document, mount_image_urls, page_with_icon};

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

fn request(api: String, out: &TempDir) -> DownloadRequest {
    DownloadRequest::new("figd_test", FILE_KEY)
        .with_api_base(api)
        .with_output_dir(out.path())
}

#[tokio::test]
async fn test_page_with_icon_downloads_into_mirrored_tree() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    mount_document(&mock_server, page_with_icon()).await;
    mount_image_urls(
        &mock_server,
        json!({ "abcdef1234567890": format!("{}/cdn/abc", mock_server.uri()) }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cdn/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"\x89PNG".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = download_images(request(api_base(&mock_server), &out))
        .await
        .unwrap();

    let file = out.path().join("Page_1").join("Icon_abcdef12.png");
    assert_eq!(std::fs::read(&file).unwrap(), b"\x89PNG");

    let json = serde_json::to_value(report.snapshot).unwrap();
    assert_eq!(
        json,
        json!({
            "totalTasks": 1,
            "completed": 1,
            "successful": 1,
            "skipped": 0,
            "failed": 0,
            "percentage": 100.0
        })
    );
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_second_run_skips_everything() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    mount_document(
        &mock_server,
        json!({
            "name": "Page 1",
            "children": [
                { "name": "Hero", "fills": [{ "type": "IMAGE", "imageRef": "hero0000aaaa" }] },
                { "name": "Logo", "fills": [{ "type": "IMAGE", "imageRef": "logo0000bbbb" }] }
            ]
        }),
    )
    .await;
    mount_image_urls(
        &mock_server,
        json!({
            "hero0000aaaa": format!("{}/cdn/hero", mock_server.uri()),
            "logo0000bbbb": format!("{}/cdn/logo", mock_server.uri()),
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cdn/hero"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"jpg".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/logo"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/svg+xml")
                .set_body_bytes(b"<svg/>".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let first = download_images(request(api_base(&mock_server), &out))
        .await
        .unwrap();
    assert_eq!(first.snapshot.successful, 2);
    assert!(out.path().join("Page_1").join("Hero_hero0000.jpg").is_file());
    assert!(out.path().join("Page_1").join("Logo_logo0000.svg").is_file());

    let second = download_images(request(api_base(&mock_server), &out))
        .await
        .unwrap();
    assert_eq!(second.snapshot.total_tasks, 2);
    assert_eq!(second.snapshot.successful, 0);
    assert_eq!(second.snapshot.skipped, 2);
    assert_eq!(second.snapshot.failed, 0);
}

#[tokio::test]
async fn test_failed_image_is_counted_and_does_not_stop_others() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    mount_document(
        &mock_server,
        json!({
            "name": "Doc",
            "children": [{
                "name": "Frame",
                "fills": [
                    { "type": "IMAGE", "imageRef": "good1234" },
                    { "type": "IMAGE", "imageRef": "gone5678" },
                    { "type": "SOLID" }
                ]
            }]
        }),
    )
    .await;
    mount_image_urls(
        &mock_server,
        json!({
            "good1234": format!("{}/cdn/good", mock_server.uri()),
            "gone5678": format!("{}/cdn/gone", mock_server.uri()),
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cdn/good"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let report = download_images(request(api_base(&mock_server), &out))
        .await
        .unwrap();

    assert_eq!(report.snapshot.total_tasks, 2);
    assert_eq!(report.snapshot.successful, 1);
    assert_eq!(report.snapshot.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].task.image_ref, "gone5678");
    assert_eq!(report.failures[0].error.status(), Some(404));
    assert!(out.path().join("Doc").join("Frame_good1234.png").is_file());
    assert!(!out.path().join("Doc").join("Frame_gone5678.png").exists());
}

#[tokio::test]
async fn test_unresolved_refs_yield_empty_run() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    mount_document(&mock_server, page_with_icon()).await;
    mount_image_urls(&mock_server, json!({ "abcdef1234567890": null })).await;

    let report = download_images(request(api_base(&mock_server), &out))
        .await
        .unwrap();

    assert_eq!(report.snapshot.total_tasks, 0);
    assert_eq!(report.snapshot.completed, 0);
    assert!((report.snapshot.percentage - 100.0).abs() < f64::EPSILON);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unauthorized_api_is_fatal() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": 403,
            "err": "Invalid token"
        })))
        .mount(&mock_server)
        .await;

    let result = download_images(request(api_base(&mock_server), &out)).await;

    assert!(matches!(
        result,
        Err(PipelineError::Api(ApiError::Unauthorized { status: 403, .. }))
    ));
}

#[tokio::test]
async fn test_progress_reporter_sees_every_completion() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    let children: Vec<_> = (0..12)
        .map(|i| json!({ "name": format!("Tile {i}"), "fills": [{ "type": "IMAGE", "imageRef": format!("tile{i:04}") }] }))
        .collect();
    mount_document(&mock_server, json!({ "name": "Grid", "children": children })).await;
    let urls: serde_json::Map<_, _> = (0..12)
        .map(|i| {
            (
                format!("tile{i:04}"),
                json!(format!("{}/cdn/tile/{i}", mock_server.uri())),
            )
        })
        .collect();
    mount_image_urls(&mock_server, serde_json::Value::Object(urls)).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/cdn/tile/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"t".to_vec()))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let reporter: ProgressReporter = Arc::new(move |s: &ProgressSnapshot| {
        sink.lock().unwrap().push(*s);
    });

    let report = download_images(
        request(api_base(&mock_server), &out)
            .with_concurrency(3)
            .with_progress(reporter),
    )
    .await
    .unwrap();

    assert_eq!(report.snapshot.successful, 12);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 12);
    for s in seen.iter() {
        assert_eq!(s.completed, s.successful + s.skipped + s.failed);
        assert_eq!(s.total_tasks, 12);
    }
}

/// In-memory source for exercising the pipeline without the REST client.
struct StaticSource {
    root: DocumentNode,
    urls: HashMap<String, String>,
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch_document_tree(&self, _file_key: &str) -> Result<DocumentNode, ApiError> {
        Ok(self.root.clone())
    }

    async fn fetch_image_urls(
        &self,
        _file_key: &str,
    ) -> Result<HashMap<String, String>, ApiError> {
        Ok(self.urls.clone())
    }
}

#[tokio::test]
async fn test_custom_source_shared_ref_in_two_places() {
    let mock_server = require_mock_server!();
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/cdn/shared"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/webp")
                .set_body_bytes(b"webp".to_vec()),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let source = StaticSource {
        root: DocumentNode::new("Doc")
            .with_child(DocumentNode::new("Logo").with_fill(Fill::image("shared0000000")))
            .with_child(
                DocumentNode::new("Footer")
                    .with_child(DocumentNode::new("Logo").with_fill(Fill::image("shared0000000"))),
            ),
        urls: HashMap::from([(
            "shared0000000".to_string(),
            format!("{}/cdn/shared", mock_server.uri()),
        )]),
    };

    let report = download_images_with_source(
        &source,
        DownloadRequest::new("unused", "unused").with_output_dir(out.path()),
    )
    .await
    .unwrap();

    assert_eq!(report.snapshot.successful, 2);
    let expected = [
        DownloadTask {
            image_ref: "shared0000000".to_string(),
            url: String::new(),
            target_dir: out.path().join("Doc"),
            base_filename: "Logo_shared00".to_string(),
        },
        DownloadTask {
            image_ref: "shared0000000".to_string(),
            url: String::new(),
            target_dir: out.path().join("Doc").join("Footer"),
            base_filename: "Logo_shared00".to_string(),
        },
    ];
    for task in &expected {
        assert!(task.output_path(".webp").is_file(), "{:?}", task.output_path(".webp"));
    }
}
