//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FILE_KEY: &str = "KEY";

/// Mounts `GET /v1/files/KEY` returning `document` as the root node.
pub async fn mount_document(server: &MockServer, document: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/files/{FILE_KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Test file",
            "document": document,
        })))
        .mount(server)
        .await;
}

/// Mounts `GET /v1/files/KEY/images` returning `images` as the ref map.
pub async fn mount_image_urls(server: &MockServer, images: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/files/{FILE_KEY}/images")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "status": 200,
            "meta": { "images": images },
        })))
        .mount(server)
        .await;
}

/// API base pointing at the mock server.
#[must_use]
pub fn api_base(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

/// `Page 1` root with a single `Icon ` child filled with `abcdef1234567890`.
#[must_use]
pub fn page_with_icon() -> Value {
    json!({
        "name": "Page 1",
        "children": [{
            "name": "Icon ",
            "fills": [{ "type": "IMAGE", "imageRef": "abcdef1234567890" }]
        }]
    })
}
