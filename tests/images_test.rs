//! Image API integration tests.

mod common;

use common::{fake_png, TestServer};
use reqwest::multipart;
use serde_json::{json, Value};

#[tokio::test]
async fn test_upload_list_delete_roundtrip() {
    let server = TestServer::start().await;

    let response = server
        .upload("/api/images", "image", "cat.png", fake_png(256))
        .await;
    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json, json!({ "filename": "cat.png" }));

    assert_eq!(server.list("/api/images").await, vec!["cat.png"]);

    let response = server.delete("/api/images/cat.png").await;
    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json, json!({ "filename": "cat.png" }));

    assert!(server.list("/api/images").await.is_empty());
    assert!(!server.images_dir().join("cat.png").exists());
}

#[tokio::test]
async fn test_upload_writes_bytes_verbatim() {
    let server = TestServer::start().await;
    let data = fake_png(4096);

    let response = server
        .upload("/api/images", "image", "photo.jpeg", data.clone())
        .await;
    assert_eq!(response.status(), 200);

    let stored = std::fs::read(server.images_dir().join("photo.jpeg")).unwrap();
    assert_eq!(stored, data);
}

#[tokio::test]
async fn test_list_filters_by_extension_case_insensitively() {
    let server = TestServer::start().await;
    let dir = server.images_dir();

    for file in ["a.jpg", "B.JPEG", "c.Png", "d.gif", "notes.txt", "clip.mp4", "noext"] {
        std::fs::write(dir.join(file), b"x").unwrap();
    }

    assert_eq!(
        server.list("/api/images").await,
        vec!["B.JPEG", "a.jpg", "c.Png", "d.gif"]
    );
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let server = TestServer::start().await;
    let client = server.client();

    let form = multipart::Form::new().text("description", "no file here");
    let response = client
        .post(server.url("/api/images"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json, json!({ "error": "Image file is required" }));

    assert_eq!(std::fs::read_dir(server.images_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_in_wrong_field() {
    let server = TestServer::start().await;

    let response = server
        .upload("/api/images", "file", "cat.png", fake_png(64))
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(std::fs::read_dir(server.images_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_text_value_in_file_field_is_not_a_file() {
    let server = TestServer::start().await;
    let client = server.client();

    let form = multipart::Form::new().text("image", "cat.png");
    let response = client
        .post(server.url("/api/images"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_upload_overwrites_silently() {
    let server = TestServer::start().await;

    let first = server
        .upload("/api/images", "image", "cat.png", b"first".to_vec())
        .await;
    assert_eq!(first.status(), 200);

    let second = server
        .upload("/api/images", "image", "cat.png", b"second".to_vec())
        .await;
    assert_eq!(second.status(), 200);

    let stored = std::fs::read(server.images_dir().join("cat.png")).unwrap();
    assert_eq!(stored, b"second");
    assert_eq!(server.list("/api/images").await, vec!["cat.png"]);
}

#[tokio::test]
async fn test_upload_does_not_check_extension() {
    let server = TestServer::start().await;

    let response = server
        .upload("/api/images", "image", "notes.txt", b"hello".to_vec())
        .await;
    assert_eq!(response.status(), 200);

    assert!(server.images_dir().join("notes.txt").exists());
    assert!(server.list("/api/images").await.is_empty());
}

#[tokio::test]
async fn test_delete_missing_file() {
    let server = TestServer::start().await;

    let response = server.delete("/api/images/ghost.png").await;

    assert_eq!(response.status(), 500);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json, json!({ "error": "Failed to delete the image" }));
}

#[tokio::test]
async fn test_list_missing_directory() {
    let server = TestServer::start().await;
    std::fs::remove_dir_all(server.images_dir()).unwrap();

    let response = server
        .client()
        .get(server.url("/api/images"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 500);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json, json!({ "error": "Failed to read the images directory" }));
}

#[tokio::test]
async fn test_upload_rejects_path_traversal() {
    let server = TestServer::start().await;

    let response = server
        .upload("/api/images", "image", "../escape.png", fake_png(64))
        .await;

    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("Invalid filename"));
    assert!(!server.data_dir.path().join("escape.png").exists());
}

#[tokio::test]
async fn test_delete_rejects_path_traversal() {
    let server = TestServer::start().await;
    let outside = server.data_dir.path().join("keep.png");
    std::fs::write(&outside, b"keep").unwrap();

    let response = server.delete("/api/images/..%2Fkeep.png").await;

    assert_eq!(response.status(), 400);
    assert!(outside.exists());
}
