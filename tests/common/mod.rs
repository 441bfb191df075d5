//! Common test utilities and helpers.

#![allow(dead_code)]

use media_asset_server::{
    config::{Config, LoggingConfig, ServerConfig, StorageConfig},
    create_router, AppState,
};
use reqwest::multipart;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const TEST_ORIGIN: &str = "http://localhost:4200";

/// Test server instance
pub struct TestServer {
    pub base_url: String,
    pub data_dir: TempDir,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a test server on a random port with default settings
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a test server after adjusting the test configuration
    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = create_test_config(&data_dir);
        configure(&mut config);

        let state = AppState::new(config)
            .await
            .expect("Failed to create app state");
        let app = create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let address = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Start server in background
        tokio::spawn(async move {
            tokio::select! {
                _ = axum::serve(listener, app) => {}
                _ = shutdown_rx => {}
            }
        });

        Self {
            base_url: format!("http://{}", address),
            data_dir,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get HTTP client
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap()
    }

    /// Get full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.path().join("images")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.data_dir.path().join("videos")
    }

    /// Upload `data` as file `filename` in form field `field`
    pub async fn upload(
        &self,
        api_path: &str,
        field: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> reqwest::Response {
        let part = multipart::Part::bytes(data).file_name(filename.to_string());
        let form = multipart::Form::new()
            .percent_encode_noop()
            .part(field.to_string(), part);

        self.client()
            .post(self.url(api_path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send upload")
    }

    /// List an API collection, returning the filenames sorted
    pub async fn list(&self, api_path: &str) -> Vec<String> {
        let response = self
            .client()
            .get(self.url(api_path))
            .send()
            .await
            .expect("Failed to send list request");
        assert_eq!(response.status(), 200);

        let mut names: Vec<String> = response.json().await.expect("Failed to parse JSON");
        names.sort();
        names
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client()
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send delete")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Create test configuration rooted in a temp directory
fn create_test_config(data_dir: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origin: TEST_ORIGIN.to_string(),
            max_upload_size: 10 * 1024 * 1024,
            cache_max_age: 3600,
        },
        storage: StorageConfig {
            images_dir: data_dir.path().join("images"),
            videos_dir: data_dir.path().join("videos"),
            create_dirs: true,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
    }
}

/// Create test file contents that look like a PNG
pub fn fake_png(len: usize) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.resize(len.max(data.len()), 0xAB);
    data
}
