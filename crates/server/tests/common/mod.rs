//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the
//! `lyricsense-server` integration tests. `TestApp` spawns the real router on
//! a random port with the Gemini endpoint pointed at an `httpmock::MockServer`.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use httpmock::{Method, Mock, MockServer};
use lyricsense_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const TEST_API_KEY: &str = "test-api-key";
pub const GEMINI_PATH: &str = "/v1/models/gemini-test:generateContent";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with a config file pointing at the mock Gemini endpoint.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
provider:
  provider: "gemini"
  api_url: "{}"
  api_key: "{}"
  model_name: "gemini-test"
analysis:
  min_lyrics_chars: 50
  max_prompt_chars: 1000
"#,
            mock_server.url(GEMINI_PATH),
            TEST_API_KEY,
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let mut app = TestApp::spawn_with_config(config, mock_server).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    /// Spawns the server with no API key configured.
    pub async fn spawn_without_api_key() -> Result<Self> {
        let mock_server = MockServer::start();
        let mut config = AppConfig::default();
        config.provider.api_url = Some(mock_server.url(GEMINI_PATH));
        config.provider.api_key = None;
        TestApp::spawn_with_config(config, mock_server).await
    }

    pub async fn spawn_with_config(config: AppConfig, mock_server: MockServer) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state = build_app_state(config)?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Mocks a successful Gemini reply carrying `text`.
    pub fn mock_completion(&self, text: &str) -> Mock<'_> {
        self.mock_gemini(200, gemini_body(text))
    }

    /// Mocks an arbitrary Gemini reply.
    pub fn mock_gemini(&self, status: u16, body: Value) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST)
                .path(GEMINI_PATH)
                .query_param("key", TEST_API_KEY);
            then.status(status).json_body(body);
        })
    }

    pub async fn post_analyze(&self, body: &Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/api/analyze", self.address))
            .json(body)
            .send()
            .await?)
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// The JSON shape of a Gemini `generateContent` reply.
pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" } }
        ]
    })
}
