#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use products_api::app::{router, AppState};
use products_api::config::AppConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const PRODUCTS_PATH: &str = "/api/v1/products";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn products_url(&self) -> String {
        format!("{}{}", self.base_url, PRODUCTS_PATH)
    }

    pub fn product_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}{}/{}", self.base_url, PRODUCTS_PATH, id)
    }

    pub async fn create(&self, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.post(self.products_url()).json(body).send().await?)
    }

    pub async fn get(&self, id: impl std::fmt::Display) -> Result<reqwest::Response> {
        Ok(self.client.get(self.product_url(id)).send().await?)
    }

    pub async fn update(&self, id: impl std::fmt::Display, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.put(self.product_url(id)).json(body).send().await?)
    }

    pub async fn delete(&self, id: impl std::fmt::Display) -> Result<reqwest::Response> {
        Ok(self.client.delete(self.product_url(id)).send().await?)
    }

    /// Create and return the stored product JSON, asserting 201
    pub async fn create_ok(&self, body: &Value) -> Result<Value> {
        let res = self.create(body).await?;
        assert_eq!(res.status(), StatusCode::CREATED, "create failed: {}", res.text().await?);
        Ok(res.json().await?)
    }

    /// Polls `/` rather than `/health` so servers over unhealthy stores still come up.
    async fn wait_until_listening(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start the real router over a fresh in-memory store on an unused port.
/// The server task lives as long as the test's runtime.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AppConfig::in_memory()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let state = AppState::in_memory(&config);
    spawn_server_with_state(state, config).await
}

/// Same as [`spawn_server_with`] but over caller-built state, e.g. a stub repository.
pub async fn spawn_server_with_state(state: AppState, config: AppConfig) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer {
        port,
        base_url,
        client: reqwest::Client::new(),
    };
    server.wait_until_listening(Duration::from_secs(5)).await?;
    Ok(server)
}

pub fn product_body(name: &str, description: Option<&str>, price: &str) -> Value {
    json!({ "name": name, "description": description, "price": price })
}

/// Checks the `{timestamp, status, error, path}` envelope
pub fn assert_error_envelope(body: &Value, status: u16, path: &str) {
    let object = body.as_object().unwrap_or_else(|| panic!("error body is not an object: {body}"));
    assert_eq!(object.len(), 4, "unexpected envelope fields: {body}");
    assert_eq!(body["status"], json!(status), "status mismatch: {body}");
    assert_eq!(body["path"], json!(path), "path mismatch: {body}");
    assert!(body["error"].is_string(), "missing error message: {body}");

    let timestamp = body["timestamp"].as_str().expect("timestamp should be a string");
    assert!(
        chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
        "timestamp is not RFC 3339: {timestamp}"
    );
    assert!(timestamp.ends_with('Z'), "timestamp should be UTC: {timestamp}");
}
