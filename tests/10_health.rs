mod common;

use std::sync::Arc;

use anyhow::Result;
use products_api::app::AppState;
use products_api::config::AppConfig;
use products_api::database::models::{Product, ProductData};
use products_api::database::{ProductRepository, RepositoryError};
use reqwest::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok", "unexpected health body: {}", body);
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = server
        .client
        .get(format!("{}/", server.base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    assert_eq!(body["name"], "Products API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Store whose connectivity check always fails
struct UnreachableRepository;

#[async_trait::async_trait]
impl ProductRepository for UnreachableRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Err(unreachable_store())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Err(unreachable_store())
    }

    async fn exists_by_id(&self, _id: Uuid) -> Result<bool, RepositoryError> {
        Err(unreachable_store())
    }

    async fn save(&self, _id: Option<Uuid>, _data: &ProductData) -> Result<Product, RepositoryError> {
        Err(unreachable_store())
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<(), RepositoryError> {
        Err(unreachable_store())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Err(unreachable_store())
    }
}

fn unreachable_store() -> RepositoryError {
    RepositoryError::Custom("connection refused".to_string())
}

#[tokio::test]
async fn health_reports_degraded_when_storage_is_down() -> Result<()> {
    let config = AppConfig::in_memory();
    let state = AppState::new(Arc::new(UnreachableRepository), &config);
    let server = common::spawn_server_with_state(state, config).await?;

    let res = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "degraded", "unexpected health body: {}", body);
    Ok(())
}

#[tokio::test]
async fn storage_failure_returns_500_envelope() -> Result<()> {
    let config = AppConfig::in_memory();
    let state = AppState::new(Arc::new(UnreachableRepository), &config);
    let server = common::spawn_server_with_state(state, config).await?;

    let res = server.client.get(server.products_url()).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = res.json::<serde_json::Value>().await?;
    common::assert_error_envelope(&body, 500, "/api/v1/products");
    assert_eq!(body["error"], "Internal Server Error");
    Ok(())
}
