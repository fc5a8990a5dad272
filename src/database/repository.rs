use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Product, ProductData};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Custom(String),
}

pub type DynProductRepository = Arc<dyn ProductRepository + Send + Sync>;

/// CRUD-by-id primitives over the product store. No conditional writes:
/// `save` is an unconditional upsert and `delete_by_id` of a missing row is a no-op.
#[async_trait]
pub trait ProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError>;

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Inserts when `id` is `None` (the store assigns the identity), otherwise
    /// overwrites or inserts the row at `id`.
    async fn save(&self, id: Option<Uuid>, data: &ProductData) -> Result<Product, RepositoryError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
