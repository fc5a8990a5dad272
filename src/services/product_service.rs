use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::{Product, ProductData};
use crate::database::repository::{DynProductRepository, RepositoryError};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn product_not_found() -> Self {
        ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string())
    }
}

/// Product use cases on top of an injected [`ProductRepository`](crate::database::ProductRepository).
///
/// Update and delete check existence first because the store only offers an
/// unconditional upsert and delete. The check and the write are not atomic.
pub struct ProductService {
    repository: DynProductRepository,
}

impl ProductService {
    pub fn new(repository: DynProductRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let products = self.repository.find_all().await?;
        debug!("Listed {} products", products.len());
        Ok(products)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Product, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(ServiceError::product_not_found)
    }

    pub async fn create(&self, data: ProductData) -> Result<Product, ServiceError> {
        let product = self.repository.save(None, &data).await?;
        info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, data: ProductData) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        self.repository.save(Some(id), &data).await?;
        info!("Updated product {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        self.repository.delete_by_id(id).await?;
        info!("Deleted product {}", id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(self.repository.health_check().await?)
    }

    async fn ensure_exists(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repository.exists_by_id(id).await? {
            debug!("Product {} does not exist", id);
            return Err(ServiceError::product_not_found());
        }
        Ok(())
    }
}
