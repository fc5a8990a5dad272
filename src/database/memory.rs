use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{Product, ProductData};
use crate::database::repository::{ProductRepository, RepositoryError};

/// Map-backed store for tests and `STORAGE_BACKEND=memory`. Contents are lost on exit.
#[derive(Default)]
pub struct InMemoryProductRepository {
    rows: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.rows.read().await.contains_key(&id))
    }

    async fn save(&self, id: Option<Uuid>, data: &ProductData) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.write().await;

        let id = match id {
            Some(id) => id,
            None => loop {
                let candidate = Uuid::new_v4();
                if !rows.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let product = Product::from_data(id, data.clone());
        rows.insert(id, product.clone());
        debug!("Saved product {} in memory", id);
        Ok(product)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}
