use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::database::models::{Product, ProductData};
use crate::database::repository::{ProductRepository, RepositoryError};

const SELECT_COLUMNS: &str = "id, name, description, price";

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products");
        let rows = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, id: Option<Uuid>, data: &ProductData) -> Result<Product, RepositoryError> {
        // gen_random_uuid() assigns the identity for inserts
        let sql = format!(
            "INSERT INTO products (id, name, description, price)
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    price = EXCLUDED.price
             RETURNING {SELECT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.price)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                error!("Failed to save product {:?} ({}): {}", id, data.name, err);
                RepositoryError::from(err)
            })?;

        info!("Saved product {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
