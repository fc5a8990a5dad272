pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryProductRepository;
pub use postgres::PgProductRepository;
pub use repository::{DynProductRepository, ProductRepository, RepositoryError};
