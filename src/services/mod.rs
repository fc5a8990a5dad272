pub mod product_service;

pub use product_service::{ProductService, ServiceError, PRODUCT_NOT_FOUND};
