// handlers/mod.rs - HTTP handlers
//
// products: /api/v1/products CRUD, translating ServiceError into ApiError
// system:   / and /health
pub mod products;
pub mod system;
