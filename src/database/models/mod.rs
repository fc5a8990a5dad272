pub mod product;

pub use product::{Product, ProductData, ProductRequest};
