//! Product lifecycle: create, edit, moderation, reservation, and removal.

pub mod request;
pub mod service;

pub use request::{CreateProductRequest, UpdateProductRequest};
pub use service::ProductService;
