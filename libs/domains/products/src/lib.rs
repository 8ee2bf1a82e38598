//! Products domain - marketplace listings
//!
//! Products are created, updated and withdrawn by their owners and are
//! readable by anyone. Prices live in pence (see [`money`]); deletion is a
//! soft delete that hides the row from every read path.
//!
//! Layers follow the usual split: HTTP handlers over a [`ProductService`]
//! over a [`ProductRepository`], with the PostgreSQL implementation in
//! [`postgres`].

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod money;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::{router, ApiDoc};
pub use models::{
    CreateProductRequest, Product, ProductListResponse, ProductResponse, ProductWithSeller,
    UpdateProductRequest,
};
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
