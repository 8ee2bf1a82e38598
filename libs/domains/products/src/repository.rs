use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductWithSeller, UpdateProductRequest};

/// Persistence operations for products.
///
/// Every read except `find_any_by_id` sees only live rows: a soft-deleted
/// product behaves exactly like one that never existed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Fetch one live product with its owner eager-loaded.
    async fn find_with_seller(&self, id: Uuid) -> ProductResult<Option<ProductWithSeller>>;

    /// All live products with owners, newest first.
    async fn list_with_sellers(&self) -> ProductResult<Vec<ProductWithSeller>>;

    async fn update(&self, id: Uuid, update: UpdateProductRequest) -> ProductResult<Product>;

    /// Mark a live product deleted. Only `deleted_at` changes; every other
    /// column, `updated_at` included, keeps its value.
    async fn soft_delete(&self, id: Uuid) -> ProductResult<()>;

    /// Fetch by id regardless of deletion state. For diagnostics and tests;
    /// no API route reaches this.
    async fn find_any_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;
}
