//! Product service - business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use axum_helpers::AuthIdentity;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProductRequest, Product, ProductWithSeller, UpdateProductRequest};
use crate::money;
use crate::policy;
use crate::repository::ProductRepository;

/// Product service providing listing operations and the ownership policy.
///
/// Mutations run their checks in a fixed order: resource lookup first, then
/// authentication, then ownership, then payload validation. A caller can
/// therefore learn that a product exists without credentials, but nothing
/// more.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product owned by the authenticated user.
    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    pub async fn create_product(
        &self,
        identity: AuthIdentity,
        input: CreateProductRequest,
    ) -> ProductResult<ProductWithSeller> {
        input.validate()?;

        // Required fields are present once validation passes.
        let name = input.name.unwrap_or_default();
        let description = input.description.unwrap_or_default();
        let price = money::to_minor_units(input.price.unwrap_or_default());

        let product = Product::new(identity.user_id, name, description, price);
        let created = self.repository.create(product).await?;

        self.repository
            .find_with_seller(created.id)
            .await?
            .ok_or_else(|| {
                ProductError::Internal(format!("Created product {} missing on reload", created.id))
            })
    }

    /// Fetch a single live product with its seller.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<ProductWithSeller> {
        self.repository
            .find_with_seller(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// All live products with sellers, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<ProductWithSeller>> {
        self.repository.list_with_sellers().await
    }

    /// Update a product. Only the owner may update; absent payload fields are
    /// left unchanged.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: Uuid,
        identity: Option<AuthIdentity>,
        input: UpdateProductRequest,
    ) -> ProductResult<ProductWithSeller> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        let identity = identity.ok_or(ProductError::AuthenticationRequired)?;
        if !policy::can_modify(&identity, &product) {
            return Err(ProductError::Forbidden(id));
        }
        input.validate()?;

        let updated = self.repository.update(id, input).await?;

        self.repository
            .find_with_seller(updated.id)
            .await?
            .ok_or_else(|| {
                ProductError::Internal(format!("Updated product {} missing on reload", updated.id))
            })
    }

    /// Withdraw a product. Only the owner may delete; the row is kept and
    /// marked deleted.
    #[instrument(skip(self))]
    pub async fn delete_product(
        &self,
        id: Uuid,
        identity: Option<AuthIdentity>,
    ) -> ProductResult<()> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        let identity = identity.ok_or(ProductError::AuthenticationRequired)?;
        if !policy::can_modify(&identity, &product) {
            return Err(ProductError::Forbidden(id));
        }

        self.repository.soft_delete(id).await
    }
}
