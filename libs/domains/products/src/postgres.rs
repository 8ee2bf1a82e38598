use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    Unchanged,
};
use uuid::Uuid;

use crate::entity;
use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductWithSeller, UpdateProductRequest};
use crate::repository::ProductRepository;

/// PostgreSQL-backed product repository.
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let model = entity::ActiveModel::from(product)
            .insert(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn find_with_seller(&self, id: Uuid) -> ProductResult<Option<ProductWithSeller>> {
        let found = entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .find_also_related(domain_users::entity::Entity)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(found.map(|(model, user)| ProductWithSeller {
            product: model.into(),
            seller: user.map(Into::into),
        }))
    }

    async fn list_with_sellers(&self) -> ProductResult<Vec<ProductWithSeller>> {
        let rows = entity::Entity::find()
            .filter(entity::Column::DeletedAt.is_null())
            .find_also_related(domain_users::entity::Entity)
            .order_by_desc(entity::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(model, user)| ProductWithSeller {
                product: model.into(),
                seller: user.map(Into::into),
            })
            .collect())
    }

    async fn update(&self, id: Uuid, update: UpdateProductRequest) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?
            .ok_or(ProductError::NotFound(id))?;

        let mut product: Product = model.into();
        product.apply_update(update);

        let updated = entity::ActiveModel::from(product)
            .update(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: Uuid) -> ProductResult<()> {
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?
            .ok_or(ProductError::NotFound(id))?;

        // Touch nothing but deleted_at; updated_at keeps its value.
        let active = entity::ActiveModel {
            id: Unchanged(model.id),
            deleted_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };
        active
            .update(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(product_id = %id, "Soft deleted product");
        Ok(())
    }

    async fn find_any_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }
}
