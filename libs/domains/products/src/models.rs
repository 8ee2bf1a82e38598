use chrono::{DateTime, Utc};
use domain_users::PublicUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::money;

/// A marketplace listing.
///
/// `price` is pence (for precision); decimal pounds exist only at the API
/// boundary. See the `money` module for the conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Price in pence
    pub price: i64,
    /// User who listed the product
    pub owner_id: Uuid,
    /// Set when the listing is withdrawn; withdrawn rows are invisible to reads
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a fresh listing owned by `owner_id`. `price` is already pence.
    pub fn new(owner_id: Uuid, name: String, description: String, price: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            description,
            price,
            owner_id,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and touch `updated_at`.
    ///
    /// Absent fields keep their current values; a present price arrives in
    /// pounds and is converted to pence here.
    pub fn apply_update(&mut self, update: UpdateProductRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = money::to_minor_units(price);
        }
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a product.
///
/// Fields are `Option` so a missing key surfaces as a named validation error
/// alongside any other violations, instead of aborting deserialization.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(required, length(min = 1, max = 255))]
    #[schema(example = "Oak desk")]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    #[schema(example = "Solid oak, seats two monitors")]
    pub description: Option<String>,
    /// Price in pounds
    #[validate(required, range(min = 0.01))]
    #[schema(example = 49.99)]
    pub price: Option<f64>,
}

/// Payload for updating a product; every field is optional and absent fields
/// are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    /// Price in pounds
    #[validate(range(min = 0.01))]
    pub price: Option<f64>,
}

/// A product together with its (possibly absent) owner row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithSeller {
    pub product: Product,
    pub seller: Option<PublicUser>,
}

/// Public shape of a single product.
///
/// `price_gbp` is the formatted decimal string, never a float. `seller` is
/// `null` when the owning user row could not be loaded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(example = "49.99")]
    pub price_gbp: String,
    pub created_at: DateTime<Utc>,
    pub seller: Option<PublicUser>,
}

impl From<ProductWithSeller> for ProductResponse {
    fn from(item: ProductWithSeller) -> Self {
        Self {
            id: item.product.id,
            name: item.product.name,
            description: item.product.description,
            price_gbp: money::to_display_string(item.product.price),
            created_at: item.product.created_at,
            seller: item.seller,
        }
    }
}

/// Envelope for list responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
}
