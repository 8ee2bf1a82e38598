use axum_helpers::AuthIdentity;

use crate::models::Product;

/// Ownership check for mutating operations. Listing and showing products
/// never consult this; creating checks identity presence only.
pub fn can_modify(identity: &AuthIdentity, product: &Product) -> bool {
    product.owner_id == identity.user_id
}
