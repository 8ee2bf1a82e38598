use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Public projection of a user, safe to embed in any API response.
///
/// Deliberately excludes email, password hash, and timestamps; a listing's
/// seller is identified to buyers by id and display name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
}

impl From<crate::entity::Model> for PublicUser {
    fn from(model: crate::entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
