use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by product operations, ordered here the way the mutation
/// pipeline checks them: lookup, authentication, authorization, validation.
#[derive(Error, Debug)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Not the owner of product: {0}")]
    Forbidden(Uuid),

    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::AuthenticationRequired => {
                AppError::Unauthorized("Authentication required".to_string())
            }
            ProductError::Forbidden(_) => {
                AppError::Forbidden("You do not own this product".to_string())
            }
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::Internal(message) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_error_status_codes() {
        let id = Uuid::now_v7();
        let cases = [
            (ProductError::NotFound(id), StatusCode::NOT_FOUND),
            (
                ProductError::AuthenticationRequired,
                StatusCode::UNAUTHORIZED,
            ),
            (ProductError::Forbidden(id), StatusCode::FORBIDDEN),
            (
                ProductError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_422() {
        let request = crate::models::UpdateProductRequest {
            price: Some(-1.0),
            ..Default::default()
        };
        let errors = validator::Validate::validate(&request).unwrap_err();

        let response = ProductError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
