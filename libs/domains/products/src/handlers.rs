//! HTTP handlers for the Products API

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse, UnprocessableEntityResponse,
    },
    MaybeIdentity, RequireIdentity, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProductRequest, ProductListResponse, ProductResponse, UpdateProductRequest,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
            ProductListResponse
        ),
        responses(
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Marketplace product listings")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all live products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "List of products", body = ProductListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductListResponse>> {
    let items = service.list_products().await?;
    Ok(Json(ProductListResponse {
        products: items.into_iter().map(Into::into).collect(),
    }))
}

/// Create a new product listing
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequireIdentity(identity): RequireIdentity,
    ValidatedJson(input): ValidatedJson<CreateProductRequest>,
) -> ProductResult<impl IntoResponse> {
    let item = service.create_product(identity, input).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(item))))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductResponse>> {
    let item = service.get_product(id).await?;
    Ok(Json(item.into()))
}

/// Update a product; owner only
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    MaybeIdentity(identity): MaybeIdentity,
    Json(input): Json<UpdateProductRequest>,
) -> ProductResult<Json<ProductResponse>> {
    // The service decides between 404, 401, 403 and 422 in that order, so
    // the payload is taken unvalidated and the identity as-is.
    let item = service.update_product(id, identity, input).await?;
    Ok(Json(item.into()))
}

/// Withdraw a product; owner only
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    MaybeIdentity(identity): MaybeIdentity,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id, identity).await?;
    Ok(StatusCode::NO_CONTENT)
}
