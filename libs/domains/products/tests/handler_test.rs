//! Handler tests for the Products domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes, including the 404/401/403/422 ordering on mutations
//! - Soft-delete visibility
//!
//! The JWT middleware is layered onto the domain router here so the
//! authentication and ownership paths are exercised end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{middleware, Router};
use axum_helpers::{optional_jwt_auth_middleware, AuthIdentity, JwtAuth, JwtConfig};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use test_utils::{TestDatabase, TestDataBuilder};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars";

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn jwt_auth() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new(TEST_JWT_SECRET))
}

fn bearer_for(jwt: &JwtAuth, user_id: Uuid, name: &str) -> String {
    let token = jwt
        .create_access_token(&user_id.to_string(), &format!("{}@example.com", name), name)
        .unwrap();
    format!("Bearer {}", token)
}

fn app_with_auth<R: ProductRepository + 'static>(
    service: ProductService<R>,
    jwt: &JwtAuth,
) -> Router {
    handlers::router(service).layer(middleware::from_fn_with_state(
        jwt.clone(),
        optional_jwt_auth_middleware,
    ))
}

fn identity_for(user_id: Uuid, name: &str) -> AuthIdentity {
    AuthIdentity {
        user_id,
        name: name.to_string(),
    }
}

fn create_input(name: &str, description: &str, price: f64) -> CreateProductRequest {
    CreateProductRequest {
        name: Some(name.to_string()),
        description: Some(description.to_string()),
        price: Some(price),
    }
}

#[tokio::test]
async fn test_create_product_handler_returns_201() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let builder = TestDataBuilder::from_test_name("handler_create_201");
    let owner = db.create_test_user(builder.user_id(), "Ada").await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": builder.name("product", "desk"),
                "description": "Oak desk",
                "price": 49.99
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(product.name, builder.name("product", "desk"));
    assert_eq!(product.price_gbp, "49.99");
    let seller = product.seller.unwrap();
    assert_eq!(seller.id, owner);
    assert_eq!(seller.name, "Ada");
}

#[tokio::test]
async fn test_create_product_requires_authentication() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Desk",
                "description": "Oak desk",
                "price": 49.99
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_product_anonymous_with_bad_payload_still_401() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    // Identity is checked before the payload is even validated
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "price": -1 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_product_enumerates_all_invalid_fields() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let builder = TestDataBuilder::from_test_name("handler_create_422");
    let owner = db.create_test_user(builder.user_id(), "Ada").await;

    // name missing, description empty, price non-positive
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::from(
            serde_json::to_string(&json!({
                "description": "",
                "price": 0
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    let details = &body["details"];
    assert!(details.get("name").is_some());
    assert!(details.get("description").is_some());
    assert!(details.get("price").is_some());
}

#[tokio::test]
async fn test_create_product_takes_owner_from_token_only() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let builder = TestDataBuilder::from_test_name("handler_owner_from_token");
    let owner = db.create_test_user(builder.user_id(), "Ada").await;

    // Client-supplied id and owner_id must be ignored
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": builder.name("product", "desk"),
                "description": "Oak desk",
                "price": 10.0,
                "id": Uuid::new_v4(),
                "owner_id": Uuid::new_v4()
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(product.seller.unwrap().id, owner);
}

#[tokio::test]
async fn test_get_product_handler_returns_200() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_get_200");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "get"), "Oak desk", 49.99),
        )
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    // Reads need no credentials
    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.product.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(product.id, created.product.id);
    assert_eq!(product.price_gbp, "49.99");
    assert_eq!(product.seller.unwrap().name, "Ada");
}

#[tokio::test]
async fn test_get_product_handler_returns_404_for_missing() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_product_handler_rejects_malformed_id() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_UUID");
}

#[tokio::test]
async fn test_get_product_with_missing_owner_has_null_seller() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_null_seller");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "orphan"), "Oak desk", 5.0),
        )
        .await
        .unwrap();

    // Remove the owner row; the product must degrade, not fault
    use sea_orm::ConnectionTrait;
    db.connection()
        .execute_unprepared(&format!("DELETE FROM users WHERE id = '{}'", owner))
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.product.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert!(body.get("seller").is_some());
    assert!(body["seller"].is_null());
}

#[tokio::test]
async fn test_list_products_wraps_in_envelope_newest_first() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_list_envelope");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    for suffix in ["older", "newer"] {
        service
            .create_product(
                identity_for(owner, "Ada"),
                create_input(&builder.name("product", suffix), "Oak desk", 1.0),
            )
            .await
            .unwrap();
    }

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let list: ProductListResponse = json_body(response.into_body()).await;
    assert_eq!(list.products.len(), 2);
    assert_eq!(list.products[0].name, builder.name("product", "newer"));
    assert_eq!(list.products[1].name, builder.name("product", "older"));
    assert!(list.products.iter().all(|p| p.seller.is_some()));
}

#[tokio::test]
async fn test_update_product_handler_applies_partial_changes() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_update_partial");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "update"), "Oak desk", 49.99),
        )
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.product.id))
        .header("content-type", "application/json")
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::from(
            serde_json::to_string(&json!({ "price": 19.99 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(product.price_gbp, "19.99");
    assert_eq!(product.name, builder.name("product", "update"));
}

#[tokio::test]
async fn test_update_product_by_non_owner_returns_403() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_update_403");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let other = db.create_test_user(Uuid::new_v4(), "Mallory").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "owned"), "Oak desk", 5.0),
        )
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.product.id))
        .header("content-type", "application/json")
        .header("authorization", bearer_for(&jwt, other, "Mallory"))
        .body(Body::from(
            serde_json::to_string(&json!({ "price": 1.0 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_update_product_anonymous_returns_401() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_update_401");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "anon"), "Oak desk", 5.0),
        )
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.product.id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "price": 1.0 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_missing_product_returns_404_before_auth() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    // No credentials at all, yet the missing resource wins
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "price": 1.0 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_undeserializable_body_returns_422_even_for_missing_id() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    // A body the DTO cannot deserialize is refused by the Json extractor
    // itself, before the handler can look anything up: 422 even for a
    // missing id. Only well-formed bodies defer their checks to the service.
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "price": "abc" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_product_invalid_payload_returns_422() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_update_422");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "validate"), "Oak desk", 5.0),
        )
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.product.id))
        .header("content-type", "application/json")
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::from(
            serde_json::to_string(&json!({ "price": -5.0 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = json_body(response.into_body()).await;
    assert!(body["details"].get("price").is_some());
}

#[tokio::test]
async fn test_delete_product_handler_returns_204_and_hides_product() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_delete_204");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let created = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "delete"), "Oak desk", 5.0),
        )
        .await
        .unwrap();
    let product_id = created.product.id;

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", product_id))
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from reads
    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", product_id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A second delete behaves like a delete of a missing product
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", product_id))
        .header("authorization", bearer_for(&jwt, owner, "Ada"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The row itself survives, marked deleted. Only deleted_at moved: the
    // other columns, updated_at included, keep their pre-delete values.
    let repo = PgProductRepository::new(db.connection());
    let kept = repo.find_any_by_id(product_id).await.unwrap().unwrap();
    assert!(kept.deleted_at.is_some());
    assert_eq!(kept.name, created.product.name);
    assert_eq!(kept.price, created.product.price);
    assert_eq!(kept.updated_at, created.product.updated_at);
}

#[tokio::test]
async fn test_deleted_products_vanish_from_list() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let service = ProductService::new(repo);
    let builder = TestDataBuilder::from_test_name("handler_delete_list");

    let owner = db.create_test_user(builder.user_id(), "Ada").await;
    let keep = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "keep"), "Oak desk", 5.0),
        )
        .await
        .unwrap();
    let remove = service
        .create_product(
            identity_for(owner, "Ada"),
            create_input(&builder.name("product", "remove"), "Oak desk", 5.0),
        )
        .await
        .unwrap();

    service
        .delete_product(remove.product.id, Some(identity_for(owner, "Ada")))
        .await
        .unwrap();

    let jwt = jwt_auth();
    let app = app_with_auth(service, &jwt);

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let list: ProductListResponse = json_body(response.into_body()).await;

    assert_eq!(list.products.len(), 1);
    assert_eq!(list.products[0].id, keep.product.id);
}
