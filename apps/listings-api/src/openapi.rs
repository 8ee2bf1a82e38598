//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the listings API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Listings API",
        version = "0.1.0",
        description = "Marketplace product listings with ownership-based access control",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Marketplace product listings")
    )
)]
pub struct ApiDoc;
