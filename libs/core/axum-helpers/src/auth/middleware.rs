use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use uuid::Uuid;

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            // Fallback to cookie: "access_token=<token>"
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
                        if parts.len() == 2 && parts[0] == "access_token" {
                            Some(parts[1].to_string())
                        } else {
                            None
                        }
                    })
                })
        })
}

/// The authenticated caller, as derived from a verified JWT.
///
/// Inserted into request extensions by [`optional_jwt_auth_middleware`].
/// Handlers that tolerate anonymous callers read it through
/// [`MaybeIdentity`]; handlers that require a caller use the
/// [`RequireIdentity`] extractor instead.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub name: String,
}

/// Optional JWT authentication middleware
///
/// Verifies a JWT from the Authorization header or `access_token` cookie and,
/// on success, inserts an [`AuthIdentity`] into request extensions. Requests
/// without a token, or with an invalid or expired one, proceed anonymously.
/// Rejection for anonymous callers is left to the handlers that need it.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::auth::{JwtAuth, optional_jwt_auth_middleware};
///
/// let routes = Router::new()
///     .route("/api/products", get(list_handler))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         optional_jwt_auth_middleware
///     ));
/// ```
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(&headers) {
        match auth.verify_token(&token) {
            Ok(claims) => match claims.sub.parse::<Uuid>() {
                Ok(user_id) => {
                    request.extensions_mut().insert(AuthIdentity {
                        user_id,
                        name: claims.name,
                    });
                }
                Err(_) => {
                    tracing::debug!("JWT subject is not a valid UUID, treating as anonymous");
                }
            },
            Err(e) => {
                tracing::debug!("JWT verification failed: {}", e);
            }
        }
    }

    next.run(request).await
}

/// Extractor that rejects anonymous requests with 401.
///
/// Reads the [`AuthIdentity`] placed in request extensions by
/// [`optional_jwt_auth_middleware`]. Because this is a request-parts
/// extractor, it runs before any body extractor in the handler signature,
/// so missing authentication is reported before body validation.
///
/// # Example
///
/// ```ignore
/// async fn create_product(
///     RequireIdentity(identity): RequireIdentity,
///     ValidatedJson(input): ValidatedJson<CreateProductRequest>,
/// ) -> ProductResult<impl IntoResponse> {
///     // identity.user_id is the verified caller
/// }
/// ```
pub struct RequireIdentity(pub AuthIdentity);

impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .map(RequireIdentity)
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string()).into_response()
            })
    }
}

/// Extractor for the identity of a caller that may be anonymous.
///
/// Never rejects: anonymous requests yield `MaybeIdentity(None)`. Use this
/// when a later check (say, a resource lookup) must run before the request
/// can be refused for missing credentials.
pub struct MaybeIdentity(pub Option<AuthIdentity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<AuthIdentity>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let headers = headers_with("authorization", "Bearer abc.def.ghi");
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_requires_bearer_prefix() {
        let headers = headers_with("authorization", "Basic dXNlcjpwYXNz");
        assert_eq!(extract_token_from_request(&headers), None);
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let headers = headers_with("cookie", "theme=dark; access_token=abc.def.ghi; lang=en");
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_header_wins_over_cookie() {
        let mut headers = headers_with("authorization", "Bearer from-header");
        headers.insert("cookie", "access_token=from-cookie".parse().unwrap());
        assert_eq!(
            extract_token_from_request(&headers),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        assert_eq!(extract_token_from_request(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_require_identity_present() {
        let mut request = axum::http::Request::builder().body(()).unwrap();
        let identity = AuthIdentity {
            user_id: Uuid::now_v7(),
            name: "Alice".to_string(),
        };
        request.extensions_mut().insert(identity.clone());
        let (mut parts, _) = request.into_parts();

        let RequireIdentity(extracted) = RequireIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted.user_id, identity.user_id);
        assert_eq!(extracted.name, "Alice");
    }

    #[tokio::test]
    async fn test_require_identity_missing_returns_401() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let rejection = RequireIdentity::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_maybe_identity_present() {
        let mut request = axum::http::Request::builder().body(()).unwrap();
        let identity = AuthIdentity {
            user_id: Uuid::now_v7(),
            name: "Alice".to_string(),
        };
        request.extensions_mut().insert(identity.clone());
        let (mut parts, _) = request.into_parts();

        let MaybeIdentity(extracted) = MaybeIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted.unwrap().user_id, identity.user_id);
    }

    #[tokio::test]
    async fn test_maybe_identity_absent_is_none() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let MaybeIdentity(extracted) = MaybeIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(extracted.is_none());
    }
}
