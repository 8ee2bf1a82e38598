//! Authentication and authorization module.
//!
//! This module provides:
//! - JWT token creation and verification
//! - Identity extraction middleware for protected and mixed-access routes
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, optional_jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! // Load config and create auth instance
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config);
//!
//! // Attach identity (when present) to every request
//! let api = Router::new()
//!     .route("/api/products", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::{AuthIdentity, MaybeIdentity, RequireIdentity, optional_jwt_auth_middleware};
