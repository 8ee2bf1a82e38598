//! Users Domain
//!
//! Sellers are regular users; this service reads them but never creates or
//! mutates them, so the crate stays small: the sea-orm entity (joined by
//! products to load a listing's seller) and the public projection embedded
//! in API responses.

pub mod entity;
pub mod models;

// Re-export commonly used types
pub use models::PublicUser;
