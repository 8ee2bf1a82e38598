//! PostgreSQL connection management for the workspace
//!
//! Wraps SeaORM with a configured connection pool, startup retry with
//! exponential backoff, migration running, and a health check suitable
//! for readiness probes.
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "listings_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
