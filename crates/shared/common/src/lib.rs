//! Common utilities shared across the workshop crates.
//!
//! This crate provides:
//! - Unified error handling for HTTP responses
//! - Configuration loaded from the environment
//! - Bearer token signing and verification
//! - Pagination helpers for list endpoints

#[cfg(feature = "jwt")]
pub mod auth;
pub mod config;
pub mod error;
pub mod pagination;

#[cfg(feature = "jwt")]
pub use auth::{Claims, JwtKeys, TokenResponse};
pub use config::{parse_duration, WorkshopConfig};
pub use error::{AppError, AppResult, ErrorBody, ErrorLayer};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
