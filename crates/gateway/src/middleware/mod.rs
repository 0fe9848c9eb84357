//! Middleware for bearer-token authentication.

mod auth;

pub use auth::{auth_middleware, StaffMember};
