//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Money
// =============================================================================

/// Fractional digits carried by every monetary amount
pub const MONEY_SCALE: u32 = 2;

/// Largest amount representable by a `decimal(10,2)` column
pub const MAX_MONEY_UNITS: i64 = 99_999_999;

// =============================================================================
// Validation
// =============================================================================

/// Minimum quantity of a part on a line
pub const MIN_PART_QUANTITY: u32 = 1;

/// Maximum length of an additional repair description
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Default bearer token lifetime in seconds (24 hours)
pub const DEFAULT_JWT_TTL_SECONDS: u64 = 86_400;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Server
// =============================================================================

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;
