//! Classification code registry - the closed vocabulary for error triage.
//!
//! Codes are short, stable, opaque string identifiers (category prefix plus
//! sequence, e.g. `IIP001`). They travel inside [`crate::ChainError`] values
//! as plain strings and are translated into transport statuses by
//! [`crate::mapper`]. The registry is process-wide static data; nothing here
//! mutates at runtime.
//!
//! # Categories
//!
//! - **Internal**: unexpected failures and unavailable subsystems
//! - **Validation**: rejected input, including rate limiting
//! - **Auth**: authentication and access control
//! - **Resource**: missing, duplicated, or conflicting entities
//! - **Business**: policy violations from domain rules
//! - **Dependency**: downstream call failures and timeouts
//!
//! # Governance
//!
//! Extending the registry means adding the constant here, pairing it into
//! [`REGISTERED`], and updating **both** tables in [`crate::mapper`] - the
//! HTTP and RPC vocabularies are not isomorphic, so neither table is derived
//! from the other. The exhaustiveness tests below fail on a code added to
//! only one place.

// ----------------------------------------------------------------------------
// Internal
// ----------------------------------------------------------------------------

/// Unexpected internal error.
pub const INTERNAL_FAILURE: &str = "IIF001";
/// Downstream service not available.
pub const SERVICE_UNAVAILABLE: &str = "ISU001";

// ----------------------------------------------------------------------------
// Input / Validation
// ----------------------------------------------------------------------------

/// Invalid parameters.
pub const INVALID_INPUT: &str = "IIP001";
/// Required field missing.
pub const MISSING_REQUIRED_FIELD: &str = "IIP002";
/// Incorrect format (e.g. email, UUID).
pub const INVALID_FORMAT: &str = "IIP003";
/// Payload too large.
pub const TOO_LARGE: &str = "IIP004";
/// Rate limit exceeded.
pub const TOO_MANY_REQUESTS: &str = "IIP005";

// ----------------------------------------------------------------------------
// Auth & Access
// ----------------------------------------------------------------------------

/// Not logged in or token missing.
pub const UNAUTHORIZED: &str = "IUA001";
/// Token expired.
pub const TOKEN_EXPIRED: &str = "IUA002";
/// Token malformed or revoked.
pub const INVALID_TOKEN: &str = "IUA003";
/// No permission for resource.
pub const FORBIDDEN: &str = "IFB001";

// ----------------------------------------------------------------------------
// Resource
// ----------------------------------------------------------------------------

/// Entity not found.
pub const NOT_FOUND: &str = "INF001";
/// Duplicate entity.
pub const ALREADY_EXISTS: &str = "ICF001";
/// State conflict.
pub const CONFLICT: &str = "ICF002";

// ----------------------------------------------------------------------------
// Business Logic
// ----------------------------------------------------------------------------

/// Email not verified.
pub const USER_NOT_VERIFIED: &str = "BUS001";
/// Suspended account.
pub const ACCOUNT_DISABLED: &str = "BUS002";
/// For billing or point systems.
pub const INSUFFICIENT_BALANCE: &str = "BUS003";

// ----------------------------------------------------------------------------
// Dependency
// ----------------------------------------------------------------------------

/// External service call failed.
pub const DEPENDENCY_FAILURE: &str = "DEP001";
/// Timeout calling downstream.
pub const TIMEOUT: &str = "DEP002";

// ============================================================================
// Registry Introspection
// ============================================================================

/// Category a classification code belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Unexpected failures and unavailable subsystems.
    Internal,
    /// Rejected input, including rate limiting.
    Validation,
    /// Authentication and access control.
    Auth,
    /// Missing, duplicated, or conflicting entities.
    Resource,
    /// Policy violations from domain rules.
    Business,
    /// Downstream call failures and timeouts.
    Dependency,
}

impl Category {
    /// Stable display name, usable in logs and dashboards.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::Resource => "resource",
            Self::Business => "business",
            Self::Dependency => "dependency",
        }
    }
}

/// Every registered code paired with its category.
///
/// Exists for exhaustive tests and registry introspection; lookups in hot
/// paths should use the constants directly.
pub const REGISTERED: &[(&str, Category)] = &[
    (INTERNAL_FAILURE, Category::Internal),
    (SERVICE_UNAVAILABLE, Category::Internal),
    (INVALID_INPUT, Category::Validation),
    (MISSING_REQUIRED_FIELD, Category::Validation),
    (INVALID_FORMAT, Category::Validation),
    (TOO_LARGE, Category::Validation),
    (TOO_MANY_REQUESTS, Category::Validation),
    (UNAUTHORIZED, Category::Auth),
    (TOKEN_EXPIRED, Category::Auth),
    (INVALID_TOKEN, Category::Auth),
    (FORBIDDEN, Category::Auth),
    (NOT_FOUND, Category::Resource),
    (ALREADY_EXISTS, Category::Resource),
    (CONFLICT, Category::Resource),
    (USER_NOT_VERIFIED, Category::Business),
    (ACCOUNT_DISABLED, Category::Business),
    (INSUFFICIENT_BALANCE, Category::Business),
    (DEPENDENCY_FAILURE, Category::Dependency),
    (TIMEOUT, Category::Dependency),
];

/// Category of a registered code, `None` for anything outside the registry.
pub fn category_of(code: &str) -> Option<Category> {
    REGISTERED
        .iter()
        .find(|(registered, _)| *registered == code)
        .map(|(_, category)| *category)
}

/// Whether `code` belongs to the closed registry.
#[inline]
pub fn is_registered(code: &str) -> bool {
    category_of(code).is_some()
}
