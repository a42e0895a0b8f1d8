//! Domain-level constants.

// =============================================================================
// Authorities
// =============================================================================

/// Authority granted to regular accounts
pub const ROLE_USER: &str = "ROLE_USER";

/// Authority granted to administrators
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
