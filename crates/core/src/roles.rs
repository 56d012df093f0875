//! Role names used for authorization checks.

/// Administrators maintain reference data and user accounts.
pub const ROLE_ADMIN: &str = "admin";

/// Salespeople build bids and production plans.
pub const ROLE_SALES: &str = "sales";
