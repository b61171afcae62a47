//! Well-known role name constants.
//!
//! These must match the seed data in `20260101000002_create_auth_tables.sql`.

/// Grants access to the whole `/admin` subtree.
pub const ROLE_ADMIN: &str = "admin";

/// Default role for accounts without admin privileges.
pub const ROLE_USER: &str = "user";
