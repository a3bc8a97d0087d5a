//! User lookup queries for the authentication collaborator.

/// Resolve an API key to the trusted `{user, tenant, role}` tuple.
pub const BY_API_KEY: &str = "SELECT id, tenant_id, role FROM users WHERE api_key = ?1";
