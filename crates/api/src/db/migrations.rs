//! Canonical migration definitions.
//!
//! The sync core assumes the composite `(tenant_id, user_id)` and
//! `updated_at` indexes declared here exist.

/// A named migration: `(name, sql)`.
pub type Migration = (&'static str, &'static str);

pub const MIGRATIONS: &[Migration] = &[
    (
        "0001_schema",
        include_str!("../../migrations/0001_schema.sql"),
    ),
    (
        "0002_check_in_review",
        include_str!("../../migrations/0002_check_in_review.sql"),
    ),
];
