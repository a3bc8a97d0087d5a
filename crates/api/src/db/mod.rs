//! Shared database schema, migrations, and query builders.
//!
//! Every builder that touches a user-owned table takes the tenant id as a
//! required argument: there is no way to construct an unscoped query from
//! this module, which is what makes the store the tenant-isolation choke
//! point.

pub mod check_ins;
pub mod cursors;
pub mod journal_entries;
pub mod migrations;
pub mod mood_logs;
pub mod resources;
pub mod tables;
pub mod users;

/// A built query: SQL plus bind values.
pub type Built = (String, sea_query::Values);
