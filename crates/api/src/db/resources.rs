//! Resource-library query builders.
//!
//! Resources are authored by administrative paths outside the sync core and
//! only read during pull. A row with `tenant_id IS NULL` is global.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::Resources;
use super::Built;

/// Column order must match the positional mapper in the store.
const COLUMNS: [Resources; 12] = [
    Resources::Id,
    Resources::TenantId,
    Resources::Title,
    Resources::Description,
    Resources::ResourceType,
    Resources::Category,
    Resources::Tags,
    Resources::Content,
    Resources::IsPublished,
    Resources::OfflineAvailable,
    Resources::CreatedAt,
    Resources::UpdatedAt,
];

pub struct InsertParams<'a> {
    pub id: &'a str,
    pub tenant_id: Option<&'a str>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub resource_type: &'a str,
    pub category: Option<&'a str>,
    /// Comma-separated tag list.
    pub tags: &'a str,
    pub content: Option<&'a str>,
    pub is_published: bool,
    pub offline_available: bool,
    pub now: &'a str,
}

pub fn insert(p: &InsertParams<'_>) -> Built {
    Query::insert()
        .into_table(Resources::Table)
        .columns(COLUMNS)
        .values_panic([
            p.id.into(),
            p.tenant_id.map(|s| s.to_string()).into(),
            p.title.into(),
            p.description.map(|s| s.to_string()).into(),
            p.resource_type.into(),
            p.category.map(|s| s.to_string()).into(),
            p.tags.into(),
            p.content.map(|s| s.to_string()).into(),
            p.is_published.into(),
            p.offline_available.into(),
            p.now.into(),
            p.now.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Published rows visible to `tenant` (own plus global) updated after
/// `since`, `updated_at` ascending.
pub fn list_updated_since(tenant_id: &str, since: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(Resources::Table)
        .and_where(Expr::col(Resources::IsPublished).eq(true))
        .and_where(
            Expr::col(Resources::TenantId)
                .eq(tenant_id)
                .or(Expr::col(Resources::TenantId).is_null()),
        )
        .and_where(Expr::col(Resources::UpdatedAt).gt(since))
        .order_by(Resources::UpdatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}
