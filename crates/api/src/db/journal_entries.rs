//! Journal-entry query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::JournalEntries;
use super::Built;

/// Column order must match the positional mapper in the store.
const COLUMNS: [JournalEntries; 12] = [
    JournalEntries::Id,
    JournalEntries::TenantId,
    JournalEntries::UserId,
    JournalEntries::Title,
    JournalEntries::Content,
    JournalEntries::Mood,
    JournalEntries::IsPrivate,
    JournalEntries::ClientCreatedAt,
    JournalEntries::CreatedAt,
    JournalEntries::UpdatedAt,
    JournalEntries::SyncedAt,
    JournalEntries::IsDeleted,
];

pub fn find_by_id(tenant_id: &str, id: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(JournalEntries::Table)
        .and_where(Expr::col(JournalEntries::TenantId).eq(tenant_id))
        .and_where(Expr::col(JournalEntries::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub struct InsertParams<'a> {
    pub id: &'a str,
    pub tenant_id: &'a str,
    pub user_id: &'a str,
    pub title: Option<&'a str>,
    pub content: &'a str,
    pub mood: Option<&'a str>,
    pub is_private: bool,
    pub client_created_at: &'a str,
    pub now: &'a str,
    pub is_deleted: bool,
}

pub fn insert(p: &InsertParams<'_>) -> Built {
    Query::insert()
        .into_table(JournalEntries::Table)
        .columns(COLUMNS)
        .values_panic([
            p.id.into(),
            p.tenant_id.into(),
            p.user_id.into(),
            p.title.map(|s| s.to_string()).into(),
            p.content.into(),
            p.mood.map(|s| s.to_string()).into(),
            p.is_private.into(),
            p.client_created_at.into(),
            p.now.into(),
            p.now.into(),
            p.now.into(),
            p.is_deleted.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub struct UpdateParams<'a> {
    pub title: Option<&'a str>,
    pub content: &'a str,
    pub mood: Option<&'a str>,
    pub is_private: bool,
    pub is_deleted: bool,
}

pub fn update_if_newer(
    tenant_id: &str,
    id: &str,
    p: &UpdateParams<'_>,
    client_updated_at: &str,
    now: &str,
) -> Built {
    Query::update()
        .table(JournalEntries::Table)
        .value(JournalEntries::Title, p.title.map(|s| s.to_string()))
        .value(JournalEntries::Content, p.content)
        .value(JournalEntries::Mood, p.mood.map(|s| s.to_string()))
        .value(JournalEntries::IsPrivate, p.is_private)
        .value(JournalEntries::IsDeleted, p.is_deleted)
        .value(JournalEntries::UpdatedAt, now)
        .value(JournalEntries::SyncedAt, now)
        .and_where(Expr::col(JournalEntries::TenantId).eq(tenant_id))
        .and_where(Expr::col(JournalEntries::Id).eq(id))
        .and_where(Expr::col(JournalEntries::UpdatedAt).lt(client_updated_at))
        .build(SqliteQueryBuilder)
}

pub fn list_updated_since(tenant_id: &str, user_id: &str, since: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(JournalEntries::Table)
        .and_where(Expr::col(JournalEntries::TenantId).eq(tenant_id))
        .and_where(Expr::col(JournalEntries::UserId).eq(user_id))
        .and_where(Expr::col(JournalEntries::UpdatedAt).gt(since))
        .order_by(JournalEntries::UpdatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn mark_synced(tenant_id: &str, ids: &[String], now: &str) -> Built {
    Query::update()
        .table(JournalEntries::Table)
        .value(JournalEntries::SyncedAt, now)
        .and_where(Expr::col(JournalEntries::TenantId).eq(tenant_id))
        .and_where(Expr::col(JournalEntries::Id).is_in(ids.iter().cloned()))
        .build(SqliteQueryBuilder)
}
