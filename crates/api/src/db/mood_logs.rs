//! Mood-log query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::MoodLogs;
use super::Built;

/// Column order must match the positional mapper in the store.
const COLUMNS: [MoodLogs; 11] = [
    MoodLogs::Id,
    MoodLogs::TenantId,
    MoodLogs::UserId,
    MoodLogs::Mood,
    MoodLogs::Intensity,
    MoodLogs::Notes,
    MoodLogs::ClientCreatedAt,
    MoodLogs::CreatedAt,
    MoodLogs::UpdatedAt,
    MoodLogs::SyncedAt,
    MoodLogs::IsDeleted,
];

/// SELECT a single row within tenant scope.
pub fn find_by_id(tenant_id: &str, id: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(MoodLogs::Table)
        .and_where(Expr::col(MoodLogs::TenantId).eq(tenant_id))
        .and_where(Expr::col(MoodLogs::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub struct InsertParams<'a> {
    pub id: &'a str,
    pub tenant_id: &'a str,
    pub user_id: &'a str,
    pub mood: &'a str,
    pub intensity: Option<i64>,
    pub notes: Option<&'a str>,
    pub client_created_at: &'a str,
    /// Server clock; stamps `created_at`, `updated_at`, `synced_at`.
    pub now: &'a str,
    pub is_deleted: bool,
}

pub fn insert(p: &InsertParams<'_>) -> Built {
    Query::insert()
        .into_table(MoodLogs::Table)
        .columns(COLUMNS)
        .values_panic([
            p.id.into(),
            p.tenant_id.into(),
            p.user_id.into(),
            p.mood.into(),
            p.intensity.into(),
            p.notes.map(|s| s.to_string()).into(),
            p.client_created_at.into(),
            p.now.into(),
            p.now.into(),
            p.now.into(),
            p.is_deleted.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub struct UpdateParams<'a> {
    pub mood: &'a str,
    pub intensity: Option<i64>,
    pub notes: Option<&'a str>,
    pub is_deleted: bool,
}

/// Conditional UPDATE: applies only when the payload's ordering key is
/// strictly newer than the stored `updated_at`.
pub fn update_if_newer(
    tenant_id: &str,
    id: &str,
    p: &UpdateParams<'_>,
    client_updated_at: &str,
    now: &str,
) -> Built {
    Query::update()
        .table(MoodLogs::Table)
        .value(MoodLogs::Mood, p.mood)
        .value(MoodLogs::Intensity, p.intensity)
        .value(MoodLogs::Notes, p.notes.map(|s| s.to_string()))
        .value(MoodLogs::IsDeleted, p.is_deleted)
        .value(MoodLogs::UpdatedAt, now)
        .value(MoodLogs::SyncedAt, now)
        .and_where(Expr::col(MoodLogs::TenantId).eq(tenant_id))
        .and_where(Expr::col(MoodLogs::Id).eq(id))
        .and_where(Expr::col(MoodLogs::UpdatedAt).lt(client_updated_at))
        .build(SqliteQueryBuilder)
}

/// SELECT rows for `{tenant, user}` updated after `since`, tombstones
/// included, `updated_at` ascending.
pub fn list_updated_since(tenant_id: &str, user_id: &str, since: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(MoodLogs::Table)
        .and_where(Expr::col(MoodLogs::TenantId).eq(tenant_id))
        .and_where(Expr::col(MoodLogs::UserId).eq(user_id))
        .and_where(Expr::col(MoodLogs::UpdatedAt).gt(since))
        .order_by(MoodLogs::UpdatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Stamp `synced_at` on rows handed to a device this cycle.
pub fn mark_synced(tenant_id: &str, ids: &[String], now: &str) -> Built {
    Query::update()
        .table(MoodLogs::Table)
        .value(MoodLogs::SyncedAt, now)
        .and_where(Expr::col(MoodLogs::TenantId).eq(tenant_id))
        .and_where(Expr::col(MoodLogs::Id).is_in(ids.iter().cloned()))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_query_binds_the_tenant() {
        let (sql, _) = find_by_id("t", "m");
        assert!(sql.contains("\"tenant_id\" = ?"));

        let (sql, _) = list_updated_since("t", "u", "1970-01-01T00:00:00.000Z");
        assert!(sql.contains("\"tenant_id\" = ?"));
        assert!(sql.contains("\"user_id\" = ?"));

        let (sql, _) = mark_synced("t", &["m".to_string()], "now");
        assert!(sql.contains("\"tenant_id\" = ?"));
    }

    #[test]
    fn update_is_guarded_by_updated_at() {
        let p = UpdateParams {
            mood: "good",
            intensity: None,
            notes: None,
            is_deleted: false,
        };
        let (sql, _) = update_if_newer("t", "m", &p, "2024-01-02T11:00:00.000Z", "now");
        assert!(sql.contains("\"updated_at\" < ?"));
    }
}
