//! Check-in query builders.
//!
//! Listing takes an optional user scope: crew callers are pinned to their
//! own rows, admins and psychologists see the whole tenant.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::CheckIns;
use super::Built;

/// Column order must match the positional mapper in the store.
const COLUMNS: [CheckIns; 16] = [
    CheckIns::Id,
    CheckIns::TenantId,
    CheckIns::UserId,
    CheckIns::ScheduledFor,
    CheckIns::CompletedAt,
    CheckIns::Mood,
    CheckIns::Responses,
    CheckIns::NeedsAttention,
    CheckIns::ReviewedBy,
    CheckIns::ReviewedAt,
    CheckIns::ReviewNotes,
    CheckIns::ClientCreatedAt,
    CheckIns::CreatedAt,
    CheckIns::UpdatedAt,
    CheckIns::SyncedAt,
    CheckIns::IsDeleted,
];

pub fn find_by_id(tenant_id: &str, id: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(CheckIns::Table)
        .and_where(Expr::col(CheckIns::TenantId).eq(tenant_id))
        .and_where(Expr::col(CheckIns::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub struct InsertParams<'a> {
    pub id: &'a str,
    pub tenant_id: &'a str,
    pub user_id: &'a str,
    pub scheduled_for: &'a str,
    pub completed_at: Option<&'a str>,
    pub mood: Option<&'a str>,
    pub responses: Option<&'a str>,
    pub needs_attention: bool,
    pub reviewed_by: Option<&'a str>,
    pub reviewed_at: Option<&'a str>,
    pub review_notes: Option<&'a str>,
    pub client_created_at: &'a str,
    pub now: &'a str,
    pub is_deleted: bool,
}

pub fn insert(p: &InsertParams<'_>) -> Built {
    Query::insert()
        .into_table(CheckIns::Table)
        .columns(COLUMNS)
        .values_panic([
            p.id.into(),
            p.tenant_id.into(),
            p.user_id.into(),
            p.scheduled_for.into(),
            p.completed_at.map(|s| s.to_string()).into(),
            p.mood.map(|s| s.to_string()).into(),
            p.responses.map(|s| s.to_string()).into(),
            p.needs_attention.into(),
            p.reviewed_by.map(|s| s.to_string()).into(),
            p.reviewed_at.map(|s| s.to_string()).into(),
            p.review_notes.map(|s| s.to_string()).into(),
            p.client_created_at.into(),
            p.now.into(),
            p.now.into(),
            p.now.into(),
            p.is_deleted.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub struct UpdateParams<'a> {
    pub scheduled_for: &'a str,
    pub completed_at: Option<&'a str>,
    pub mood: Option<&'a str>,
    pub responses: Option<&'a str>,
    pub is_deleted: bool,
    /// Review fields; `None` leaves the stored values untouched
    /// (non-psychologist callers).
    pub review: Option<ReviewFields<'a>>,
}

pub struct ReviewFields<'a> {
    pub needs_attention: bool,
    pub reviewed_by: Option<&'a str>,
    pub reviewed_at: Option<&'a str>,
    pub review_notes: Option<&'a str>,
}

pub fn update_if_newer(
    tenant_id: &str,
    id: &str,
    p: &UpdateParams<'_>,
    client_updated_at: &str,
    now: &str,
) -> Built {
    let mut q = Query::update();
    q.table(CheckIns::Table)
        .value(CheckIns::ScheduledFor, p.scheduled_for)
        .value(
            CheckIns::CompletedAt,
            p.completed_at.map(|s| s.to_string()),
        )
        .value(CheckIns::Mood, p.mood.map(|s| s.to_string()))
        .value(CheckIns::Responses, p.responses.map(|s| s.to_string()))
        .value(CheckIns::IsDeleted, p.is_deleted)
        .value(CheckIns::UpdatedAt, now)
        .value(CheckIns::SyncedAt, now);

    if let Some(ref review) = p.review {
        q.value(CheckIns::NeedsAttention, review.needs_attention)
            .value(
                CheckIns::ReviewedBy,
                review.reviewed_by.map(|s| s.to_string()),
            )
            .value(
                CheckIns::ReviewedAt,
                review.reviewed_at.map(|s| s.to_string()),
            )
            .value(
                CheckIns::ReviewNotes,
                review.review_notes.map(|s| s.to_string()),
            );
    }

    q.and_where(Expr::col(CheckIns::TenantId).eq(tenant_id))
        .and_where(Expr::col(CheckIns::Id).eq(id))
        .and_where(Expr::col(CheckIns::UpdatedAt).lt(client_updated_at))
        .build(SqliteQueryBuilder)
}

/// `user_id: None` lists the whole tenant (admin / psychologist).
pub fn list_updated_since(tenant_id: &str, user_id: Option<&str>, since: &str) -> Built {
    let mut q = Query::select();
    q.columns(COLUMNS)
        .from(CheckIns::Table)
        .and_where(Expr::col(CheckIns::TenantId).eq(tenant_id));
    if let Some(user_id) = user_id {
        q.and_where(Expr::col(CheckIns::UserId).eq(user_id));
    }
    q.and_where(Expr::col(CheckIns::UpdatedAt).gt(since))
        .order_by(CheckIns::UpdatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn mark_synced(tenant_id: &str, ids: &[String], now: &str) -> Built {
    Query::update()
        .table(CheckIns::Table)
        .value(CheckIns::SyncedAt, now)
        .and_where(Expr::col(CheckIns::TenantId).eq(tenant_id))
        .and_where(Expr::col(CheckIns::Id).is_in(ids.iter().cloned()))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_params() -> UpdateParams<'static> {
        UpdateParams {
            scheduled_for: "2024-03-01T08:00:00.000Z",
            completed_at: None,
            mood: None,
            responses: None,
            is_deleted: false,
            review: None,
        }
    }

    #[test]
    fn review_fields_are_omitted_without_review() {
        let (sql, _) = update_if_newer("t", "c", &base_params(), "2024-03-01T09:00:00.000Z", "now");
        assert!(!sql.contains("needs_attention"));
        assert!(!sql.contains("review_notes"));
    }

    #[test]
    fn review_fields_are_set_with_review() {
        let mut p = base_params();
        p.review = Some(ReviewFields {
            needs_attention: true,
            reviewed_by: Some("psy"),
            reviewed_at: None,
            review_notes: Some("follow up"),
        });
        let (sql, _) = update_if_newer("t", "c", &p, "2024-03-01T09:00:00.000Z", "now");
        assert!(sql.contains("needs_attention"));
        assert!(sql.contains("review_notes"));
    }

    #[test]
    fn tenant_wide_listing_drops_only_the_user_filter() {
        let (scoped, _) = list_updated_since("t", Some("u"), "since");
        let (tenant_wide, _) = list_updated_since("t", None, "since");
        assert!(scoped.contains("\"user_id\" = ?"));
        assert!(!tenant_wide.contains("\"user_id\" = ?"));
        assert!(tenant_wide.contains("\"tenant_id\" = ?"));
    }
}
