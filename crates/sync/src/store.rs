//! Tenant-scoped data access.
//!
//! `Store` is the only way the sync core touches the database. Every method
//! takes the tenant id, and the query builders it executes refuse to exist
//! without one, so a query that forgets tenant scope cannot be written. A
//! row in another tenant reads as not-found, never as "forbidden".

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use anchorage_api::db::{self, Built};
use anchorage_api::{
    CheckIn, CheckInChange, JournalEntry, JournalEntryChange, Mood, MoodLog, MoodLogChange,
    Resource, ResourceType, SyncCursor, SyncEntity,
};

use crate::time;

pub struct Store<'c> {
    conn: &'c Connection,
}

/// Listing scope for check-ins: crew see their own rows, admins and
/// psychologists see the whole tenant.
#[derive(Debug, Clone, Copy)]
pub enum CheckInScope {
    User(Uuid),
    Tenant,
}

impl<'c> Store<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ── Mood logs ──────────────────────────────────────────────────────────

    pub fn find_mood_log(&self, tenant: Uuid, id: Uuid) -> rusqlite::Result<Option<MoodLog>> {
        let rows = sq_query_map(
            self.conn,
            db::mood_logs::find_by_id(&tenant.to_string(), &id.to_string()),
            mood_log_from_row,
        )?;
        Ok(rows.into_iter().next())
    }

    pub fn insert_mood_log(&self, row: &MoodLog) -> rusqlite::Result<()> {
        sq_execute(
            self.conn,
            db::mood_logs::insert(&db::mood_logs::InsertParams {
                id: &row.id.to_string(),
                tenant_id: &row.tenant_id.to_string(),
                user_id: &row.user_id.to_string(),
                mood: row.mood.as_str(),
                intensity: row.intensity,
                notes: row.notes.as_deref(),
                client_created_at: &time::fmt(&row.client_created_at),
                now: &time::fmt(&row.created_at),
                is_deleted: row.is_deleted,
            }),
        )?;
        Ok(())
    }

    /// Returns whether the update applied (payload strictly newer than the
    /// stored row).
    pub fn update_mood_log_if_newer(
        &self,
        tenant: Uuid,
        change: &MoodLogChange,
        client_updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> rusqlite::Result<bool> {
        let affected = sq_execute(
            self.conn,
            db::mood_logs::update_if_newer(
                &tenant.to_string(),
                &change.id.to_string(),
                &db::mood_logs::UpdateParams {
                    mood: change.mood.as_str(),
                    intensity: change.intensity,
                    notes: change.notes.as_deref(),
                    is_deleted: change.is_deleted,
                },
                &time::fmt(&client_updated_at),
                &time::fmt(&now),
            ),
        )?;
        Ok(affected > 0)
    }

    pub fn list_mood_logs_updated_since(
        &self,
        tenant: Uuid,
        user: Uuid,
        since: DateTime<Utc>,
    ) -> rusqlite::Result<Vec<MoodLog>> {
        sq_query_map(
            self.conn,
            db::mood_logs::list_updated_since(
                &tenant.to_string(),
                &user.to_string(),
                &time::fmt(&since),
            ),
            mood_log_from_row,
        )
    }

    pub fn mark_mood_logs_synced(
        &self,
        tenant: Uuid,
        ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        sq_execute(
            self.conn,
            db::mood_logs::mark_synced(&tenant.to_string(), &ids, &time::fmt(&now)),
        )?;
        Ok(())
    }

    // ── Journal entries ────────────────────────────────────────────────────

    pub fn find_journal_entry(
        &self,
        tenant: Uuid,
        id: Uuid,
    ) -> rusqlite::Result<Option<JournalEntry>> {
        let rows = sq_query_map(
            self.conn,
            db::journal_entries::find_by_id(&tenant.to_string(), &id.to_string()),
            journal_entry_from_row,
        )?;
        Ok(rows.into_iter().next())
    }

    pub fn insert_journal_entry(&self, row: &JournalEntry) -> rusqlite::Result<()> {
        sq_execute(
            self.conn,
            db::journal_entries::insert(&db::journal_entries::InsertParams {
                id: &row.id.to_string(),
                tenant_id: &row.tenant_id.to_string(),
                user_id: &row.user_id.to_string(),
                title: row.title.as_deref(),
                content: &row.content,
                mood: row.mood.map(|m| m.as_str()),
                is_private: row.is_private,
                client_created_at: &time::fmt(&row.client_created_at),
                now: &time::fmt(&row.created_at),
                is_deleted: row.is_deleted,
            }),
        )?;
        Ok(())
    }

    pub fn update_journal_entry_if_newer(
        &self,
        tenant: Uuid,
        change: &JournalEntryChange,
        client_updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> rusqlite::Result<bool> {
        let affected = sq_execute(
            self.conn,
            db::journal_entries::update_if_newer(
                &tenant.to_string(),
                &change.id.to_string(),
                &db::journal_entries::UpdateParams {
                    title: change.title.as_deref(),
                    content: &change.content,
                    mood: change.mood.map(|m| m.as_str()),
                    is_private: change.is_private,
                    is_deleted: change.is_deleted,
                },
                &time::fmt(&client_updated_at),
                &time::fmt(&now),
            ),
        )?;
        Ok(affected > 0)
    }

    pub fn list_journal_entries_updated_since(
        &self,
        tenant: Uuid,
        user: Uuid,
        since: DateTime<Utc>,
    ) -> rusqlite::Result<Vec<JournalEntry>> {
        sq_query_map(
            self.conn,
            db::journal_entries::list_updated_since(
                &tenant.to_string(),
                &user.to_string(),
                &time::fmt(&since),
            ),
            journal_entry_from_row,
        )
    }

    pub fn mark_journal_entries_synced(
        &self,
        tenant: Uuid,
        ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        sq_execute(
            self.conn,
            db::journal_entries::mark_synced(&tenant.to_string(), &ids, &time::fmt(&now)),
        )?;
        Ok(())
    }

    // ── Check-ins ──────────────────────────────────────────────────────────

    pub fn find_check_in(&self, tenant: Uuid, id: Uuid) -> rusqlite::Result<Option<CheckIn>> {
        let rows = sq_query_map(
            self.conn,
            db::check_ins::find_by_id(&tenant.to_string(), &id.to_string()),
            check_in_from_row,
        )?;
        Ok(rows.into_iter().next())
    }

    pub fn insert_check_in(&self, row: &CheckIn) -> rusqlite::Result<()> {
        let responses = match &row.responses {
            Some(value) => Some(serde_json::to_string(value).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(e))
            })?),
            None => None,
        };
        sq_execute(
            self.conn,
            db::check_ins::insert(&db::check_ins::InsertParams {
                id: &row.id.to_string(),
                tenant_id: &row.tenant_id.to_string(),
                user_id: &row.user_id.to_string(),
                scheduled_for: &time::fmt(&row.scheduled_for),
                completed_at: row.completed_at.map(|ts| time::fmt(&ts)).as_deref(),
                mood: row.mood.map(|m| m.as_str()),
                responses: responses.as_deref(),
                needs_attention: row.needs_attention,
                reviewed_by: row.reviewed_by.map(|id| id.to_string()).as_deref(),
                reviewed_at: row.reviewed_at.map(|ts| time::fmt(&ts)).as_deref(),
                review_notes: row.review_notes.as_deref(),
                client_created_at: &time::fmt(&row.client_created_at),
                now: &time::fmt(&row.created_at),
                is_deleted: row.is_deleted,
            }),
        )?;
        Ok(())
    }

    /// `include_review` gates the psychologist-only review columns; when
    /// false the stored review values are left untouched.
    pub fn update_check_in_if_newer(
        &self,
        tenant: Uuid,
        change: &CheckInChange,
        include_review: bool,
        client_updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> rusqlite::Result<bool> {
        let responses = match &change.responses {
            Some(value) => Some(serde_json::to_string(value).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(e))
            })?),
            None => None,
        };
        let reviewed_by = change.reviewed_by.map(|id| id.to_string());
        let reviewed_at = change.reviewed_at.map(|ts| time::fmt(&ts));
        let review = include_review.then(|| db::check_ins::ReviewFields {
            needs_attention: change.needs_attention,
            reviewed_by: reviewed_by.as_deref(),
            reviewed_at: reviewed_at.as_deref(),
            review_notes: change.review_notes.as_deref(),
        });

        let affected = sq_execute(
            self.conn,
            db::check_ins::update_if_newer(
                &tenant.to_string(),
                &change.id.to_string(),
                &db::check_ins::UpdateParams {
                    scheduled_for: &time::fmt(&change.scheduled_for),
                    completed_at: change.completed_at.map(|ts| time::fmt(&ts)).as_deref(),
                    mood: change.mood.map(|m| m.as_str()),
                    responses: responses.as_deref(),
                    is_deleted: change.is_deleted,
                    review,
                },
                &time::fmt(&client_updated_at),
                &time::fmt(&now),
            ),
        )?;
        Ok(affected > 0)
    }

    pub fn list_check_ins_updated_since(
        &self,
        tenant: Uuid,
        scope: CheckInScope,
        since: DateTime<Utc>,
    ) -> rusqlite::Result<Vec<CheckIn>> {
        let user = match scope {
            CheckInScope::User(user) => Some(user.to_string()),
            CheckInScope::Tenant => None,
        };
        sq_query_map(
            self.conn,
            db::check_ins::list_updated_since(
                &tenant.to_string(),
                user.as_deref(),
                &time::fmt(&since),
            ),
            check_in_from_row,
        )
    }

    pub fn mark_check_ins_synced(
        &self,
        tenant: Uuid,
        ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        sq_execute(
            self.conn,
            db::check_ins::mark_synced(&tenant.to_string(), &ids, &time::fmt(&now)),
        )?;
        Ok(())
    }

    // ── Resources ──────────────────────────────────────────────────────────

    pub fn list_resources_updated_since(
        &self,
        tenant: Uuid,
        since: DateTime<Utc>,
    ) -> rusqlite::Result<Vec<Resource>> {
        sq_query_map(
            self.conn,
            db::resources::list_updated_since(&tenant.to_string(), &time::fmt(&since)),
            resource_from_row,
        )
    }

    // ── Sync cursors ───────────────────────────────────────────────────────

    pub fn upsert_cursor(
        &self,
        tenant: Uuid,
        user: Uuid,
        device: Uuid,
        entity: SyncEntity,
        at: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        sq_execute(
            self.conn,
            db::cursors::upsert(
                &tenant.to_string(),
                &user.to_string(),
                &device.to_string(),
                entity.as_str(),
                &time::fmt(&at),
            ),
        )?;
        Ok(())
    }

    pub fn get_cursors(
        &self,
        tenant: Uuid,
        user: Uuid,
        device: Uuid,
    ) -> rusqlite::Result<Vec<SyncCursor>> {
        sq_query_map(
            self.conn,
            db::cursors::get_for_device(
                &tenant.to_string(),
                &user.to_string(),
                &device.to_string(),
            ),
            cursor_from_row,
        )
    }
}

// ── Query execution helpers ─────────────────────────────────────────────────

/// Run a built SELECT, mapping each row.
pub(crate) fn sq_query_map<T>(
    conn: &Connection,
    (sql, values): Built,
    f: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(sq_params(&values)), f)?;
    rows.collect()
}

/// Run a built INSERT/UPDATE/DELETE, returning the affected row count.
pub(crate) fn sq_execute(conn: &Connection, (sql, values): Built) -> rusqlite::Result<usize> {
    conn.execute(&sql, rusqlite::params_from_iter(sq_params(&values)))
}

/// Convert sea-query bind values into rusqlite values.
fn sq_params(values: &sea_query::Values) -> Vec<rusqlite::types::Value> {
    use rusqlite::types::Value as Sql;
    use sea_query::Value;

    values
        .0
        .iter()
        .map(|v| match v {
            Value::Bool(b) => b.map(|b| Sql::Integer(b as i64)).unwrap_or(Sql::Null),
            Value::TinyInt(n) => n.map(|n| Sql::Integer(n as i64)).unwrap_or(Sql::Null),
            Value::SmallInt(n) => n.map(|n| Sql::Integer(n as i64)).unwrap_or(Sql::Null),
            Value::Int(n) => n.map(|n| Sql::Integer(n as i64)).unwrap_or(Sql::Null),
            Value::BigInt(n) => n.map(Sql::Integer).unwrap_or(Sql::Null),
            Value::TinyUnsigned(n) => n.map(|n| Sql::Integer(n as i64)).unwrap_or(Sql::Null),
            Value::SmallUnsigned(n) => n.map(|n| Sql::Integer(n as i64)).unwrap_or(Sql::Null),
            Value::Unsigned(n) => n.map(|n| Sql::Integer(n as i64)).unwrap_or(Sql::Null),
            Value::BigUnsigned(n) => n
                .map(|n| Sql::Integer(i64::try_from(n).unwrap_or(i64::MAX)))
                .unwrap_or(Sql::Null),
            Value::Float(n) => n.map(|n| Sql::Real(n as f64)).unwrap_or(Sql::Null),
            Value::Double(n) => n.map(Sql::Real).unwrap_or(Sql::Null),
            Value::String(s) => s
                .as_ref()
                .map(|s| Sql::Text((**s).clone()))
                .unwrap_or(Sql::Null),
            Value::Char(c) => c.map(|c| Sql::Text(c.to_string())).unwrap_or(Sql::Null),
            Value::Bytes(b) => b
                .as_ref()
                .map(|b| Sql::Blob((**b).clone()))
                .unwrap_or(Sql::Null),
            _ => Sql::Null,
        })
        .collect()
}

// ── Row mappers ─────────────────────────────────────────────────────────────

fn invalid(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
}

fn uuid_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| invalid(idx, format!("invalid uuid: {e}")))
}

fn opt_uuid_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(|e| invalid(idx, format!("invalid uuid: {e}"))),
        None => Ok(None),
    }
}

fn ts_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    time::parse(&s).map_err(|e| invalid(idx, format!("invalid timestamp: {e}")))
}

fn opt_ts_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(s) => time::parse(&s)
            .map(Some)
            .map_err(|e| invalid(idx, format!("invalid timestamp: {e}"))),
        None => Ok(None),
    }
}

fn mood_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Mood> {
    let s: String = row.get(idx)?;
    Mood::from_str(&s).ok_or_else(|| invalid(idx, format!("unknown mood: {s}")))
}

fn opt_mood_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<Mood>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(s) => Mood::from_str(&s)
            .map(Some)
            .ok_or_else(|| invalid(idx, format!("unknown mood: {s}"))),
        None => Ok(None),
    }
}

/// Map a mood-log row; column order per `db::mood_logs::COLUMNS`.
fn mood_log_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MoodLog> {
    Ok(MoodLog {
        id: uuid_col(row, 0)?,
        tenant_id: uuid_col(row, 1)?,
        user_id: uuid_col(row, 2)?,
        mood: mood_col(row, 3)?,
        intensity: row.get(4)?,
        notes: row.get(5)?,
        client_created_at: ts_col(row, 6)?,
        created_at: ts_col(row, 7)?,
        updated_at: ts_col(row, 8)?,
        synced_at: ts_col(row, 9)?,
        is_deleted: row.get(10)?,
    })
}

fn journal_entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalEntry> {
    Ok(JournalEntry {
        id: uuid_col(row, 0)?,
        tenant_id: uuid_col(row, 1)?,
        user_id: uuid_col(row, 2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        mood: opt_mood_col(row, 5)?,
        is_private: row.get(6)?,
        client_created_at: ts_col(row, 7)?,
        created_at: ts_col(row, 8)?,
        updated_at: ts_col(row, 9)?,
        synced_at: ts_col(row, 10)?,
        is_deleted: row.get(11)?,
    })
}

fn check_in_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CheckIn> {
    let responses = match row.get::<_, Option<String>>(6)? {
        Some(s) => Some(
            serde_json::from_str(&s).map_err(|e| invalid(6, format!("invalid responses: {e}")))?,
        ),
        None => None,
    };
    Ok(CheckIn {
        id: uuid_col(row, 0)?,
        tenant_id: uuid_col(row, 1)?,
        user_id: uuid_col(row, 2)?,
        scheduled_for: ts_col(row, 3)?,
        completed_at: opt_ts_col(row, 4)?,
        mood: opt_mood_col(row, 5)?,
        responses,
        needs_attention: row.get(7)?,
        reviewed_by: opt_uuid_col(row, 8)?,
        reviewed_at: opt_ts_col(row, 9)?,
        review_notes: row.get(10)?,
        client_created_at: ts_col(row, 11)?,
        created_at: ts_col(row, 12)?,
        updated_at: ts_col(row, 13)?,
        synced_at: ts_col(row, 14)?,
        is_deleted: row.get(15)?,
    })
}

fn resource_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Resource> {
    let type_str: String = row.get(4)?;
    let resource_type = ResourceType::from_str(&type_str)
        .ok_or_else(|| invalid(4, format!("unknown resource type: {type_str}")))?;
    let tags: String = row.get(6)?;
    let tags = tags
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Resource {
        id: uuid_col(row, 0)?,
        tenant_id: opt_uuid_col(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        resource_type,
        category: row.get(5)?,
        tags,
        content: row.get(7)?,
        is_published: row.get(8)?,
        offline_available: row.get(9)?,
        created_at: ts_col(row, 10)?,
        updated_at: ts_col(row, 11)?,
    })
}

fn cursor_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SyncCursor> {
    let entity_str: String = row.get(0)?;
    let entity = SyncEntity::from_str(&entity_str)
        .ok_or_else(|| invalid(0, format!("unknown sync entity: {entity_str}")))?;
    Ok(SyncCursor {
        entity,
        last_synced_at: ts_col(row, 1)?,
        last_record_id: opt_uuid_col(row, 2)?,
        sync_cursor: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::TimeZone;

    fn sample_mood_log(tenant: Uuid, user: Uuid, now: DateTime<Utc>) -> MoodLog {
        MoodLog {
            id: Uuid::new_v4(),
            tenant_id: tenant,
            user_id: user,
            mood: Mood::Good,
            intensity: Some(7),
            notes: Some("calm seas".into()),
            client_created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            created_at: now,
            updated_at: now,
            synced_at: now,
            is_deleted: false,
        }
    }

    #[test]
    fn find_is_tenant_scoped() {
        let db = testing::test_db();
        let tenant_a = testing::seed_tenant(&db, "harborline");
        let tenant_b = testing::seed_tenant(&db, "northstar");
        let user = testing::seed_user(&db, tenant_a, anchorage_api::Role::Crew);
        let now = time::now();

        let conn = db.conn();
        let store = Store::new(&conn);
        let row = sample_mood_log(tenant_a, user, now);
        store.insert_mood_log(&row).expect("insert");

        assert!(store
            .find_mood_log(tenant_a, row.id)
            .expect("find own tenant")
            .is_some());
        // Same id under another tenant reads as not-found.
        assert!(store
            .find_mood_log(tenant_b, row.id)
            .expect("find other tenant")
            .is_none());
    }

    #[test]
    fn update_if_newer_applies_only_forward() {
        let db = testing::test_db();
        let tenant = testing::seed_tenant(&db, "harborline");
        let user = testing::seed_user(&db, tenant, anchorage_api::Role::Crew);
        let now = time::now();

        let conn = db.conn();
        let store = Store::new(&conn);
        let row = sample_mood_log(tenant, user, now);
        store.insert_mood_log(&row).expect("insert");

        let change = MoodLogChange {
            id: row.id,
            mood: Mood::Bad,
            intensity: None,
            notes: None,
            client_created_at: row.client_created_at,
            updated_at: None,
            is_deleted: false,
        };

        // Older ordering key: no-op.
        let stale = store
            .update_mood_log_if_newer(tenant, &change, now - chrono::Duration::hours(1), now)
            .expect("stale update");
        assert!(!stale);
        let stored = store
            .find_mood_log(tenant, row.id)
            .expect("find")
            .expect("row exists");
        assert_eq!(stored.mood, Mood::Good);
        assert_eq!(stored.intensity, Some(7));

        // Newer ordering key: applies, clearing absent optionals.
        let fresh = store
            .update_mood_log_if_newer(tenant, &change, now + chrono::Duration::hours(1), now)
            .expect("fresh update");
        assert!(fresh);
        let stored = store
            .find_mood_log(tenant, row.id)
            .expect("find")
            .expect("row exists");
        assert_eq!(stored.mood, Mood::Bad);
        assert_eq!(stored.intensity, None);
        assert_eq!(stored.notes, None);
    }

    #[test]
    fn check_in_responses_round_trip_as_json() {
        let db = testing::test_db();
        let tenant = testing::seed_tenant(&db, "harborline");
        let user = testing::seed_user(&db, tenant, anchorage_api::Role::Crew);
        let now = time::now();

        let conn = db.conn();
        let store = Store::new(&conn);
        let row = CheckIn {
            id: Uuid::new_v4(),
            tenant_id: tenant,
            user_id: user,
            scheduled_for: now,
            completed_at: None,
            mood: Some(Mood::Okay),
            responses: Some(serde_json::json!({"sleep": "poor", "hours": 5})),
            needs_attention: false,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            client_created_at: now,
            created_at: now,
            updated_at: now,
            synced_at: now,
            is_deleted: false,
        };
        store.insert_check_in(&row).expect("insert");

        let stored = store
            .find_check_in(tenant, row.id)
            .expect("find")
            .expect("row exists");
        assert_eq!(stored.responses, row.responses);
    }

    #[test]
    fn global_resources_are_visible_to_every_tenant() {
        let db = testing::test_db();
        let tenant_a = testing::seed_tenant(&db, "harborline");
        let tenant_b = testing::seed_tenant(&db, "northstar");
        testing::seed_resource(&db, None, "Box breathing", true);
        testing::seed_resource(&db, Some(tenant_a), "Fleet EAP contacts", true);
        testing::seed_resource(&db, Some(tenant_a), "Draft article", false);

        let conn = db.conn();
        let store = Store::new(&conn);
        let for_a = store
            .list_resources_updated_since(tenant_a, time::epoch())
            .expect("list for a");
        let for_b = store
            .list_resources_updated_since(tenant_b, time::epoch())
            .expect("list for b");

        // Tenant A: global + own published, never the unpublished draft.
        assert_eq!(for_a.len(), 2);
        // Tenant B: only the global row.
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].title, "Box breathing");
    }

    #[test]
    fn cursor_upsert_updates_in_place() {
        let db = testing::test_db();
        let tenant = testing::seed_tenant(&db, "harborline");
        let user = testing::seed_user(&db, tenant, anchorage_api::Role::Crew);
        let device = Uuid::new_v4();
        let first = time::now();
        let second = first + chrono::Duration::minutes(5);

        let conn = db.conn();
        let store = Store::new(&conn);
        for entity in SyncEntity::ALL {
            store
                .upsert_cursor(tenant, user, device, entity, first)
                .expect("first upsert");
        }
        store
            .upsert_cursor(tenant, user, device, SyncEntity::MoodLog, second)
            .expect("second upsert");

        let cursors = store.get_cursors(tenant, user, device).expect("cursors");
        assert_eq!(cursors.len(), 4);
        let mood = cursors
            .iter()
            .find(|c| c.entity == SyncEntity::MoodLog)
            .expect("mood cursor");
        assert_eq!(mood.last_synced_at, second);
    }
}
