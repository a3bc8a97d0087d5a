//! Sync-cursor query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::SyncCursors;
use super::Built;

/// Upsert a cursor row. `ON CONFLICT ... DO UPDATE` rather than
/// `INSERT OR REPLACE` so the `last_record_id` / `sync_cursor` hook columns
/// survive each cycle.
pub fn upsert(
    tenant_id: &str,
    user_id: &str,
    device_id: &str,
    entity: &str,
    last_synced_at: &str,
) -> Built {
    let sql = concat!(
        "INSERT INTO \"sync_cursors\" ",
        "(\"tenant_id\", \"user_id\", \"device_id\", \"entity\", \"last_synced_at\") ",
        "VALUES (?, ?, ?, ?, ?) ",
        "ON CONFLICT (\"tenant_id\", \"user_id\", \"device_id\", \"entity\") ",
        "DO UPDATE SET \"last_synced_at\" = excluded.\"last_synced_at\"",
    )
    .to_string();
    let values = sea_query::Values(vec![
        tenant_id.into(),
        user_id.into(),
        device_id.into(),
        entity.into(),
        last_synced_at.into(),
    ]);
    (sql, values)
}

/// All cursor rows for one device, ordered by entity for stable output.
pub fn get_for_device(tenant_id: &str, user_id: &str, device_id: &str) -> Built {
    Query::select()
        .columns([
            SyncCursors::Entity,
            SyncCursors::LastSyncedAt,
            SyncCursors::LastRecordId,
            SyncCursors::SyncCursor,
        ])
        .from(SyncCursors::Table)
        .and_where(Expr::col(SyncCursors::TenantId).eq(tenant_id))
        .and_where(Expr::col(SyncCursors::UserId).eq(user_id))
        .and_where(Expr::col(SyncCursors::DeviceId).eq(device_id))
        .order_by(SyncCursors::Entity, Order::Asc)
        .build(SqliteQueryBuilder)
}
