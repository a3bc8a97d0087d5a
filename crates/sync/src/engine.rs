//! Sync orchestration: the public entry points of the core.
//!
//! One call runs `VALIDATE_ENVELOPE → BEGIN_TX → push → pull →
//! UPDATE_CURSORS → COMMIT`. Everything between BEGIN and COMMIT shares one
//! transaction, so the pull observes the pushes just applied and the
//! returned `lastSyncAt` reflects exactly what concurrent readers can see.

use uuid::Uuid;

use anchorage_api::{Role, SyncCursor, SyncRequest, SyncResponse};

use crate::cursor;
use crate::db::Db;
use crate::error::{Result, SyncError};
use crate::merge;
use crate::pull;
use crate::store::Store;
use crate::time;

/// Request body cap for `POST /api/sync` (~10 MB of batched changes).
pub const MAX_SYNC_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Trusted caller identity attached by the authentication collaborator.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

/// Decode the sync envelope. Envelope problems fail the whole call; the
/// per-change arrays stay raw JSON and are validated one by one in the
/// merge engine.
pub fn parse_envelope(body: serde_json::Value) -> Result<SyncRequest> {
    serde_json::from_value(body)
        .map_err(|e| SyncError::InvalidEnvelope(format!("invalid sync envelope: {e}")))
}

/// Run one sync call.
pub fn run_sync(db: &Db, ctx: &AuthContext, req: SyncRequest) -> Result<SyncResponse> {
    let device_id = req
        .device_id
        .parse::<Uuid>()
        .map_err(|_| SyncError::InvalidEnvelope("deviceId must be a UUID".into()))?;

    let now = time::now();
    let since = req.last_sync_at.unwrap_or_else(time::epoch);

    let mut conn = db.conn();
    let tx = conn.transaction()?;
    let response = {
        let store = Store::new(&tx);
        let pushed = merge::apply_changes(&store, ctx, now, &req.changes)?;
        let server_changes = pull::collect_server_changes(&store, ctx, since, now)?;
        cursor::advance_cursors(&store, ctx, device_id, now)?;

        let pulled = server_changes.mood_logs.len()
            + server_changes.journal_entries.len()
            + server_changes.check_ins.len()
            + server_changes.resources.len();
        tracing::debug!(
            device = %device_id,
            applied = pushed.applied,
            stale = pushed.stale,
            rejected = pushed.rejected,
            pulled,
            "sync cycle complete"
        );

        SyncResponse {
            success: true,
            server_changes,
            conflicts: Vec::new(),
            last_sync_at: now,
        }
    };
    tx.commit()?;
    Ok(response)
}

/// Cursor rows for one device, for `GET /api/sync/status`.
pub fn device_status(db: &Db, ctx: &AuthContext, device_id: Uuid) -> Result<Vec<SyncCursor>> {
    let conn = db.conn();
    let store = Store::new(&conn);
    Ok(store.get_cursors(ctx.tenant_id, ctx.user_id, device_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_envelope_rejects_non_sequence_changes() {
        let err = parse_envelope(serde_json::json!({
            "deviceId": "7b2a3c1e-9f64-4a0d-8b11-2f5d6c7e8a90",
            "changes": { "moodLogs": {"id": "not-a-sequence"} }
        }));
        assert!(matches!(err, Err(SyncError::InvalidEnvelope(_))));
    }

    #[test]
    fn parse_envelope_requires_device_id() {
        let err = parse_envelope(serde_json::json!({ "changes": {} }));
        assert!(matches!(err, Err(SyncError::InvalidEnvelope(_))));
    }

    #[test]
    fn run_sync_rejects_malformed_device_id() {
        let db = crate::testing::test_db();
        let tenant = crate::testing::seed_tenant(&db, "harborline");
        let user = crate::testing::seed_user(&db, tenant, Role::Crew);
        let ctx = crate::testing::ctx(tenant, user, Role::Crew);

        let req = parse_envelope(serde_json::json!({
            "deviceId": "galley-tablet",
            "changes": {}
        }))
        .expect("envelope shape is fine");
        let err = run_sync(&db, &ctx, req);
        assert!(matches!(err, Err(SyncError::InvalidEnvelope(_))));
    }
}
