//! Sync-cursor advancement.
//!
//! One cursor row per `{tenant, user, device, entity}`, advanced to the
//! cycle's `server_now` at the tail of a successful sync. The per-entity
//! grain is a forward-compatibility hook: the wire still carries a single
//! `lastSyncAt`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use anchorage_api::SyncEntity;

use crate::engine::AuthContext;
use crate::error::Result;
use crate::store::Store;

pub(crate) fn advance_cursors(
    store: &Store<'_>,
    ctx: &AuthContext,
    device_id: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    for entity in SyncEntity::ALL {
        store.upsert_cursor(ctx.tenant_id, ctx.user_id, device_id, entity, now)?;
    }
    Ok(())
}
