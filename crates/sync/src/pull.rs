//! Pull planning: the server→client half of a sync.
//!
//! Deltas are every row in the sync window `(since, now]` for the caller's
//! scope, tombstones included, ordered by `updated_at` ascending so a
//! client may checkpoint partial progress. Rows handed out are stamped
//! `synced_at = now` in the same transaction.

use chrono::{DateTime, Utc};

use anchorage_api::{Role, ServerChanges};

use crate::engine::AuthContext;
use crate::error::Result;
use crate::store::{CheckInScope, Store};

pub(crate) fn collect_server_changes(
    store: &Store<'_>,
    ctx: &AuthContext,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ServerChanges> {
    let mut mood_logs = store.list_mood_logs_updated_since(ctx.tenant_id, ctx.user_id, since)?;
    let mut journal_entries =
        store.list_journal_entries_updated_since(ctx.tenant_id, ctx.user_id, since)?;

    let scope = match ctx.role {
        Role::Crew => CheckInScope::User(ctx.user_id),
        Role::Admin | Role::Psychologist => CheckInScope::Tenant,
    };
    let mut check_ins = store.list_check_ins_updated_since(ctx.tenant_id, scope, since)?;

    let resources = store.list_resources_updated_since(ctx.tenant_id, since)?;

    // This cycle delivered these rows to a device.
    let ids: Vec<_> = mood_logs.iter().map(|r| r.id).collect();
    store.mark_mood_logs_synced(ctx.tenant_id, &ids, now)?;
    let ids: Vec<_> = journal_entries.iter().map(|r| r.id).collect();
    store.mark_journal_entries_synced(ctx.tenant_id, &ids, now)?;
    let ids: Vec<_> = check_ins.iter().map(|r| r.id).collect();
    store.mark_check_ins_synced(ctx.tenant_id, &ids, now)?;

    for row in &mut mood_logs {
        row.synced_at = now;
    }
    for row in &mut journal_entries {
        row.synced_at = now;
    }
    for row in &mut check_ins {
        row.synced_at = now;
    }

    Ok(ServerChanges {
        mood_logs,
        journal_entries,
        check_ins,
        resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::testing;
    use crate::time;
    use anchorage_api::{Mood, MoodLog};
    use uuid::Uuid;

    fn seed_mood_log(store: &Store<'_>, tenant: Uuid, user: Uuid, at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        store
            .insert_mood_log(&MoodLog {
                id,
                tenant_id: tenant,
                user_id: user,
                mood: Mood::Okay,
                intensity: None,
                notes: None,
                client_created_at: at,
                created_at: at,
                updated_at: at,
                synced_at: at,
                is_deleted: false,
            })
            .expect("seed mood log");
        id
    }

    #[test]
    fn window_is_strictly_after_since() {
        let db = testing::test_db();
        let tenant = testing::seed_tenant(&db, "harborline");
        let user = testing::seed_user(&db, tenant, Role::Crew);
        let ctx = testing::ctx(tenant, user, Role::Crew);
        let now = time::now();

        let conn = db.conn();
        let store = Store::new(&conn);
        seed_mood_log(&store, tenant, user, now);

        // `since` equal to the row's updated_at: empty delta.
        let changes = collect_server_changes(&store, &ctx, now, now).expect("pull");
        assert!(changes.mood_logs.is_empty());

        // `since` one step earlier: the row appears.
        let earlier = now - chrono::Duration::milliseconds(1);
        let changes = collect_server_changes(&store, &ctx, earlier, now).expect("pull");
        assert_eq!(changes.mood_logs.len(), 1);
        assert_eq!(changes.mood_logs[0].synced_at, now);
    }

    #[test]
    fn crew_pull_is_user_scoped_but_admin_sees_tenant_check_ins() {
        let db = testing::test_db();
        let tenant = testing::seed_tenant(&db, "harborline");
        let crew_a = testing::seed_user(&db, tenant, Role::Crew);
        let crew_b = testing::seed_user(&db, tenant, Role::Crew);
        let admin = testing::seed_user(&db, tenant, Role::Admin);
        let now = time::now();

        let conn = db.conn();
        let store = Store::new(&conn);
        seed_mood_log(&store, tenant, crew_a, now);
        seed_mood_log(&store, tenant, crew_b, now);
        testing::seed_check_in(&store, tenant, crew_a, now);
        testing::seed_check_in(&store, tenant, crew_b, now);

        let ctx = testing::ctx(tenant, crew_a, Role::Crew);
        let changes = collect_server_changes(&store, &ctx, time::epoch(), now).expect("crew pull");
        assert_eq!(changes.mood_logs.len(), 1);
        assert_eq!(changes.mood_logs[0].user_id, crew_a);
        assert_eq!(changes.check_ins.len(), 1);

        let ctx = testing::ctx(tenant, admin, Role::Admin);
        let changes = collect_server_changes(&store, &ctx, time::epoch(), now).expect("admin pull");
        // Admin: own (none) mood logs, but the whole tenant's check-ins.
        assert!(changes.mood_logs.is_empty());
        assert_eq!(changes.check_ins.len(), 2);
    }

    #[test]
    fn deltas_are_ordered_by_updated_at() {
        let db = testing::test_db();
        let tenant = testing::seed_tenant(&db, "harborline");
        let user = testing::seed_user(&db, tenant, Role::Crew);
        let ctx = testing::ctx(tenant, user, Role::Crew);
        let now = time::now();

        let conn = db.conn();
        let store = Store::new(&conn);
        seed_mood_log(&store, tenant, user, now);
        seed_mood_log(&store, tenant, user, now - chrono::Duration::hours(2));
        seed_mood_log(&store, tenant, user, now - chrono::Duration::hours(1));

        let changes = collect_server_changes(&store, &ctx, time::epoch(), now).expect("pull");
        let stamps: Vec<_> = changes.mood_logs.iter().map(|r| r.updated_at).collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
    }
}
