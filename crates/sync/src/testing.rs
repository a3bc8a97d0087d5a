//! Shared test fixtures: an in-memory database with the real migrations and
//! seed helpers for tenants, users, resources, and check-ins.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use anchorage_api::db as dbq;
use anchorage_api::{CheckIn, Role};

use crate::db::{self, Db};
use crate::engine::AuthContext;
use crate::store::{sq_execute, Store};
use crate::time;

pub fn test_db() -> Db {
    db::init_db_in_memory().expect("in-memory database")
}

pub fn ctx(tenant_id: Uuid, user_id: Uuid, role: Role) -> AuthContext {
    AuthContext {
        tenant_id,
        user_id,
        role,
    }
}

pub fn seed_tenant(db: &Db, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    db.conn()
        .execute(
            "INSERT INTO tenants (id, name) VALUES (?1, ?2)",
            params![id.to_string(), name],
        )
        .expect("seed tenant");
    id
}

pub fn seed_user(db: &Db, tenant_id: Uuid, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    db.conn()
        .execute(
            "INSERT INTO users (id, tenant_id, role, api_key) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                tenant_id.to_string(),
                role.as_str(),
                api_key_for(id)
            ],
        )
        .expect("seed user");
    id
}

/// Deterministic per-user API key, for exercising the auth collaborator.
pub fn api_key_for(user_id: Uuid) -> String {
    format!("ak_{user_id}")
}

pub fn seed_resource(db: &Db, tenant_id: Option<Uuid>, title: &str, published: bool) -> Uuid {
    let id = Uuid::new_v4();
    let now = time::fmt(&time::now());
    let tenant = tenant_id.map(|t| t.to_string());
    let conn = db.conn();
    sq_execute(
        &conn,
        dbq::resources::insert(&dbq::resources::InsertParams {
            id: &id.to_string(),
            tenant_id: tenant.as_deref(),
            title,
            description: Some("seeded"),
            resource_type: "article",
            category: Some("wellbeing"),
            tags: "wellbeing,offline",
            content: Some("…"),
            is_published: published,
            offline_available: true,
            now: &now,
        }),
    )
    .expect("seed resource");
    id
}

pub fn seed_check_in(store: &Store<'_>, tenant: Uuid, user: Uuid, at: DateTime<Utc>) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_check_in(&CheckIn {
            id,
            tenant_id: tenant,
            user_id: user,
            scheduled_for: at,
            completed_at: None,
            mood: None,
            responses: None,
            needs_attention: false,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            client_created_at: at,
            created_at: at,
            updated_at: at,
            synced_at: at,
            is_deleted: false,
        })
        .expect("seed check-in");
    id
}
