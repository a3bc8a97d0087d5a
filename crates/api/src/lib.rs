//! Shared wire types and SQL builders for the anchorage sync platform.
//!
//! This crate is the single source of truth for the sync protocol's
//! request/response types, the entity envelopes, and the query builders the
//! store executes. The Axum server and the sync core both import from here.
//!
//! Wire JSON uses camelCase keys. Change payloads additionally accept the
//! snake_case field names older device builds send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod db;

// ─── Shared enums ────────────────────────────────────────────────────────────

/// Caller role attached by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Crew,
    Admin,
    Psychologist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crew => "crew",
            Self::Admin => "admin",
            Self::Psychologist => "psychologist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "crew" => Some(Self::Crew),
            "admin" => Some(Self::Admin),
            "psychologist" => Some(Self::Psychologist),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed mood vocabulary shared by all three syncable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Bad => "bad",
            Self::Terrible => "terrible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "great" => Some(Self::Great),
            "good" => Some(Self::Good),
            "okay" => Some(Self::Okay),
            "bad" => Some(Self::Bad),
            "terrible" => Some(Self::Terrible),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content types in the resource library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Article,
    Video,
    Exercise,
    Audio,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Video => "video",
            Self::Exercise => "exercise",
            Self::Audio => "audio",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "article" => Some(Self::Article),
            "video" => Some(Self::Video),
            "exercise" => Some(Self::Exercise),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The replicated entity families, as keyed in `sync_cursors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEntity {
    MoodLog,
    JournalEntry,
    CheckIn,
    Resource,
}

impl SyncEntity {
    pub const ALL: [SyncEntity; 4] = [
        Self::MoodLog,
        Self::JournalEntry,
        Self::CheckIn,
        Self::Resource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoodLog => "mood_log",
            Self::JournalEntry => "journal_entry",
            Self::CheckIn => "check_in",
            Self::Resource => "resource",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mood_log" => Some(Self::MoodLog),
            "journal_entry" => Some(Self::JournalEntry),
            "check_in" => Some(Self::CheckIn),
            "resource" => Some(Self::Resource),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Entity envelopes ────────────────────────────────────────────────────────

/// A single mood rating captured on a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub mood: Mood,
    pub intensity: Option<i64>,
    pub notes: Option<String>,
    pub client_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<Mood>,
    pub is_private: bool,
    pub client_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// A scheduled well-being check-in. Review fields are written only by
/// psychologists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub mood: Option<Mood>,
    /// Free-form structured answers, stored as JSON.
    pub responses: Option<serde_json::Value>,
    pub needs_attention: bool,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub client_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Read-only content library row. `tenant_id: None` means global.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub content: Option<String>,
    pub is_published: bool,
    pub offline_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replication progress for one `{tenant, user, device, entity}`.
///
/// `last_record_id` and `sync_cursor` are forward-compatibility hooks;
/// nothing writes them yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCursor {
    pub entity: SyncEntity,
    pub last_synced_at: DateTime<Utc>,
    pub last_record_id: Option<Uuid>,
    pub sync_cursor: Option<String>,
}

// ─── Change payloads (push) ──────────────────────────────────────────────────

/// A pushed mood-log state. The payload is the full record as the device
/// sees it; identity and ownership fields are supplied by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogChange {
    pub id: Uuid,
    pub mood: Mood,
    #[serde(default)]
    pub intensity: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(alias = "client_created_at")]
    pub client_created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "is_deleted")]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryChange {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default = "default_true", alias = "is_private")]
    pub is_private: bool,
    #[serde(alias = "client_created_at")]
    pub client_created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "is_deleted")]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInChange {
    pub id: Uuid,
    #[serde(alias = "scheduled_for")]
    pub scheduled_for: DateTime<Utc>,
    #[serde(default, alias = "completed_at")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub responses: Option<serde_json::Value>,
    #[serde(default, alias = "needs_attention")]
    pub needs_attention: bool,
    #[serde(default, alias = "reviewed_by")]
    pub reviewed_by: Option<Uuid>,
    #[serde(default, alias = "reviewed_at")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "review_notes")]
    pub review_notes: Option<String>,
    #[serde(alias = "client_created_at")]
    pub client_created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "is_deleted")]
    pub is_deleted: bool,
}

fn default_true() -> bool {
    true
}

// ─── Sync protocol ───────────────────────────────────────────────────────────

/// Request body for `POST /api/sync`.
///
/// The per-entity change arrays stay raw JSON here: each element is decoded
/// and validated individually by the merge engine so one malformed change
/// never aborts the batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(alias = "device_id")]
    pub device_id: String,
    #[serde(default, alias = "last_sync_at")]
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub changes: ChangeSet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    #[serde(default, alias = "mood_logs")]
    pub mood_logs: Vec<serde_json::Value>,
    #[serde(default, alias = "journal_entries")]
    pub journal_entries: Vec<serde_json::Value>,
    #[serde(default, alias = "check_ins")]
    pub check_ins: Vec<serde_json::Value>,
}

impl ChangeSet {
    pub fn len(&self) -> usize {
        self.mood_logs.len() + self.journal_entries.len() + self.check_ins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response body for `POST /api/sync`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub server_changes: ServerChanges,
    /// Always empty: a push dropped for being stale is superseded by the
    /// newer server row in `server_changes`, and the client converges.
    pub conflicts: Vec<serde_json::Value>,
    pub last_sync_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerChanges {
    pub mood_logs: Vec<MoodLog>,
    pub journal_entries: Vec<JournalEntry>,
    pub check_ins: Vec<CheckIn>,
    pub resources: Vec<Resource>,
}

/// The single external failure shape for the sync endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncFailure {
    pub success: bool,
    pub error: String,
}

/// Response body for `GET /api/sync/status`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub device_id: Uuid,
    pub cursors: Vec<SyncCursor>,
}

// ─── Health ──────────────────────────────────────────────────────────────────

/// Returned by `GET /api/health` — server liveness check.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
