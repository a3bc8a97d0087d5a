//! Per-entity merge: the push half of a sync.
//!
//! Each change is decoded and validated on its own; a malformed change is
//! dropped with a warning and the batch continues. Identity reconciliation
//! is a tenant-scoped lookup on the client-minted id: missing means insert,
//! present means a conditional update that applies only when the payload's
//! ordering key is strictly newer than the stored `updated_at`. A stale
//! payload is silently discarded — the newer server row goes back to the
//! device in the same response's pull and the device converges.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use anchorage_api::{
    ChangeSet, CheckIn, CheckInChange, JournalEntry, JournalEntryChange, MoodLog, MoodLogChange,
    Role,
};

use crate::engine::AuthContext;
use crate::error::Result;
use crate::store::Store;

const MAX_JOURNAL_TITLE_CHARS: usize = 500;
const INTENSITY_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

#[derive(Debug, Default)]
pub(crate) struct MergeOutcome {
    pub applied: usize,
    pub stale: usize,
    pub rejected: usize,
}

impl MergeOutcome {
    fn absorb(&mut self, other: MergeOutcome) {
        self.applied += other.applied;
        self.stale += other.stale;
        self.rejected += other.rejected;
    }
}

pub(crate) fn apply_changes(
    store: &Store<'_>,
    ctx: &AuthContext,
    now: DateTime<Utc>,
    changes: &ChangeSet,
) -> Result<MergeOutcome> {
    let mut outcome = merge_mood_logs(store, ctx, now, &changes.mood_logs)?;
    outcome.absorb(merge_journal_entries(store, ctx, now, &changes.journal_entries)?);
    outcome.absorb(merge_check_ins(store, ctx, now, &changes.check_ins)?);
    Ok(outcome)
}

/// The payload's ordering key for last-write-wins.
fn client_updated_at(updated_at: Option<DateTime<Utc>>, client_created_at: DateTime<Utc>) -> DateTime<Utc> {
    updated_at.unwrap_or(client_created_at)
}

/// Cross-user guard for an existing row. Mood logs and journal entries are
/// strictly user-scoped for every role; check-ins admit admin and
/// psychologist writes tenant-wide (that is how review reaches the row).
fn owned_by_caller(ctx: &AuthContext, owner: Uuid, cross_user_roles_allowed: bool) -> bool {
    owner == ctx.user_id || (cross_user_roles_allowed && ctx.role != Role::Crew)
}

// ── Mood logs ───────────────────────────────────────────────────────────────

fn merge_mood_logs(
    store: &Store<'_>,
    ctx: &AuthContext,
    now: DateTime<Utc>,
    raw: &[serde_json::Value],
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for value in raw {
        let change: MoodLogChange = match serde_json::from_value(value.clone()) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!(entity = "mood_log", error = %e, "rejected malformed change");
                outcome.rejected += 1;
                continue;
            }
        };
        if let Some(intensity) = change.intensity {
            if !INTENSITY_RANGE.contains(&intensity) {
                tracing::warn!(entity = "mood_log", id = %change.id, "rejected: intensity out of range");
                outcome.rejected += 1;
                continue;
            }
        }

        match store.find_mood_log(ctx.tenant_id, change.id)? {
            None => {
                store.insert_mood_log(&mood_log_insert(ctx, now, &change))?;
                outcome.applied += 1;
            }
            Some(existing) => {
                if !owned_by_caller(ctx, existing.user_id, false) {
                    tracing::warn!(entity = "mood_log", id = %change.id, "dropped cross-user push");
                    outcome.rejected += 1;
                    continue;
                }
                let key = client_updated_at(change.updated_at, change.client_created_at);
                if store.update_mood_log_if_newer(ctx.tenant_id, &change, key, now)? {
                    outcome.applied += 1;
                } else {
                    outcome.stale += 1;
                }
            }
        }
    }

    Ok(outcome)
}

fn mood_log_insert(ctx: &AuthContext, now: DateTime<Utc>, change: &MoodLogChange) -> MoodLog {
    MoodLog {
        id: change.id,
        tenant_id: ctx.tenant_id,
        user_id: ctx.user_id,
        mood: change.mood,
        intensity: change.intensity,
        notes: change.notes.clone(),
        client_created_at: change.client_created_at,
        created_at: now,
        updated_at: now,
        synced_at: now,
        is_deleted: change.is_deleted,
    }
}

// ── Journal entries ─────────────────────────────────────────────────────────

fn merge_journal_entries(
    store: &Store<'_>,
    ctx: &AuthContext,
    now: DateTime<Utc>,
    raw: &[serde_json::Value],
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for value in raw {
        let change: JournalEntryChange = match serde_json::from_value(value.clone()) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!(entity = "journal_entry", error = %e, "rejected malformed change");
                outcome.rejected += 1;
                continue;
            }
        };
        if let Some(ref title) = change.title {
            if title.chars().count() > MAX_JOURNAL_TITLE_CHARS {
                tracing::warn!(entity = "journal_entry", id = %change.id, "rejected: title too long");
                outcome.rejected += 1;
                continue;
            }
        }

        match store.find_journal_entry(ctx.tenant_id, change.id)? {
            None => {
                store.insert_journal_entry(&journal_entry_insert(ctx, now, &change))?;
                outcome.applied += 1;
            }
            Some(existing) => {
                if !owned_by_caller(ctx, existing.user_id, false) {
                    tracing::warn!(entity = "journal_entry", id = %change.id, "dropped cross-user push");
                    outcome.rejected += 1;
                    continue;
                }
                let key = client_updated_at(change.updated_at, change.client_created_at);
                if store.update_journal_entry_if_newer(ctx.tenant_id, &change, key, now)? {
                    outcome.applied += 1;
                } else {
                    outcome.stale += 1;
                }
            }
        }
    }

    Ok(outcome)
}

fn journal_entry_insert(
    ctx: &AuthContext,
    now: DateTime<Utc>,
    change: &JournalEntryChange,
) -> JournalEntry {
    JournalEntry {
        id: change.id,
        tenant_id: ctx.tenant_id,
        user_id: ctx.user_id,
        title: change.title.clone(),
        content: change.content.clone(),
        mood: change.mood,
        is_private: change.is_private,
        client_created_at: change.client_created_at,
        created_at: now,
        updated_at: now,
        synced_at: now,
        is_deleted: change.is_deleted,
    }
}

// ── Check-ins ───────────────────────────────────────────────────────────────

fn merge_check_ins(
    store: &Store<'_>,
    ctx: &AuthContext,
    now: DateTime<Utc>,
    raw: &[serde_json::Value],
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();
    let include_review = ctx.role == Role::Psychologist;

    for value in raw {
        let change: CheckInChange = match serde_json::from_value(value.clone()) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!(entity = "check_in", error = %e, "rejected malformed change");
                outcome.rejected += 1;
                continue;
            }
        };

        match store.find_check_in(ctx.tenant_id, change.id)? {
            None => {
                store.insert_check_in(&check_in_insert(ctx, now, &change, include_review))?;
                outcome.applied += 1;
            }
            Some(existing) => {
                if !owned_by_caller(ctx, existing.user_id, true) {
                    tracing::warn!(entity = "check_in", id = %change.id, "dropped cross-user push");
                    outcome.rejected += 1;
                    continue;
                }
                let key = client_updated_at(change.updated_at, change.client_created_at);
                if store.update_check_in_if_newer(ctx.tenant_id, &change, include_review, key, now)?
                {
                    outcome.applied += 1;
                } else {
                    outcome.stale += 1;
                }
            }
        }
    }

    Ok(outcome)
}

fn check_in_insert(
    ctx: &AuthContext,
    now: DateTime<Utc>,
    change: &CheckInChange,
    include_review: bool,
) -> CheckIn {
    CheckIn {
        id: change.id,
        tenant_id: ctx.tenant_id,
        user_id: ctx.user_id,
        scheduled_for: change.scheduled_for,
        completed_at: change.completed_at,
        mood: change.mood,
        responses: change.responses.clone(),
        // Review fields only land from psychologists.
        needs_attention: include_review && change.needs_attention,
        reviewed_by: if include_review { change.reviewed_by } else { None },
        reviewed_at: if include_review { change.reviewed_at } else { None },
        review_notes: if include_review {
            change.review_notes.clone()
        } else {
            None
        },
        client_created_at: change.client_created_at,
        created_at: now,
        updated_at: now,
        synced_at: now,
        is_deleted: change.is_deleted,
    }
}
