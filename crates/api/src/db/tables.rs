//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden)]
pub enum Tenants {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    TenantId,
    DisplayName,
    Role,
    ApiKey,
    CreatedAt,
}

#[derive(Iden)]
pub enum MoodLogs {
    Table,
    Id,
    TenantId,
    UserId,
    Mood,
    Intensity,
    Notes,
    ClientCreatedAt,
    CreatedAt,
    UpdatedAt,
    SyncedAt,
    IsDeleted,
}

#[derive(Iden)]
pub enum JournalEntries {
    Table,
    Id,
    TenantId,
    UserId,
    Title,
    Content,
    Mood,
    IsPrivate,
    ClientCreatedAt,
    CreatedAt,
    UpdatedAt,
    SyncedAt,
    IsDeleted,
}

#[derive(Iden)]
pub enum CheckIns {
    Table,
    Id,
    TenantId,
    UserId,
    ScheduledFor,
    CompletedAt,
    Mood,
    Responses,
    NeedsAttention,
    ReviewedBy,
    ReviewedAt,
    ReviewNotes,
    ClientCreatedAt,
    CreatedAt,
    UpdatedAt,
    SyncedAt,
    IsDeleted,
}

#[derive(Iden)]
pub enum Resources {
    Table,
    Id,
    TenantId,
    Title,
    Description,
    ResourceType,
    Category,
    Tags,
    Content,
    IsPublished,
    OfflineAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum SyncCursors {
    Table,
    TenantId,
    UserId,
    DeviceId,
    Entity,
    LastSyncedAt,
    LastRecordId,
    SyncCursor,
}
