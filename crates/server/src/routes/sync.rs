use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use anchorage_api::{SyncFailure, SyncStatusResponse};
use anchorage_sync::{db::Db, device_status, parse_envelope, run_sync, SyncError};

use crate::error::ApiErr;
use crate::routes::auth::AuthUser;

/// `POST /api/sync` — one bidirectional sync cycle.
///
/// Every failure maps to the single external shape
/// `{"success": false, "error": "<short message>"}`: 400 for envelope
/// problems, 500 for store problems (detail goes to the log, never to the
/// client).
pub async fn sync(
    State(db): State<Db>,
    user: AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let ctx = user.context();

    let req = match parse_envelope(body) {
        Ok(req) => req,
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match run_sync(&db, &ctx, req) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e @ SyncError::InvalidEnvelope(_)) => {
            failure(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(SyncError::Store(e)) => {
            tracing::error!("sync transaction aborted: {e}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "sync failed".to_string(),
            )
        }
    }
}

fn failure(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(SyncFailure {
            success: false,
            error,
        }),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "deviceId", alias = "device_id")]
    pub device_id: String,
}

/// `GET /api/sync/status?deviceId=<uuid>` — cursor rows for the caller's
/// device.
pub async fn status(
    State(db): State<Db>,
    user: AuthUser,
    Query(q): Query<StatusQuery>,
) -> Result<Json<SyncStatusResponse>, ApiErr> {
    let device_id = q
        .device_id
        .parse()
        .map_err(|_| ApiErr::bad_request("deviceId must be a UUID"))?;

    let cursors = device_status(&db, &user.context(), device_id)
        .map_err(ApiErr::from_db("sync status"))?;

    Ok(Json(SyncStatusResponse { device_id, cursors }))
}
