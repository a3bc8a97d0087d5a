//! Authentication collaborator: resolves a bearer API key to the trusted
//! `{tenant, user, role}` tuple every sync handler runs under.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use anchorage_api::db as dbq;
use anchorage_api::Role;
use anchorage_sync::{db::Db, AuthContext};

use crate::error::ApiErr;

/// Authenticated user extracted from `Authorization: Bearer <key>`.
pub struct AuthUser {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn context(&self) -> AuthContext {
        AuthContext {
            tenant_id: self.tenant_id,
            user_id: self.user_id,
            role: self.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Db: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Db::from_ref(state);

        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiErr::unauthorized(
                "missing or invalid Authorization header",
            ))?
            .to_string();

        let conn = db.conn();
        let (user_id, tenant_id, role) = conn
            .query_row(dbq::users::BY_API_KEY, [&token], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(|_| ApiErr::unauthorized("invalid API key"))?;

        let user_id = user_id
            .parse()
            .map_err(ApiErr::from_db("auth: malformed user id"))?;
        let tenant_id = tenant_id
            .parse()
            .map_err(ApiErr::from_db("auth: malformed tenant id"))?;
        let role = Role::from_str(&role)
            .ok_or_else(|| ApiErr::internal("internal server error"))?;

        Ok(AuthUser {
            tenant_id,
            user_id,
            role,
        })
    }
}
