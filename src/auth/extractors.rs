use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::{error::AppError, users::model::Role};

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

/// Access rule evaluated once per request by [`Authorized`].
pub trait Policy: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn denied_message() -> &'static str;
}

/// Any authenticated caller.
pub struct AnyRole;

impl Policy for AnyRole {
    fn allows(_: Role) -> bool {
        true
    }
    fn denied_message() -> &'static str {
        "Access denied"
    }
}

/// Callers holding the `admin` role.
pub struct AdminOnly;

impl Policy for AdminOnly {
    fn allows(role: Role) -> bool {
        role.is_admin()
    }
    fn denied_message() -> &'static str {
        "Admin role required"
    }
}

/// Verifies `Authorization: Bearer <token>` and applies `P`.
///
/// Missing or invalid tokens reject with 401, a valid token whose role the
/// policy refuses rejects with 403.
pub struct Authorized<P: Policy = AnyRole>(pub Principal, PhantomData<P>);

impl<P: Policy> Authorized<P> {
    pub fn principal(&self) -> Principal {
        self.0
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".into()))?;

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Invalid Authorization header".into()))
}

#[async_trait]
impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    P: Policy,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!("invalid or expired token");
            e
        })?;

        let principal = Principal {
            user_id: claims.user_id,
            role: claims.role,
        };

        if !P::allows(principal.role) {
            warn!(user_id = %principal.user_id, role = %principal.role, "role not permitted");
            return Err(AppError::Forbidden(P::denied_message().into()));
        }

        debug!(user_id = %principal.user_id, role = %principal.role, "authorized");
        Ok(Authorized(principal, PhantomData))
    }
}
