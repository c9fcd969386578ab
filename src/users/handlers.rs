use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    model::PublicUser,
    services,
};
use crate::{
    auth::{AdminOnly, Authorized, JwtKeys},
    dto::MessageResponse,
    error::AppError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users", get(list_users))
        .route("/:id", delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    services::register(state.users.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let (token, role) = services::login(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        role,
    }))
}

#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: Authorized<AdminOnly>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    Ok(Json(services::list_users(state.users.as_ref()).await?))
}

#[instrument(skip(state, _admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: Authorized<AdminOnly>,
    id: Result<Path<Uuid>, axum::extract::rejection::PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    services::delete_user(state.users.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
