pub mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use model::{PublicUser, Role, User};
pub use repo::{PgUserStore, UserStore};

/// Routes mounted under `/api/users`.
pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
