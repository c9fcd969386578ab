pub mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use model::{Owner, Property, SearchFilter};
pub use repo::{PgPropertyStore, PropertyStore};

/// Routes mounted under `/api/properties`.
pub fn router() -> Router<AppState> {
    handlers::property_routes()
}
