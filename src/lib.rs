pub mod app;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod properties;
pub mod state;
pub mod users;

pub use app::build_app;
pub use error::AppError;
pub use state::AppState;
