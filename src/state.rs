use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::properties::{PgPropertyStore, PropertyStore};
use crate::users::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub properties: Arc<dyn PropertyStore>,
}

impl AppState {
    /// Connect to Postgres and wire the SQL-backed stores. The pool is
    /// returned too so the caller can run migrations against it.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let state = Self::from_parts(
            Arc::new(config),
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgPropertyStore::new(db.clone())),
        );
        Ok((state, db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        properties: Arc<dyn PropertyStore>,
    ) -> Self {
        Self {
            config,
            users,
            properties,
        }
    }
}
