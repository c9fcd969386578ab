use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{NewUser, User, UserRow};
use crate::error::AppError;

/// Persistence boundary for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A duplicate email yields [`AppError::Conflict`].
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    /// Returns `false` when no user had this id. Owned properties go with it.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_user(row: UserRow) -> Result<User, AppError> {
    User::try_from(row).map_err(AppError::Internal)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, phone_number, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, phone_number, role, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone_number)
        .bind(user.role.as_str())
        .fetch_one(&self.db)
        .await?;
        into_user(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, phone_number, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, phone_number, role, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_user).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
