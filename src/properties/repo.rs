use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::model::{
    like_pattern, NewProperty, Owner, Property, PropertyOwnerRow, PropertyRow, SearchFilter,
};
use crate::error::AppError;

/// Persistence boundary for listings.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Insert a listing owned by `owner`. An unknown owner yields
    /// [`AppError::Validation`].
    async fn insert(&self, new: NewProperty, owner: Uuid) -> Result<Property, AppError>;
    async fn list(&self) -> Result<Vec<Property>, AppError>;
    /// Listing with owner name, email, role and phone number.
    async fn find_with_owner(&self, id: Uuid) -> Result<Option<Property<Owner>>, AppError>;
    /// Listings of one owner with owner name, email and role.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Property<Owner>>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Property>, AppError>;
}

#[derive(Clone)]
pub struct PgPropertyStore {
    db: PgPool,
}

impl PgPropertyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, images, title, location, description, property, property_type, \
                       bedroom, area, price, negotiable, created_by, created_at, updated_at";

const JOINED_SELECT: &str = r#"
    SELECT p.id, p.images, p.title, p.location, p.description, p.property, p.property_type,
           p.bedroom, p.area, p.price, p.negotiable, p.created_by, p.created_at, p.updated_at,
           u.name AS owner_name, u.email AS owner_email, u.role AS owner_role,
           u.phone_number AS owner_phone_number
    FROM properties p
    JOIN users u ON u.id = p.created_by
"#;

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn insert(&self, new: NewProperty, owner: Uuid) -> Result<Property, AppError> {
        let sql = format!(
            r#"
            INSERT INTO properties
                (images, title, location, description, property, property_type,
                 bedroom, area, price, negotiable, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(&new.images)
            .bind(&new.title)
            .bind(&new.location)
            .bind(&new.description)
            .bind(&new.property)
            .bind(&new.kind)
            .bind(new.bedroom)
            .bind(new.area)
            .bind(new.price)
            .bind(new.negotiable)
            .bind(owner)
            .fetch_one(&self.db)
            .await?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Property>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM properties");
        let rows = sqlx::query_as::<_, PropertyRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Property::from).collect())
    }

    async fn find_with_owner(&self, id: Uuid) -> Result<Option<Property<Owner>>, AppError> {
        let sql = format!("{JOINED_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PropertyOwnerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        row.map(|r| r.into_joined(true).map_err(AppError::Internal))
            .transpose()
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Property<Owner>>, AppError> {
        let sql = format!("{JOINED_SELECT} WHERE p.created_by = $1");
        let rows = sqlx::query_as::<_, PropertyOwnerRow>(&sql)
            .bind(owner)
            .fetch_all(&self.db)
            .await?;
        rows.into_iter()
            .map(|r| r.into_joined(false).map_err(AppError::Internal))
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query(r#"DELETE FROM properties WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Property>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM properties WHERE TRUE"));

        for (column, needle) in [
            ("location", &filter.location),
            ("property_type", &filter.kind),
            ("property", &filter.property),
        ] {
            if let Some(needle) = needle {
                qb.push(format!(" AND {column} ILIKE "))
                    .push_bind(like_pattern(needle));
            }
        }
        if let Some(bedroom) = filter.bedroom {
            qb.push(" AND bedroom = ").push_bind(bedroom);
        }
        if let Some(min) = filter.min_price {
            qb.push(" AND price >= ").push_bind(min);
        }
        if let Some(max) = filter.max_price {
            qb.push(" AND price <= ").push_bind(max);
        }

        let rows = qb.build_query_as::<PropertyRow>().fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Property::from).collect())
    }
}
