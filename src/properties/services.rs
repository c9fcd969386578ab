use std::str::FromStr;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreatePropertyRequest, SearchQuery},
    model::{NewProperty, Owner, Property, SearchFilter},
    repo::PropertyStore,
};
use crate::error::AppError;

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    let trimmed = required(value, field)?.trim().to_string();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn non_negative(value: f64, field: &str) -> Result<f64, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!("{field} must be a non-negative number")));
    }
    Ok(value)
}

impl TryFrom<CreatePropertyRequest> for NewProperty {
    type Error = AppError;

    fn try_from(req: CreatePropertyRequest) -> Result<Self, Self::Error> {
        let images = required(req.images, "images")?;
        if images.is_empty() {
            return Err(AppError::Validation("images must not be empty".into()));
        }
        let bedroom = required(req.bedroom, "bedroom")?;
        if bedroom < 0 {
            return Err(AppError::Validation("bedroom must not be negative".into()));
        }

        Ok(NewProperty {
            images,
            title: required_text(req.title, "title")?,
            location: required_text(req.location, "location")?,
            description: required_text(req.description, "description")?,
            property: required_text(req.property, "property")?,
            kind: required_text(req.kind, "type")?,
            bedroom,
            area: non_negative(required(req.area, "area")?, "area")?,
            price: non_negative(required(req.price, "price")?, "price")?,
            negotiable: req.negotiable.unwrap_or(false),
        })
    }
}

fn text_param(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn numeric_param<T: FromStr>(value: Option<String>, field: &str) -> Result<Option<T>, AppError> {
    text_param(value)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| AppError::Validation(format!("{field} must be a number")))
        })
        .transpose()
}

fn price_param(value: Option<String>, field: &str) -> Result<Option<f64>, AppError> {
    match numeric_param::<f64>(value, field)? {
        Some(v) if !v.is_finite() => {
            Err(AppError::Validation(format!("{field} must be a finite number")))
        }
        other => Ok(other),
    }
}

impl TryFrom<SearchQuery> for SearchFilter {
    type Error = AppError;

    fn try_from(q: SearchQuery) -> Result<Self, Self::Error> {
        Ok(SearchFilter {
            location: text_param(q.location),
            kind: text_param(q.kind),
            property: text_param(q.property),
            bedroom: numeric_param(q.bedroom, "bedroom")?,
            min_price: price_param(q.min_price, "minPrice")?,
            max_price: price_param(q.max_price, "maxPrice")?,
        })
    }
}

#[instrument(skip(store, req))]
pub async fn create_property(
    store: &dyn PropertyStore,
    owner: Uuid,
    req: CreatePropertyRequest,
) -> Result<Property, AppError> {
    let new = NewProperty::try_from(req).map_err(|e| {
        warn!(error = %e, "invalid property");
        e
    })?;
    let property = store.insert(new, owner).await?;
    info!(property_id = %property.id, %owner, "property created");
    Ok(property)
}

pub async fn list_properties(store: &dyn PropertyStore) -> Result<Vec<Property>, AppError> {
    store.list().await
}

pub async fn get_property(store: &dyn PropertyStore, id: Uuid) -> Result<Property<Owner>, AppError> {
    store
        .find_with_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))
}

pub async fn list_owner_properties(
    store: &dyn PropertyStore,
    owner: Uuid,
) -> Result<Vec<Property<Owner>>, AppError> {
    store.list_by_owner(owner).await
}

#[instrument(skip(store))]
pub async fn delete_property(store: &dyn PropertyStore, id: Uuid) -> Result<(), AppError> {
    if !store.delete(id).await? {
        return Err(AppError::NotFound("Property not found".into()));
    }
    info!(property_id = %id, "property deleted");
    Ok(())
}

#[instrument(skip(store))]
pub async fn search_properties(
    store: &dyn PropertyStore,
    query: SearchQuery,
) -> Result<Vec<Property>, AppError> {
    let filter = SearchFilter::try_from(query)?;
    store.search(&filter).await
}
