use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreatePropertyRequest, SearchQuery},
    model::{Owner, Property},
    services,
};
use crate::{
    auth::{AdminOnly, AnyRole, Authorized},
    dto::MessageResponse,
    error::AppError,
    state::AppState,
};

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/Properties", get(list_properties).post(create_property))
        .route(
            "/Properties/:id",
            get(get_property).delete(delete_property),
        )
        .route("/Properties/user/:user_id", get(list_owner_properties))
        .route("/search", get(search_properties))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_property(
    State(state): State<AppState>,
    auth: Authorized<AnyRole>,
    payload: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Property>), AppError> {
    let Json(payload) = payload?;
    let owner = auth.principal().user_id;
    let property = services::create_property(state.properties.as_ref(), owner, payload).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) =
        HeaderValue::from_str(&format!("/api/properties/Properties/{}", property.id))
    {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(property)))
}

#[instrument(skip(state))]
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Property>>, AppError> {
    Ok(Json(services::list_properties(state.properties.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn get_property(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Property<Owner>>, AppError> {
    let Path(id) = id?;
    Ok(Json(services::get_property(state.properties.as_ref(), id).await?))
}

#[instrument(skip(state, _admin))]
pub async fn list_owner_properties(
    State(state): State<AppState>,
    _admin: Authorized<AdminOnly>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Property<Owner>>>, AppError> {
    let Path(user_id) = user_id?;
    Ok(Json(
        services::list_owner_properties(state.properties.as_ref(), user_id).await?,
    ))
}

#[instrument(skip(state, _admin))]
pub async fn delete_property(
    State(state): State<AppState>,
    _admin: Authorized<AdminOnly>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    services::delete_property(state.properties.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Property deleted successfully",
    }))
}

#[instrument(skip(state))]
pub async fn search_properties(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Property>>, AppError> {
    let Query(query) = query?;
    Ok(Json(
        services::search_properties(state.properties.as_ref(), query).await?,
    ))
}
