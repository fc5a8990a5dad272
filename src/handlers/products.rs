use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use crate::api::format::location_for;
use crate::app::AppState;
use crate::database::models::{Product, ProductRequest};
use crate::error::ApiError;
use crate::middleware::{PathId, ValidatedJson};

pub const ID_MISMATCH: &str = "ID in path and body don't match";

/// GET /api/v1/products - List all products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.service.list().await?;
    Ok(Json(products))
}

/// GET /api/v1/products/:id - Get a single product
pub async fn get(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<Product>, ApiError> {
    let product = state.service.get_by_id(id).await?;
    Ok(Json(product))
}

/// POST /api/v1/products - Create a product; 201 with a Location header
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = request
        .into_data()
        .ok_or_else(|| ApiError::bad_request("Validation failed: price: must not be null"))?;

    let product = state.service.create(data).await?;
    let location = location_for(state.public_base_url.as_deref(), uri.path(), product.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(product)))
}

/// PUT /api/v1/products/:id - Replace every field of an existing product
///
/// A body `id` is optional; when present it must equal the path id.
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<StatusCode, ApiError> {
    if request.id.is_some_and(|body_id| body_id != id) {
        return Err(ApiError::bad_request(ID_MISMATCH));
    }

    let data = request
        .into_data()
        .ok_or_else(|| ApiError::bad_request("Validation failed: price: must not be null"))?;

    state.service.update(id, data).await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/v1/products/:id - Delete an existing product
pub async fn delete(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::OK)
}
