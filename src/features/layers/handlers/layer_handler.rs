use axum::{
    extract::{Path, State},
    Json,
};
use geojson::FeatureCollection;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::layers::dtos::LayersStatusDto;
use crate::features::layers::models::LayerKind;
use crate::features::layers::services::LayerService;
use crate::shared::types::{ApiResponse, Meta};

/// Get an overlay layer as GeoJSON
#[utoipa::path(
    get,
    path = "/api/layers/{name}",
    tag = "Layers",
    params(
        ("name" = String, Path, description = "Layer slug: peatland or protected-areas")
    ),
    responses(
        (status = 200, description = "FeatureCollection with popup_html and style properties"),
        (status = 404, description = "Unknown layer")
    )
)]
pub async fn get_layer(
    State(service): State<Arc<LayerService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<FeatureCollection>>, AppError> {
    let kind = LayerKind::from_slug(&name)
        .ok_or_else(|| AppError::NotFound(format!("Layer '{}' not found", name)))?;

    let collection = service.feature_collection(kind);
    let total = collection.features.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(collection),
        None,
        Some(Meta { total }),
    )))
}

/// Report which reference layers loaded
#[utoipa::path(
    get,
    path = "/api/layers/status",
    tag = "Layers",
    responses(
        (status = 200, description = "Reference layer load status", body = ApiResponse<LayersStatusDto>)
    )
)]
pub async fn get_layers_status(
    State(service): State<Arc<LayerService>>,
) -> Result<Json<ApiResponse<LayersStatusDto>>, AppError> {
    Ok(Json(ApiResponse::success(Some(service.status()), None, None)))
}
