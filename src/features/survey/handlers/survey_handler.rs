use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::survey::dtos::RefreshResultDto;
use crate::features::survey::models::SurveyRecord;
use crate::features::survey::services::SurveyService;
use crate::shared::types::{ApiResponse, Meta};

/// Re-fetch survey records from the form-collection API
#[utoipa::path(
    post,
    path = "/api/survey/refresh",
    tag = "Survey",
    responses(
        (status = 200, description = "Record set replaced", body = ApiResponse<RefreshResultDto>)
    )
)]
pub async fn refresh_records(
    State(service): State<Arc<SurveyService>>,
) -> Result<Json<ApiResponse<RefreshResultDto>>, AppError> {
    let records = service.refresh().await;
    Ok(Json(ApiResponse::success(
        Some(RefreshResultDto {
            total_records: records.len(),
            refreshed_at: Utc::now(),
        }),
        Some("Survey records refreshed".to_string()),
        None,
    )))
}

/// List the survey records currently held in memory
#[utoipa::path(
    get,
    path = "/api/survey/records",
    tag = "Survey",
    responses(
        (status = 200, description = "Current survey records with every submitted form field")
    )
)]
pub async fn list_records(
    State(service): State<Arc<SurveyService>>,
) -> Result<Json<ApiResponse<Vec<SurveyRecord>>>, AppError> {
    let records = service.snapshot().await;
    let total = records.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(records.as_ref().clone()),
        None,
        Some(Meta { total }),
    )))
}
