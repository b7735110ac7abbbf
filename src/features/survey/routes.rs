use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::survey::handlers;
use crate::features::survey::services::SurveyService;

/// Create survey record routes
pub fn routes(survey_service: Arc<SurveyService>) -> Router {
    Router::new()
        .route("/api/survey/refresh", post(handlers::refresh_records))
        .route("/api/survey/records", get(handlers::list_records))
        .with_state(survey_service)
}
