use axum::{
    extract::{Query, RawQuery, State},
    response::{Html, Redirect},
    Json,
};
use minijinja::context;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::{legend, DashboardService};
use crate::shared::templates::{render_template, script_json};
use crate::shared::types::{ApiResponse, Meta};

// ============================================================================
// Page
// ============================================================================

/// Server-rendered dashboard page
pub async fn dashboard_page(
    State(service): State<Arc<DashboardService>>,
    Query(pairs): Query<Vec<(String, String)>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Html<String>, AppError> {
    let query = DashboardQuery::from_pairs(&pairs);

    let view = service.view(&query.groups).await;
    let groups = service.group_options(&query.groups).await;
    let legend = legend(query.legend);

    let html = render_template(
        "dashboard/index.html",
        context! {
            view => &view,
            groups => &groups,
            legend => &legend,
            query => raw_query.unwrap_or_default(),
            map_json => script_json(service.map_settings())?,
            markers_json => script_json(&view.markers)?,
            charts_json => script_json(&view.charts)?,
        },
    )?;

    Ok(Html(html))
}

/// Re-fetch records, then return to the page with the same selection
pub async fn refresh_page(
    State(service): State<Arc<DashboardService>>,
    RawQuery(raw_query): RawQuery,
) -> Redirect {
    let total = service.refresh().await;
    tracing::info!("Dashboard refresh loaded {} survey records", total);

    match raw_query.filter(|q| !q.is_empty()) {
        Some(q) => Redirect::to(&format!("/?{}", q)),
        None => Redirect::to("/"),
    }
}

// ============================================================================
// JSON API
// ============================================================================

/// Get the dashboard render outputs for a group selection
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(
        ("groups" = Option<String>, Query, description = "Group code to include; repeat the parameter or separate codes with commas"),
        ("legend" = Option<String>, Query, description = "Legend state: `collapsed` (default) or `expanded`"),
    ),
    responses(
        (status = 200, description = "Markers, lists, indicators and charts", body = ApiResponse<DashboardViewDto>)
    )
)]
pub async fn get_dashboard(
    State(service): State<Arc<DashboardService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<DashboardViewDto>>, AppError> {
    let query = DashboardQuery::from_pairs(&pairs);
    let view = service.view(&query.groups).await;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// List the farmer group checklist options
#[utoipa::path(
    get,
    path = "/api/dashboard/groups",
    tag = "Dashboard",
    params(
        ("groups" = Option<String>, Query, description = "Group codes to mark as selected"),
    ),
    responses(
        (status = 200, description = "Distinct groups in first-seen order", body = ApiResponse<Vec<GroupOptionDto>>)
    )
)]
pub async fn get_groups(
    State(service): State<Arc<DashboardService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<GroupOptionDto>>>, AppError> {
    let query = DashboardQuery::from_pairs(&pairs);
    let options = service.group_options(&query.groups).await;
    let total = options.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(options),
        None,
        Some(Meta { total }),
    )))
}

/// Get the map legend for a state, including the state its toggle leads to
#[utoipa::path(
    get,
    path = "/api/dashboard/legend",
    tag = "Dashboard",
    params(LegendQueryParams),
    responses(
        (status = 200, description = "Legend sections", body = ApiResponse<LegendDto>),
        (status = 400, description = "Unknown legend state")
    )
)]
pub async fn get_legend(
    Query(params): Query<LegendQueryParams>,
) -> Result<Json<ApiResponse<LegendDto>>, AppError> {
    let state = match params.state.as_deref() {
        None | Some("") => LegendState::default(),
        Some(raw) => LegendState::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown legend state '{}', expected collapsed or expanded",
                raw
            ))
        })?,
    };

    Ok(Json(ApiResponse::success(Some(legend(state)), None, None)))
}
