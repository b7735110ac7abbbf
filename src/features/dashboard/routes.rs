use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create dashboard page and JSON routes
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::dashboard_page))
        .route("/refresh", post(handlers::refresh_page))
        // JSON
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/dashboard/groups", get(handlers::get_groups))
        .route("/api/dashboard/legend", get(handlers::get_legend))
        .with_state(dashboard_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{LayersConfig, MapConfig};
    use crate::features::classification::ClassificationService;
    use crate::features::layers::models::{ReferenceLayers, VectorLayer};
    use crate::features::survey::models::SurveyRecord;
    use crate::features::survey::SurveyService;
    use crate::shared::test_helpers::{record, square_feature, SequenceSource};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    async fn server(responses: Vec<Result<Vec<SurveyRecord>, ()>>) -> TestServer {
        let survey = Arc::new(SurveyService::new(Arc::new(SequenceSource::new(responses))));
        survey.refresh().await;

        let layers = Arc::new(ReferenceLayers::new(
            VectorLayer::empty("Southeast Asia Peatland"),
            VectorLayer::new(
                "Protected Areas (2021)",
                vec![square_feature(110.0, -3.0, 1.0, "Taman Nasional")],
            ),
            None,
        ));
        let classification = Arc::new(ClassificationService::new(layers, false));

        let map = MapConfig {
            center_lat: -4.0,
            center_lon: 118.79907798885809,
            zoom: 4,
            tile_url: "https://tiles.example.org/{z}/{x}/{y}.png".to_string(),
        };
        let layers_config = LayersConfig {
            peatland_url: String::new(),
            protected_areas_url: String::new(),
            deforestation_raster_url: String::new(),
            deforestation_wms_url: "https://wms.example.org/wms.py?".to_string(),
            deforestation_wms_layer: "DeforestationYear".to_string(),
            deforestation_classification: false,
        };

        let service = Arc::new(DashboardService::new(survey, classification, &map, &layers_config));
        TestServer::new(routes(service)).unwrap()
    }

    fn sample() -> Vec<SurveyRecord> {
        vec![
            record("1", "kub_tani_jaya", Some("-2.5 110.5")),
            record("2", "kub_jaya_abadi", Some("-2.5 115.0")),
        ]
    }

    #[tokio::test]
    async fn test_page_renders_with_selection() {
        let server = server(vec![Ok(sample())]).await;

        let response = server
            .get("/")
            .add_query_param("groups", "kub_tani_jaya")
            .await;
        response.assert_status_ok();

        let html = response.text();
        assert!(html.contains("Traceability Tool"));
        assert!(html.contains("Farmer ID F-1 is in protected areas!"));
        assert!(html.contains("No survey points in deforested areas."));
        assert!(html.contains("KUB Jaya Abadi"));
        assert!(!html.contains("F-2"));
        assert!(html.contains(r#"name="legend" value="expanded""#));
    }

    #[tokio::test]
    async fn test_page_without_records() {
        let server = server(vec![Err(())]).await;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(response.text().contains("No data available."));
    }

    #[tokio::test]
    async fn test_expanded_legend_lists_categories() {
        let server = server(vec![Ok(sample())]).await;

        let collapsed = server.get("/").await.text();
        assert!(!collapsed.contains("Suaka Margasatwa"));

        let expanded = server
            .get("/")
            .add_query_param("legend", "expanded")
            .await
            .text();
        assert!(expanded.contains("Suaka Margasatwa"));
        assert!(expanded.contains(r#"name="legend" value="collapsed""#));
    }

    #[tokio::test]
    async fn test_refresh_redirects_with_query() {
        let server = server(vec![Ok(sample()), Ok(vec![])]).await;

        let response = server
            .post("/refresh")
            .add_query_param("groups", "kub_tani_jaya")
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/?groups=kub_tani_jaya");

        // Second response from the source is empty
        let body: Value = server.get("/api/dashboard").await.json();
        assert_eq!(body["data"]["state"], "no_data");
    }

    #[tokio::test]
    async fn test_api_dashboard_filters_groups() {
        let server = server(vec![Ok(sample())]).await;

        let body: Value = server
            .get("/api/dashboard")
            .add_query_param("groups", "kub_jaya_abadi")
            .await
            .json();
        assert_eq!(body["data"]["state"], "ready");
        assert_eq!(body["data"]["markers"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["markers"][0]["color"], "black");
        assert_eq!(body["data"]["protected_area_alerts"]["counter"], "0 points");
    }

    #[tokio::test]
    async fn test_api_groups() {
        let server = server(vec![Ok(sample())]).await;

        let body: Value = server.get("/api/dashboard/groups").await.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["label"], "KUB Tani Jaya");
    }

    #[tokio::test]
    async fn test_api_legend() {
        let server = server(vec![Ok(vec![])]).await;

        let body: Value = server
            .get("/api/dashboard/legend")
            .add_query_param("state", "expanded")
            .await
            .json();
        assert_eq!(body["data"]["state"], "expanded");
        assert_eq!(body["data"]["toggled"], "collapsed");

        let response = server
            .get("/api/dashboard/legend")
            .add_query_param("state", "sideways")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
