use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::layers::handlers;
use crate::features::layers::services::LayerService;

/// Create reference layer routes
pub fn routes(layer_service: Arc<LayerService>) -> Router {
    Router::new()
        .route("/api/layers/status", get(handlers::get_layers_status))
        .route("/api/layers/{name}", get(handlers::get_layer))
        .with_state(layer_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LayersConfig;
    use crate::features::layers::models::{ReferenceLayers, VectorLayer};
    use crate::shared::test_helpers::square_feature;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let layers = ReferenceLayers::new(
            VectorLayer::empty("Southeast Asia Peatland"),
            VectorLayer::new(
                "Protected Areas (2021)",
                vec![square_feature(110.0, -3.0, 1.0, "Taman Nasional")],
            ),
            None,
        );
        let config = LayersConfig {
            peatland_url: String::new(),
            protected_areas_url: String::new(),
            deforestation_raster_url: String::new(),
            deforestation_wms_url: String::new(),
            deforestation_wms_layer: String::new(),
            deforestation_classification: false,
        };
        let service = Arc::new(LayerService::new(Arc::new(layers), config));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_get_protected_areas() {
        let response = server().get("/api/layers/protected-areas").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["type"], "FeatureCollection");
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(
            body["data"]["features"][0]["properties"]["style"]["fillColor"],
            "#31572080"
        );
    }

    #[tokio::test]
    async fn test_unknown_layer_is_not_found() {
        let response = server().get("/api/layers/rivers").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_status() {
        let response = server().get("/api/layers/status").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["vector_layers"][0]["loaded"], false);
        assert_eq!(body["data"]["vector_layers"][1]["feature_count"], 1);
    }
}
