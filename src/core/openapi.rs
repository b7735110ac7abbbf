use utoipa::{Modify, OpenApi};

use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::layers::{dtos as layers_dtos, handlers as layers_handlers};
use crate::features::survey::{dtos as survey_dtos, handlers as survey_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Dashboard
        dashboard_handlers::get_dashboard,
        dashboard_handlers::get_groups,
        dashboard_handlers::get_legend,
        // Survey
        survey_handlers::refresh_records,
        survey_handlers::list_records,
        // Layers
        layers_handlers::get_layer,
        layers_handlers::get_layers_status,
    ),
    components(
        schemas(
            Meta,
            // Dashboard
            dashboard_dtos::DashboardState,
            dashboard_dtos::LegendState,
            dashboard_dtos::MarkerDto,
            dashboard_dtos::HouseholdItemDto,
            dashboard_dtos::HouseholdListDto,
            dashboard_dtos::AlertItemDto,
            dashboard_dtos::AlertListDto,
            dashboard_dtos::IndicatorDto,
            dashboard_dtos::ChartSliceDto,
            dashboard_dtos::ChartDto,
            dashboard_dtos::DashboardViewDto,
            dashboard_dtos::GroupOptionDto,
            dashboard_dtos::LegendItemDto,
            dashboard_dtos::LegendSectionDto,
            dashboard_dtos::LegendDto,
            ApiResponse<dashboard_dtos::DashboardViewDto>,
            ApiResponse<Vec<dashboard_dtos::GroupOptionDto>>,
            ApiResponse<dashboard_dtos::LegendDto>,
            // Survey
            survey_dtos::RefreshResultDto,
            ApiResponse<survey_dtos::RefreshResultDto>,
            // Layers
            layers_dtos::VectorLayerStatusDto,
            layers_dtos::LayersStatusDto,
            ApiResponse<layers_dtos::LayersStatusDto>,
        )
    ),
    tags(
        (name = "Dashboard", description = "Render outputs of the traceability dashboard"),
        (name = "Survey", description = "Farm survey records from the form-collection API"),
        (name = "Layers", description = "Peatland and protected-area reference layers"),
    ),
    info(
        title = "Traceability Dashboard API",
        version = "0.1.0",
        description = "API documentation for the farm-survey traceability dashboard",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_feature_paths() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Traceability".to_string(),
            version: "1.2.3".to_string(),
            description: "Docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Traceability");
        for path in ["/api/dashboard", "/api/survey/refresh", "/api/layers/{name}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let dashboard = doc.paths.paths["/api/dashboard"].get.as_ref().unwrap();
        let params: Vec<&str> = dashboard
            .parameters
            .iter()
            .flatten()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(params, vec!["groups", "legend"]);
    }
}
