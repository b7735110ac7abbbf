use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Load state of one vector overlay
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VectorLayerStatusDto {
    pub slug: String,
    pub name: String,
    pub feature_count: usize,
    /// False when the layer failed to load and an empty placeholder is served
    pub loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LayersStatusDto {
    pub vector_layers: Vec<VectorLayerStatusDto>,
    pub deforestation_classification_enabled: bool,
    pub deforestation_raster_loaded: bool,
    pub deforestation_wms_url: String,
    pub deforestation_wms_layer: String,
}
