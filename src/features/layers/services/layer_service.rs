use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::core::config::LayersConfig;
use crate::features::layers::dtos::{LayersStatusDto, VectorLayerStatusDto};
use crate::features::layers::models::{LayerKind, ReferenceLayers, VectorFeature};
use crate::shared::constants::{
    protected_area_color, COLOR_PEATLAND, PEATLAND_NAME_ATTR, PROTECTED_AREA_NAME_ATTR,
};
use crate::shared::templates::escape_html;

/// Serves the loaded reference layers to the map
pub struct LayerService {
    layers: Arc<ReferenceLayers>,
    config: LayersConfig,
}

impl LayerService {
    pub fn new(layers: Arc<ReferenceLayers>, config: LayersConfig) -> Self {
        Self { layers, config }
    }

    /// A vector layer as a Leaflet-ready FeatureCollection
    pub fn feature_collection(&self, kind: LayerKind) -> FeatureCollection {
        let features = self
            .layers
            .vector(kind)
            .features
            .iter()
            .map(|feature| to_geojson_feature(kind, feature))
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    pub fn status(&self) -> LayersStatusDto {
        let vector_layers = [LayerKind::Peatland, LayerKind::ProtectedAreas]
            .into_iter()
            .map(|kind| {
                let layer = self.layers.vector(kind);
                VectorLayerStatusDto {
                    slug: kind.slug().to_string(),
                    name: layer.name.clone(),
                    feature_count: layer.len(),
                    loaded: !layer.is_empty(),
                }
            })
            .collect();

        LayersStatusDto {
            vector_layers,
            deforestation_classification_enabled: self.config.deforestation_classification,
            deforestation_raster_loaded: self.layers.deforestation.is_some(),
            deforestation_wms_url: self.config.deforestation_wms_url.clone(),
            deforestation_wms_layer: self.config.deforestation_wms_layer.clone(),
        }
    }
}

fn to_geojson_feature(kind: LayerKind, feature: &VectorFeature) -> Feature {
    let (title, name_attr) = match kind {
        LayerKind::Peatland => ("Peatland", PEATLAND_NAME_ATTR),
        LayerKind::ProtectedAreas => ("Protected Area", PROTECTED_AREA_NAME_ATTR),
    };
    let name = feature.property_text(name_attr);

    let style = match kind {
        LayerKind::Peatland => json!({
            "color": COLOR_PEATLAND,
            "fillColor": COLOR_PEATLAND,
            "weight": 2,
            "opacity": 0.8,
            "fillOpacity": 0.5,
        }),
        LayerKind::ProtectedAreas => {
            let color = protected_area_color(name.as_deref().unwrap_or_default());
            json!({
                "color": color,
                "fillColor": color,
                "weight": 2,
                "fillOpacity": 0.5,
            })
        }
    };

    let mut properties: Map<String, Value> = feature.properties.clone();
    properties.insert(
        "popup_html".to_string(),
        Value::String(format!(
            "<b>{}</b><br>Name: {}",
            title,
            name.as_deref().map(escape_html).unwrap_or_else(|| "N/A".to_string())
        )),
    );
    properties.insert("style".to_string(), style);

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&feature.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::layers::models::VectorLayer;
    use crate::shared::test_helpers::square_feature;

    fn config(classification: bool) -> LayersConfig {
        LayersConfig {
            peatland_url: String::new(),
            protected_areas_url: String::new(),
            deforestation_raster_url: String::new(),
            deforestation_wms_url: "https://example.org/wms".to_string(),
            deforestation_wms_layer: "DeforestationYear".to_string(),
            deforestation_classification: classification,
        }
    }

    fn service() -> LayerService {
        let mut peat = square_feature(100.0, 0.0, 1.0, "ignored");
        peat.properties = Map::new();
        peat.properties
            .insert(PEATLAND_NAME_ATTR.to_string(), json!("KHG Sungai Kapuas"));

        let layers = ReferenceLayers::new(
            VectorLayer::new("Southeast Asia Peatland", vec![peat]),
            VectorLayer::new(
                "Protected Areas (2021)",
                vec![
                    square_feature(110.0, -3.0, 1.0, "Cagar Alam"),
                    square_feature(112.0, -3.0, 1.0, "Unlisted Category"),
                ],
            ),
            None,
        );
        LayerService::new(Arc::new(layers), config(false))
    }

    #[test]
    fn test_peatland_popup_and_style() {
        let collection = service().feature_collection(LayerKind::Peatland);
        assert_eq!(collection.features.len(), 1);

        let props = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(props["popup_html"], "<b>Peatland</b><br>Name: KHG Sungai Kapuas");
        assert_eq!(props["style"]["fillColor"], COLOR_PEATLAND);
        assert!(collection.features[0].geometry.is_some());
    }

    #[test]
    fn test_protected_area_colours_by_category() {
        let collection = service().feature_collection(LayerKind::ProtectedAreas);
        let props: Vec<_> = collection
            .features
            .iter()
            .map(|f| f.properties.as_ref().unwrap())
            .collect();

        assert_eq!(props[0]["popup_html"], "<b>Protected Area</b><br>Name: Cagar Alam");
        assert_eq!(props[0]["style"]["fillColor"], "#927A6C80");
        assert_eq!(props[1]["style"]["fillColor"], "gray");
    }

    #[test]
    fn test_missing_name_reads_na() {
        let mut feature = square_feature(110.0, -3.0, 1.0, "x");
        feature.properties = Map::new();
        let json = to_geojson_feature(LayerKind::ProtectedAreas, &feature);
        assert_eq!(
            json.properties.unwrap()["popup_html"],
            "<b>Protected Area</b><br>Name: N/A"
        );
    }

    #[test]
    fn test_status_reports_placeholders() {
        let service = LayerService::new(Arc::new(ReferenceLayers::empty()), config(true));
        let status = service.status();
        assert!(status.vector_layers.iter().all(|l| !l.loaded && l.feature_count == 0));
        assert!(status.deforestation_classification_enabled);
        assert!(!status.deforestation_raster_loaded);
    }
}
