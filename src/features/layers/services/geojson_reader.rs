use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;
use serde_json::Map;

use crate::features::layers::error::LayerError;
use crate::features::layers::models::{VectorFeature, VectorLayer};

/// Read a GeoJSON FeatureCollection, keeping only polygonal features.
pub fn read_geojson(name: &str, bytes: &[u8]) -> Result<VectorLayer, LayerError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LayerError::GeoJson(e.to_string()))?;
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| LayerError::GeoJson(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LayerError::GeoJson(
            "expected a FeatureCollection".to_string(),
        ));
    };

    let mut skipped = 0usize;
    let features: Vec<VectorFeature> = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let geometry = feature.geometry?;
            let polygonal = match Geometry::<f64>::try_from(geometry.value) {
                Ok(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon]),
                Ok(Geometry::MultiPolygon(multi)) => multi,
                _ => {
                    skipped += 1;
                    return None;
                }
            };
            let properties = feature.properties.unwrap_or_else(Map::new);
            Some(VectorFeature::new(polygonal, properties))
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("Skipped {} non-polygon features in layer '{}'", skipped, name);
    }

    Ok(VectorLayer::new(name, features))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_polygons_and_skips_points() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"NAMA_KHG": "KHG Sungai Kapuas"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[109.0, -1.0], [110.0, -1.0], [110.0, 0.0], [109.0, 0.0], [109.0, -1.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [109.5, -0.5]}
                },
                {
                    "type": "Feature",
                    "properties": null,
                    "geometry": null
                }
            ]
        }"#;

        let layer = read_geojson("peatland", body.as_bytes()).unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(
            layer.features[0].property_text("NAMA_KHG").as_deref(),
            Some("KHG Sungai Kapuas")
        );
    }

    #[test]
    fn test_rejects_bare_geometry() {
        let body = r#"{"type": "Point", "coordinates": [109.5, -0.5]}"#;
        assert!(matches!(
            read_geojson("peatland", body.as_bytes()),
            Err(LayerError::GeoJson(_))
        ));
    }
}
