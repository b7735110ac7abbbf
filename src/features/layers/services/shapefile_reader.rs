use geo::MultiPolygon;
use serde_json::{Map, Number, Value};
use shapefile::dbase::FieldValue;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::features::layers::error::LayerError;
use crate::features::layers::models::{VectorFeature, VectorLayer};
use crate::features::layers::services::projection::{self, SourceCrs};

/// The members of one shapefile inside an archive
#[derive(Default)]
struct ShapefileParts {
    shp: Option<Vec<u8>>,
    dbf: Option<Vec<u8>>,
    prj: Option<String>,
}

/// Read the first polygon shapefile from a zip archive and reproject it to WGS84.
///
/// Only the attributes listed in `attributes` are kept on each feature.
pub fn read_shapefile_archive(
    name: &str,
    bytes: &[u8],
    attributes: &[&str],
) -> Result<VectorLayer, LayerError> {
    let parts = extract_parts(bytes)?;

    let shp = parts
        .shp
        .ok_or_else(|| LayerError::Archive("no .shp file in archive".to_string()))?;
    let dbf = parts
        .dbf
        .ok_or_else(|| LayerError::Archive("no .dbf file next to the .shp".to_string()))?;
    let crs = parts.prj.as_deref().map(SourceCrs::from_wkt);

    let shape_reader = shapefile::ShapeReader::new(Cursor::new(shp))
        .map_err(|e| LayerError::Shapefile(e.to_string()))?;
    let dbase_reader = shapefile::dbase::Reader::new(Cursor::new(dbf))
        .map_err(|e| LayerError::Shapefile(e.to_string()))?;
    let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| LayerError::Shapefile(e.to_string()))?;

        let geometry: MultiPolygon<f64> = match shape {
            shapefile::Shape::Polygon(polygon) => polygon
                .try_into()
                .map_err(|e| LayerError::Shapefile(format!("polygon conversion: {:?}", e)))?,
            shapefile::Shape::PolygonM(polygon) => polygon
                .try_into()
                .map_err(|e| LayerError::Shapefile(format!("polygonM conversion: {:?}", e)))?,
            shapefile::Shape::PolygonZ(polygon) => polygon
                .try_into()
                .map_err(|e| LayerError::Shapefile(format!("polygonZ conversion: {:?}", e)))?,
            _ => continue,
        };

        let mut properties = Map::new();
        for attribute in attributes {
            if let Some(value) = record.get(attribute) {
                properties.insert(attribute.to_string(), field_to_json(value));
            }
        }

        features.push(VectorFeature::new(geometry, properties));
    }

    tracing::debug!("Read {} polygon features for layer '{}'", features.len(), name);

    projection::to_wgs84(VectorLayer::new(name, features), crs.as_ref())
}

/// Collect .shp/.dbf/.prj bytes of the first shapefile stem in the archive
fn extract_parts(bytes: &[u8]) -> Result<ShapefileParts, LayerError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| LayerError::Archive(e.to_string()))?;

    let mut stem: Option<String> = None;
    let mut parts = ShapefileParts::default();

    // First pass: pick the .shp so sidecar files can be matched by stem
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| LayerError::Archive(e.to_string()))?;
        let entry = file.name().to_string();
        if file.is_dir() || entry.starts_with("__MACOSX") {
            continue;
        }
        if extension_of(&entry).as_deref() == Some("shp") {
            stem = Some(stem_of(&entry));
            break;
        }
    }

    let Some(stem) = stem else {
        return Ok(parts);
    };

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| LayerError::Archive(e.to_string()))?;
        let entry = file.name().to_string();
        if file.is_dir() || entry.starts_with("__MACOSX") || stem_of(&entry) != stem {
            continue;
        }

        let mut buf = Vec::new();
        match extension_of(&entry).as_deref() {
            Some("shp") | Some("dbf") | Some("prj") => {
                file.read_to_end(&mut buf)
                    .map_err(|e| LayerError::Archive(format!("{}: {}", entry, e)))?;
            }
            _ => continue,
        }

        match extension_of(&entry).as_deref() {
            Some("shp") => parts.shp = Some(buf),
            Some("dbf") => parts.dbf = Some(buf),
            Some("prj") => parts.prj = Some(String::from_utf8_lossy(&buf).into_owned()),
            _ => {}
        }
    }

    Ok(parts)
}

fn extension_of(entry: &str) -> Option<String> {
    Path::new(entry)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn stem_of(entry: &str) -> String {
    let path = Path::new(entry);
    let parent = path.parent().map(|p| p.to_string_lossy()).unwrap_or_default();
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    format!("{}/{}", parent, stem).to_lowercase()
}

fn field_to_json(value: &FieldValue) -> Value {
    let number = |n: f64| Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null);
    match value {
        FieldValue::Character(Some(s)) => Value::String(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => number(*n),
        FieldValue::Float(Some(n)) => number(f64::from(*n)),
        FieldValue::Double(n) => number(*n),
        FieldValue::Integer(n) => Value::from(*n),
        FieldValue::Logical(Some(b)) => Value::Bool(*b),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_matching_is_case_insensitive() {
        assert_eq!(stem_of("data/Protected_Areas.SHP"), stem_of("data/protected_areas.dbf"));
        assert_ne!(stem_of("a/x.shp"), stem_of("b/x.shp"));
        assert_eq!(extension_of("data/Protected_Areas.SHP").as_deref(), Some("shp"));
    }

    #[test]
    fn test_field_conversion() {
        assert_eq!(
            field_to_json(&FieldValue::Character(Some(" Cagar Alam ".to_string()))),
            Value::String("Cagar Alam".to_string())
        );
        assert_eq!(field_to_json(&FieldValue::Integer(7)), Value::from(7));
        assert_eq!(field_to_json(&FieldValue::Character(None)), Value::Null);
    }

    #[test]
    fn test_garbage_is_not_an_archive() {
        let result = read_shapefile_archive("peatland", b"not a zip", &["NAMA_KHG"]);
        assert!(matches!(result, Err(LayerError::Archive(_))));
    }
}
