use geo::Coord;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use std::f64::consts::PI;

use crate::features::layers::error::LayerError;
use crate::features::layers::models::VectorLayer;

/// WGS84 / Web Mercator sphere radius in metres
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Target system for every layer
const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Coordinate reference system declared by a shapefile `.prj`
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCrs {
    Geographic,
    WebMercator,
    /// Projected system with its PROJ.4 definition
    Projected { name: String, definition: String },
    Unsupported(String),
}

impl SourceCrs {
    /// Classify an ESRI or OGC WKT projection string.
    pub fn from_wkt(wkt: &str) -> Self {
        let upper = wkt.trim().to_uppercase();

        if upper.starts_with("GEOGCS") || upper.starts_with("GEOGCRS") {
            return SourceCrs::Geographic;
        }

        let web_mercator_markers = [
            "WEB_MERCATOR",
            "PSEUDO-MERCATOR",
            "PSEUDO_MERCATOR",
            "MERCATOR_AUXILIARY_SPHERE",
            "\"3857\"",
        ];
        if web_mercator_markers.iter().any(|m| upper.contains(m)) {
            return SourceCrs::WebMercator;
        }

        // PROJCS["name", ...]
        let name = wkt
            .split('"')
            .nth(1)
            .unwrap_or("unknown projection")
            .to_string();

        if let Some((zone, south)) = wgs84_utm_zone(&name) {
            let hemisphere = if south { " +south" } else { "" };
            return SourceCrs::Projected {
                name,
                definition: format!(
                    "+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs",
                    zone, hemisphere
                ),
            };
        }

        match proj4wkt::wkt_to_projstring(wkt.trim()) {
            Ok(definition) if !definition.trim().is_empty() => {
                SourceCrs::Projected { name, definition }
            }
            Ok(_) => SourceCrs::Unsupported(name),
            Err(e) => {
                tracing::debug!("WKT for '{}' not understood: {:?}", name, e);
                SourceCrs::Unsupported(name)
            }
        }
    }
}

/// Zone and hemisphere of a WGS84 UTM name such as `WGS_1984_UTM_Zone_50S`
/// or `WGS 84 / UTM zone 48N`.
fn wgs84_utm_zone(name: &str) -> Option<(u8, bool)> {
    let upper = name.to_uppercase().replace(' ', "_");
    if !(upper.starts_with("WGS_1984_") || upper.starts_with("WGS_84_")) {
        return None;
    }

    let marker = "UTM_ZONE_";
    let rest = &upper[upper.find(marker)? + marker.len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let zone: u8 = digits.parse().ok().filter(|z| (1..=60).contains(z))?;

    match rest[digits.len()..].chars().next()? {
        'S' => Some((zone, true)),
        'N' => Some((zone, false)),
        _ => None,
    }
}

/// Inverse spherical Mercator (EPSG:3857 metres → EPSG:4326 degrees)
pub fn web_mercator_to_wgs84(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Coord { x: lon, y: lat }
}

/// Bring a layer into geographic WGS84 lon/lat.
///
/// A layer without a `.prj` is taken as geographic already.
pub fn to_wgs84(layer: VectorLayer, crs: Option<&SourceCrs>) -> Result<VectorLayer, LayerError> {
    match crs {
        None | Some(SourceCrs::Geographic) => Ok(layer),
        Some(SourceCrs::WebMercator) => {
            tracing::debug!("Reprojecting layer '{}' from Web Mercator", layer.name);
            Ok(layer.map_coordinates(web_mercator_to_wgs84))
        }
        Some(SourceCrs::Projected { name, definition }) => {
            tracing::debug!("Reprojecting layer '{}' from {} ({})", layer.name, name, definition);

            let projection_err =
                |e: proj4rs::errors::Error| LayerError::Projection(format!("{}: {:?}", name, e));
            let source = Proj::from_proj_string(definition).map_err(projection_err)?;
            let target = Proj::from_proj_string(WGS84_DEFINITION).map_err(projection_err)?;

            layer.try_map_coordinates(|c| {
                let mut point = (c.x, c.y, 0.0);
                transform(&source, &target, &mut point).map_err(projection_err)?;
                // longlat output is in radians
                Ok(Coord {
                    x: point.0.to_degrees(),
                    y: point.1.to_degrees(),
                })
            })
        }
        Some(SourceCrs::Unsupported(name)) => Err(LayerError::Projection(format!(
            "layer '{}' uses unsupported projection '{}'",
            layer.name, name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::square_feature;
    use geo::BoundingRect;

    const UTM_50S: &str = r#"PROJCS["WGS_1984_UTM_Zone_50S",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",500000.0],PARAMETER["False_Northing",10000000.0],PARAMETER["Central_Meridian",117.0],PARAMETER["Scale_Factor",0.9996],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#;

    #[test]
    fn test_classify_wkt() {
        let geographic = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
        assert_eq!(SourceCrs::from_wkt(geographic), SourceCrs::Geographic);

        let mercator = r#"PROJCS["WGS_1984_Web_Mercator_Auxiliary_Sphere",GEOGCS["GCS_WGS_1984"],PROJECTION["Mercator_Auxiliary_Sphere"]]"#;
        assert_eq!(SourceCrs::from_wkt(mercator), SourceCrs::WebMercator);

        assert_eq!(
            SourceCrs::from_wkt(UTM_50S),
            SourceCrs::Projected {
                name: "WGS_1984_UTM_Zone_50S".to_string(),
                definition: "+proj=utm +zone=50 +south +datum=WGS84 +units=m +no_defs"
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_utm_zone_names() {
        assert_eq!(wgs84_utm_zone("WGS_1984_UTM_Zone_50S"), Some((50, true)));
        assert_eq!(wgs84_utm_zone("WGS 84 / UTM zone 48N"), Some((48, false)));
        assert_eq!(wgs84_utm_zone("WGS_1984_UTM_Zone_61S"), None);
        assert_eq!(wgs84_utm_zone("NAD_1983_UTM_Zone_10N"), None);
        assert_eq!(wgs84_utm_zone("DGN95_Indonesia_TM-3_zone_50.1"), None);
    }

    #[test]
    fn test_web_mercator_inverse() {
        let origin = web_mercator_to_wgs84(Coord { x: 0.0, y: 0.0 });
        assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);

        // Jakarta is roughly (106.8456, -6.2088)
        let jakarta = web_mercator_to_wgs84(Coord {
            x: 11_894_071.0,
            y: -692_541.0,
        });
        assert!((jakarta.x - 106.8456).abs() < 0.01);
        assert!((jakarta.y - (-6.2088)).abs() < 0.01);
    }

    #[test]
    fn test_utm_layer_lands_in_degrees() {
        // 1 km square on the zone 50 central meridian, 100 km south of the equator
        let layer = VectorLayer::new(
            "Protected Areas (2021)",
            vec![square_feature(500_000.0, 9_900_000.0, 1_000.0, "Hutan Lindung")],
        );

        let crs = SourceCrs::from_wkt(UTM_50S);
        let projected = to_wgs84(layer, Some(&crs)).unwrap();

        let bounds = projected.features[0].geometry.bounding_rect().unwrap();
        assert!(bounds.min().x >= -180.0 && bounds.max().x <= 180.0);
        assert!(bounds.min().y >= -90.0 && bounds.max().y <= 90.0);

        assert!((bounds.min().x - 117.0).abs() < 1e-6);
        assert!(bounds.max().x > 117.0 && bounds.max().x < 117.02);
        assert!(bounds.min().y > -0.95 && bounds.max().y < -0.85);
        assert_eq!(
            projected.features[0].property_text("NAMOBJ").as_deref(),
            Some("Hutan Lindung")
        );
    }

    #[test]
    fn test_unsupported_projection_is_an_error() {
        let layer = VectorLayer::new(
            "Southeast Asia Peatland",
            vec![square_feature(0.0, 0.0, 1.0, "Gambut")],
        );

        let result = to_wgs84(layer, Some(&SourceCrs::Unsupported("Mystery".to_string())));
        assert!(matches!(result, Err(LayerError::Projection(_))));
    }
}
