use std::sync::Arc;

use crate::features::classification::models::ClassifiedRecord;
use crate::features::layers::models::ReferenceLayers;
use crate::features::survey::models::SurveyRecord;
use crate::shared::constants::PROTECTED_AREA_NAME_ATTR;

/// Joins survey plots against the protected-area and deforestation layers
pub struct ClassificationService {
    layers: Arc<ReferenceLayers>,
    sample_deforestation: bool,
}

impl ClassificationService {
    pub fn new(layers: Arc<ReferenceLayers>, sample_deforestation: bool) -> Self {
        if layers.protected_areas.is_empty() {
            tracing::warn!("Protected-area layer is empty; no plot will be flagged as protected");
        }
        if sample_deforestation && layers.deforestation.is_none() {
            tracing::warn!(
                "Deforestation classification enabled but no raster loaded; no plot will be flagged"
            );
        }

        Self {
            layers,
            sample_deforestation,
        }
    }

    /// Classify every record with a parsable location; the rest are dropped.
    pub fn classify<'a>(&self, records: &[&'a SurveyRecord]) -> Vec<ClassifiedRecord<'a>> {
        let classified: Vec<ClassifiedRecord<'a>> = records
            .iter()
            .filter_map(|&record| {
                let location = record.location()?;

                let protected_area = self
                    .layers
                    .protected_areas
                    .find_intersecting(location.lon, location.lat);

                let deforestation_year = match (&self.layers.deforestation, self.sample_deforestation) {
                    (Some(raster), true) => raster.deforestation_year(location.lon, location.lat),
                    _ => None,
                };

                Some(ClassifiedRecord {
                    record,
                    location,
                    in_protected_area: protected_area.is_some(),
                    protected_area_name: protected_area
                        .and_then(|area| area.property_text(PROTECTED_AREA_NAME_ATTR)),
                    in_deforested_area: deforestation_year.is_some(),
                    deforestation_year,
                })
            })
            .collect();

        tracing::debug!(
            "Classified {} of {} records with valid locations",
            classified.len(),
            records.len()
        );

        classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::classification::models::MarkerStatus;
    use crate::features::layers::models::{DeforestationRaster, GeoTransform, VectorLayer};
    use crate::shared::test_helpers::{record, square_feature};

    fn layers(raster: Option<DeforestationRaster>) -> Arc<ReferenceLayers> {
        Arc::new(ReferenceLayers::new(
            VectorLayer::empty("Southeast Asia Peatland"),
            VectorLayer::new(
                "Protected Areas (2021)",
                vec![square_feature(110.0, -3.0, 1.0, "Taman Nasional")],
            ),
            raster,
        ))
    }

    fn raster() -> DeforestationRaster {
        // One 10 degree cell covering (120..130, -10..0), coded 2022
        DeforestationRaster::new(
            1,
            1,
            GeoTransform {
                origin_x: 120.0,
                origin_y: 0.0,
                pixel_width: 10.0,
                pixel_height: 10.0,
            },
            None,
            vec![2],
        )
        .unwrap()
    }

    #[test]
    fn test_protected_and_safe_points() {
        let inside = record("1", "kub_tani_jaya", Some("-2.5 110.5 0 0"));
        let outside = record("2", "kub_tani_jaya", Some("-2.5 115.0"));
        let service = ClassificationService::new(layers(None), false);

        let classified = service.classify(&[&inside, &outside]);
        assert_eq!(classified.len(), 2);
        assert!(classified[0].in_protected_area);
        assert_eq!(classified[0].protected_area_name.as_deref(), Some("Taman Nasional"));
        assert_eq!(classified[0].status(), MarkerStatus::Protected);
        assert!(!classified[1].in_protected_area);
        assert_eq!(classified[1].status(), MarkerStatus::Safe);
    }

    #[test]
    fn test_bad_locations_are_excluded() {
        let missing = record("1", "kub_tani_jaya", None);
        let single = record("2", "kub_tani_jaya", Some("-2.5"));
        let garbage = record("3", "kub_tani_jaya", Some("north east"));
        let service = ClassificationService::new(layers(None), false);

        assert!(service.classify(&[&missing, &single, &garbage]).is_empty());
    }

    #[test]
    fn test_deforestation_disabled_by_default() {
        let plot = record("1", "kub_tani_jaya", Some("-5.0 125.0"));
        let service = ClassificationService::new(layers(Some(raster())), false);

        let classified = service.classify(&[&plot]);
        assert!(!classified[0].in_deforested_area);
        assert_eq!(classified[0].status(), MarkerStatus::Safe);
    }

    #[test]
    fn test_deforestation_sampling_when_enabled() {
        let plot = record("1", "kub_tani_jaya", Some("-5.0 125.0"));
        let elsewhere = record("2", "kub_tani_jaya", Some("-5.0 105.0"));
        let service = ClassificationService::new(layers(Some(raster())), true);

        let classified = service.classify(&[&plot, &elsewhere]);
        assert!(classified[0].in_deforested_area);
        assert_eq!(classified[0].deforestation_year, Some(2022));
        assert_eq!(classified[0].status(), MarkerStatus::Deforested);
        assert!(!classified[1].in_deforested_area);
    }
}
