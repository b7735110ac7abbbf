use geo::{BoundingRect, Intersects, Point};
use rstar::{RTree, RTreeObject, AABB};

use crate::features::layers::models::{VectorFeature, VectorLayer};

/// Envelope of one protected-area feature, pointing back into the layer
struct AreaEnvelope {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for AreaEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Protected-area polygons with an envelope index for point lookups
pub struct ProtectedAreaIndex {
    layer: VectorLayer,
    tree: RTree<AreaEnvelope>,
}

impl ProtectedAreaIndex {
    pub fn new(layer: VectorLayer) -> Self {
        let envelopes: Vec<AreaEnvelope> = layer
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let rect = feature.geometry.bounding_rect()?;
                Some(AreaEnvelope {
                    index,
                    aabb: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        tracing::debug!(
            "Indexed {} of {} protected-area features",
            envelopes.len(),
            layer.len()
        );

        Self {
            layer,
            tree: RTree::bulk_load(envelopes),
        }
    }

    pub fn layer(&self) -> &VectorLayer {
        &self.layer
    }

    pub fn is_empty(&self) -> bool {
        self.layer.is_empty()
    }

    /// First protected area whose polygon intersects the point (boundary included)
    pub fn find_intersecting(&self, lon: f64, lat: f64) -> Option<&VectorFeature> {
        let point = Point::new(lon, lat);
        let envelope = AABB::from_point([lon, lat]);

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|candidate| self.layer.features.get(candidate.index))
            .find(|feature| feature.geometry.intersects(&point))
    }
}
