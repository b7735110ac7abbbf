use crate::features::layers::models::{DeforestationRaster, LayerKind, ProtectedAreaIndex, VectorLayer};

/// The read-only reference data loaded once at startup
pub struct ReferenceLayers {
    pub peatland: VectorLayer,
    pub protected_areas: ProtectedAreaIndex,
    /// Only present when raster classification is enabled and the raster loaded
    pub deforestation: Option<DeforestationRaster>,
}

impl ReferenceLayers {
    pub fn new(
        peatland: VectorLayer,
        protected_areas: VectorLayer,
        deforestation: Option<DeforestationRaster>,
    ) -> Self {
        Self {
            peatland,
            protected_areas: ProtectedAreaIndex::new(protected_areas),
            deforestation,
        }
    }

    /// Empty placeholders for every layer
    pub fn empty() -> Self {
        Self::new(
            VectorLayer::empty(LayerKind::Peatland.display_name()),
            VectorLayer::empty(LayerKind::ProtectedAreas.display_name()),
            None,
        )
    }

    pub fn vector(&self, kind: LayerKind) -> &VectorLayer {
        match kind {
            LayerKind::Peatland => &self.peatland,
            LayerKind::ProtectedAreas => self.protected_areas.layer(),
        }
    }
}
