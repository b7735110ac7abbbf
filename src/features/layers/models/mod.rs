mod protected_areas;
mod raster;
mod reference_layers;
mod vector_layer;

pub use protected_areas::ProtectedAreaIndex;
pub use raster::{DeforestationRaster, GeoTransform};
pub use reference_layers::ReferenceLayers;
pub use vector_layer::{VectorFeature, VectorLayer};

/// The overlay layers served to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Peatland,
    ProtectedAreas,
}

impl LayerKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "peatland" => Some(LayerKind::Peatland),
            "protected-areas" => Some(LayerKind::ProtectedAreas),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            LayerKind::Peatland => "peatland",
            LayerKind::ProtectedAreas => "protected-areas",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LayerKind::Peatland => "Southeast Asia Peatland",
            LayerKind::ProtectedAreas => "Protected Areas (2021)",
        }
    }
}
