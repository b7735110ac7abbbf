use geo::{MapCoords, MultiPolygon};
use serde_json::{Map, Value};

/// A polygon feature with its attribute table row
#[derive(Debug, Clone)]
pub struct VectorFeature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl VectorFeature {
    pub fn new(geometry: MultiPolygon<f64>, properties: Map<String, Value>) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Attribute value rendered as text (strings and numbers only)
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A read-only polygon reference layer in WGS84 lon/lat
#[derive(Debug, Clone, Default)]
pub struct VectorLayer {
    pub name: String,
    pub features: Vec<VectorFeature>,
}

impl VectorLayer {
    pub fn new(name: impl Into<String>, features: Vec<VectorFeature>) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }

    /// Placeholder used when a layer cannot be loaded
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Apply a coordinate transform to every geometry in the layer
    pub fn map_coordinates(self, transform: impl Fn(geo::Coord<f64>) -> geo::Coord<f64> + Copy) -> Self {
        let features = self
            .features
            .into_iter()
            .map(|f| VectorFeature {
                geometry: f.geometry.map_coords(transform),
                properties: f.properties,
            })
            .collect();

        Self {
            name: self.name,
            features,
        }
    }

    /// Fallible variant of [`VectorLayer::map_coordinates`]; stops at the first error.
    pub fn try_map_coordinates<E>(
        self,
        transform: impl Fn(geo::Coord<f64>) -> Result<geo::Coord<f64>, E> + Copy,
    ) -> Result<Self, E> {
        let features = self
            .features
            .into_iter()
            .map(|f| {
                Ok(VectorFeature {
                    geometry: f.geometry.try_map_coords(transform)?,
                    properties: f.properties,
                })
            })
            .collect::<Result<Vec<_>, E>>()?;

        Ok(Self {
            name: self.name,
            features,
        })
    }
}
