use std::path::Path;

use crate::core::config::LayersConfig;
use crate::features::layers::error::LayerError;
use crate::features::layers::models::{DeforestationRaster, LayerKind, ReferenceLayers, VectorLayer};
use crate::features::layers::services::{geojson_reader, geotiff_reader, shapefile_reader};
use crate::shared::constants::{PEATLAND_NAME_ATTR, PROTECTED_AREA_NAME_ATTR};

/// On-disk format of a layer source, picked from its file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerFormat {
    ZippedShapefile,
    GeoJson,
    GeoTiff,
}

impl LayerFormat {
    pub fn from_location(location: &str) -> Result<Self, LayerError> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("zip") => Ok(LayerFormat::ZippedShapefile),
            Some("geojson") | Some("json") => Ok(LayerFormat::GeoJson),
            Some("tif") | Some("tiff") => Ok(LayerFormat::GeoTiff),
            _ => Err(LayerError::UnsupportedFormat(location.to_string())),
        }
    }
}

/// Fetches reference layers over HTTP(S) or from the local filesystem
pub struct LayerLoader {
    client: reqwest::Client,
}

impl LayerLoader {
    pub fn new() -> Result<Self, LayerError> {
        let client = reqwest::Client::builder()
            .user_agent("TraceabilityDashboard/1.0 (reference-layers)")
            .build()
            .map_err(|e| LayerError::Fetch("client".to_string(), e.to_string()))?;

        Ok(Self { client })
    }

    /// Load every layer, substituting an empty placeholder for any that fails.
    pub async fn load_all(&self, config: &LayersConfig) -> ReferenceLayers {
        let peatland = self
            .load_vector(LayerKind::Peatland, &config.peatland_url, &[PEATLAND_NAME_ATTR])
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to load peatland layer: {}", e);
                VectorLayer::empty(LayerKind::Peatland.display_name())
            });

        let protected_areas = self
            .load_vector(
                LayerKind::ProtectedAreas,
                &config.protected_areas_url,
                &[PROTECTED_AREA_NAME_ATTR],
            )
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to load protected areas layer: {}", e);
                VectorLayer::empty(LayerKind::ProtectedAreas.display_name())
            });

        let deforestation = if config.deforestation_classification {
            match self.load_raster(&config.deforestation_raster_url).await {
                Ok(raster) => {
                    let (width, height) = raster.dimensions();
                    tracing::info!("Loaded {}x{} deforestation raster", width, height);
                    Some(raster)
                }
                Err(e) => {
                    tracing::error!("Failed to load deforestation raster: {}", e);
                    None
                }
            }
        } else {
            tracing::info!("Deforestation raster classification disabled");
            None
        };

        tracing::info!(
            "Reference layers ready: {} peatland features, {} protected areas, raster {}",
            peatland.len(),
            protected_areas.len(),
            if deforestation.is_some() { "loaded" } else { "absent" }
        );

        ReferenceLayers::new(peatland, protected_areas, deforestation)
    }

    pub async fn load_vector(
        &self,
        kind: LayerKind,
        location: &str,
        attributes: &'static [&'static str],
    ) -> Result<VectorLayer, LayerError> {
        let format = LayerFormat::from_location(location)?;
        let bytes = self.fetch(location).await?;
        let name = kind.display_name();

        tokio::task::spawn_blocking(move || match format {
            LayerFormat::ZippedShapefile => {
                shapefile_reader::read_shapefile_archive(name, &bytes, attributes)
            }
            LayerFormat::GeoJson => geojson_reader::read_geojson(name, &bytes),
            LayerFormat::GeoTiff => Err(LayerError::UnsupportedFormat(format!(
                "{} is a raster, expected a vector layer",
                name
            ))),
        })
        .await
        .map_err(|e| LayerError::Task(e.to_string()))?
    }

    pub async fn load_raster(&self, location: &str) -> Result<DeforestationRaster, LayerError> {
        if LayerFormat::from_location(location)? != LayerFormat::GeoTiff {
            return Err(LayerError::UnsupportedFormat(location.to_string()));
        }
        let bytes = self.fetch(location).await?;

        tokio::task::spawn_blocking(move || geotiff_reader::read_geotiff(&bytes))
            .await
            .map_err(|e| LayerError::Task(e.to_string()))?
    }

    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LayerError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            tracing::debug!("Downloading layer from {}", location);
            let response = self
                .client
                .get(location)
                .send()
                .await
                .map_err(|e| LayerError::Fetch(location.to_string(), e.to_string()))?;

            if !response.status().is_success() {
                return Err(LayerError::Status(
                    location.to_string(),
                    response.status().as_u16(),
                ));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| LayerError::Fetch(location.to_string(), e.to_string()))?;
            return Ok(bytes.to_vec());
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        tracing::debug!("Reading layer from {}", path);
        tokio::fs::read(path)
            .await
            .map_err(|e| LayerError::Fetch(location.to_string(), e.to_string()))
    }
}
