use thiserror::Error;

/// Errors raised while fetching or decoding a reference layer
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("Failed to fetch layer from {0}: {1}")]
    Fetch(String, String),

    #[error("Layer source {0} returned HTTP {1}")]
    Status(String, u16),

    #[error("Unsupported layer format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid archive: {0}")]
    Archive(String),

    #[error("Invalid shapefile: {0}")]
    Shapefile(String),

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    #[error("Cannot reproject layer: {0}")]
    Projection(String),

    #[error("Invalid raster: {0}")]
    Raster(String),

    #[error("Layer decoding task failed: {0}")]
    Task(String),
}
