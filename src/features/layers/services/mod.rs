pub mod geojson_reader;
pub mod geotiff_reader;
mod layer_loader;
mod layer_service;
pub mod projection;
pub mod shapefile_reader;

pub use layer_loader::{LayerFormat, LayerLoader};
pub use layer_service::LayerService;
