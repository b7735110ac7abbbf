pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use error::LayerError;
pub use routes::routes;
pub use services::{LayerLoader, LayerService};
