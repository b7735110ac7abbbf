pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use clients::KoboClient;
pub use routes::routes;
pub use services::SurveyService;
