pub mod survey_handler;

pub use survey_handler::*;
