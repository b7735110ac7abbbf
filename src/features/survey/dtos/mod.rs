mod survey_dto;

pub use survey_dto::*;
