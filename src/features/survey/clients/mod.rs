mod kobo_client;

pub use kobo_client::{KoboClient, SurveyClientError, SurveySource};
