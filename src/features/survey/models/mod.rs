mod survey_record;

pub use survey_record::{PlotLocation, SurveyRecord};
