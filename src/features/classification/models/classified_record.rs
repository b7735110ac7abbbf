use crate::features::survey::models::{PlotLocation, SurveyRecord};
use crate::shared::constants::{COLOR_DEFORESTED, COLOR_PROTECTED, COLOR_SAFE};

/// Map status of a surveyed plot. Protected takes precedence over deforested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    Safe,
    Deforested,
    Protected,
}

impl MarkerStatus {
    pub fn color(&self) -> &'static str {
        match self {
            MarkerStatus::Safe => COLOR_SAFE,
            MarkerStatus::Deforested => COLOR_DEFORESTED,
            MarkerStatus::Protected => COLOR_PROTECTED,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarkerStatus::Safe => "Safe",
            MarkerStatus::Deforested => "In Deforested Area",
            MarkerStatus::Protected => "In Protected Area",
        }
    }
}

/// A survey record with a valid location and its spatial join results
#[derive(Debug, Clone)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a SurveyRecord,
    pub location: PlotLocation,
    pub in_protected_area: bool,
    pub protected_area_name: Option<String>,
    pub in_deforested_area: bool,
    pub deforestation_year: Option<i32>,
}

impl ClassifiedRecord<'_> {
    pub fn status(&self) -> MarkerStatus {
        if self.in_protected_area {
            MarkerStatus::Protected
        } else if self.in_deforested_area {
            MarkerStatus::Deforested
        } else {
            MarkerStatus::Safe
        }
    }
}
