#[cfg(test)]
use crate::features::layers::models::VectorFeature;

#[cfg(test)]
use crate::features::survey::clients::{SurveyClientError, SurveySource};

#[cfg(test)]
use crate::features::survey::models::SurveyRecord;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use std::{collections::VecDeque, sync::Mutex};

/// Minimal survey record with farmer id `F-{id}`
#[cfg(test)]
pub fn record(id: &str, group: &str, location: Option<&str>) -> SurveyRecord {
    SurveyRecord {
        id: Some(id.to_string()),
        farmer_id: Some(format!("F-{}", id)),
        farmer_name: Some(format!("Farmer {}", id)),
        group: Some(group.to_string()),
        plot_location: location.map(str::to_string),
        ..Default::default()
    }
}

/// Axis-aligned square polygon with a `NAMOBJ` attribute
#[cfg(test)]
pub fn square_feature(min_lon: f64, min_lat: f64, size: f64, namobj: &str) -> VectorFeature {
    use geo::{polygon, MultiPolygon};

    let square = polygon![
        (x: min_lon, y: min_lat),
        (x: min_lon + size, y: min_lat),
        (x: min_lon + size, y: min_lat + size),
        (x: min_lon, y: min_lat + size),
        (x: min_lon, y: min_lat),
    ];

    let mut properties = serde_json::Map::new();
    properties.insert(
        "NAMOBJ".to_string(),
        serde_json::Value::String(namobj.to_string()),
    );

    VectorFeature::new(MultiPolygon::new(vec![square]), properties)
}

/// Survey source that is always unreachable
#[cfg(test)]
pub struct FailingSource;

#[cfg(test)]
#[async_trait]
impl SurveySource for FailingSource {
    async fn fetch_records(&self) -> Result<Vec<SurveyRecord>, SurveyClientError> {
        Err(SurveyClientError::Request("connection refused".to_string()))
    }
}

/// Survey source replaying canned responses in order, then empty sets
#[cfg(test)]
pub struct SequenceSource {
    responses: Mutex<VecDeque<Result<Vec<SurveyRecord>, ()>>>,
}

#[cfg(test)]
impl SequenceSource {
    pub fn new(responses: Vec<Result<Vec<SurveyRecord>, ()>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SurveySource for SequenceSource {
    async fn fetch_records(&self) -> Result<Vec<SurveyRecord>, SurveyClientError> {
        let next = self
            .responses
            .lock()
            .map_err(|e| SurveyClientError::Request(e.to_string()))?
            .pop_front();

        match next {
            Some(Ok(records)) => Ok(records),
            Some(Err(())) => Err(SurveyClientError::Status(503)),
            None => Ok(Vec::new()),
        }
    }
}
