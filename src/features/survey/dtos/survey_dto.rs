use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of re-fetching the survey record set
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResultDto {
    /// Number of records now held in memory
    pub total_records: usize,
    pub refreshed_at: DateTime<Utc>,
}
