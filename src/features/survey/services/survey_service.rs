use std::sync::Arc;
use tokio::sync::RwLock;

use crate::features::survey::clients::SurveySource;
use crate::features::survey::models::SurveyRecord;

/// Holds the in-memory survey record set and refreshes it from the remote source
pub struct SurveyService {
    source: Arc<dyn SurveySource>,
    records: RwLock<Arc<Vec<SurveyRecord>>>,
}

impl SurveyService {
    pub fn new(source: Arc<dyn SurveySource>) -> Self {
        Self {
            source,
            records: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Re-fetch every record and replace the current set wholesale.
    ///
    /// Fetch failures are logged and leave an empty set behind.
    pub async fn refresh(&self) -> Arc<Vec<SurveyRecord>> {
        let fetched = match self.source.fetch_records().await {
            Ok(records) => {
                tracing::info!("Fetched {} survey records", records.len());
                records
            }
            Err(e) => {
                tracing::warn!("Error fetching survey data: {}", e);
                Vec::new()
            }
        };

        let fetched = Arc::new(fetched);
        let mut records = self.records.write().await;
        *records = Arc::clone(&fetched);
        fetched
    }

    /// Current record set
    pub async fn snapshot(&self) -> Arc<Vec<SurveyRecord>> {
        Arc::clone(&*self.records.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{record, FailingSource, SequenceSource};

    #[tokio::test]
    async fn test_starts_empty() {
        let service = SurveyService::new(Arc::new(FailingSource));
        assert!(service.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_set() {
        let service = SurveyService::new(Arc::new(FailingSource));
        let records = service.refresh().await;
        assert!(records.is_empty());
        assert!(service.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_instead_of_appending() {
        let source = SequenceSource::new(vec![
            Ok(vec![
                record("1", "kub_tani_jaya", Some("-2.0 113.0")),
                record("2", "kub_tani_jaya", Some("-2.1 113.1")),
            ]),
            Ok(vec![record("3", "kub_jaya_abadi", Some("-2.2 113.2"))]),
        ]);
        let service = SurveyService::new(Arc::new(source));

        service.refresh().await;
        assert_eq!(service.snapshot().await.len(), 2);

        service.refresh().await;
        let current = service.snapshot().await;
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_previous_set() {
        let source = SequenceSource::new(vec![
            Ok(vec![record("1", "kub_tani_jaya", Some("-2.0 113.0"))]),
            Err(()),
        ]);
        let service = SurveyService::new(Arc::new(source));

        service.refresh().await;
        assert_eq!(service.snapshot().await.len(), 1);

        service.refresh().await;
        assert!(service.snapshot().await.is_empty());
    }
}
