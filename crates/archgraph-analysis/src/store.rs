use archgraph_core::{AnalysisRecord, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Keyed store of analysis records.
///
/// Each call is atomic on its own; there is no isolation across calls.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Stores a record under its pre-assigned identifier and returns that identifier.
    async fn put(&self, record: AnalysisRecord) -> Result<String>;

    async fn get(&self, id: &str) -> Result<Option<Arc<AnalysisRecord>>>;

    async fn list(&self) -> Result<Vec<Arc<AnalysisRecord>>>;

    /// Returns false when no record had that identifier.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Most recent record by creation timestamp, found by a full scan.
    async fn latest(&self) -> Result<Option<Arc<AnalysisRecord>>> {
        let records = self.list().await?;
        Ok(records.into_iter().max_by_key(|r| r.analyzed_at))
    }
}

/// Process-lifetime store; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryAnalysisStore {
    records: DashMap<String, Arc<AnalysisRecord>>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn put(&self, record: AnalysisRecord) -> Result<String> {
        let id = record.analysis_id.clone();
        self.records.insert(id.clone(), Arc::new(record));
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<AnalysisRecord>>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Arc<AnalysisRecord>>> {
        Ok(self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }
}
