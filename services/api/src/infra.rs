use metrics_exporter_prometheus::PrometheusHandle;
use mbti_insight::assessment::{
    RepositoryError, ResultId, ResultRecord, ResultRepository, TestDepth,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Result store used when no database path is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResultRepository {
    records: Arc<RwLock<HashMap<ResultId, ResultRecord>>>,
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("result store lock poisoned".to_string())
}

impl ResultRepository for InMemoryResultRepository {
    fn insert(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn parse_depth(raw: &str) -> Result<TestDepth, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

/// One answer from a comma-separated list. Values are clamped later, so any integer is accepted.
pub(crate) fn parse_answer(raw: &str) -> Result<i64, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("answers must not be blank".to_string());
    }
    value
        .parse::<i64>()
        .map_err(|err| format!("'{value}' is not a whole number ({err})"))
}
