use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{DimensionBreakdown, ResultId};
use super::scoring::TypeCode;

/// Stored outcome of one submission. Never modified after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: ResultId,
    pub type_code: TypeCode,
    pub dimensions: [DimensionBreakdown; 4],
    pub report: String,
    pub created_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn view(&self) -> ResultView {
        ResultView {
            id: self.id.clone(),
            type_code: self.type_code,
            dimensions: self.dimensions,
            report: self.report.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ResultRepository: Send + Sync {
    /// Persist a new record. Reusing an id is a conflict.
    fn insert(&self, record: ResultRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record could not be decoded: {0}")]
    Decode(String),
}

/// Result payload returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub id: ResultId,
    #[serde(rename = "type")]
    pub type_code: TypeCode,
    pub dimensions: [DimensionBreakdown; 4],
    pub report: String,
}
