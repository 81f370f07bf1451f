use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{debug, error, info};

use super::catalog::{CatalogError, QuestionCatalog};
use super::domain::{Question, ResultId, TestDepth, ValidationError};
use super::report::ReportGenerator;
use super::repository::{RepositoryError, ResultRecord, ResultRepository};
use super::scoring::evaluate;

/// Service composing the question catalog, scoring pipeline, report
/// generator, and result repository.
///
/// Catalog and repository calls run on the blocking pool.
pub struct AssessmentService<C, R> {
    catalog: Arc<C>,
    repository: Arc<R>,
    reports: Arc<ReportGenerator>,
}

impl<C, R> AssessmentService<C, R>
where
    C: QuestionCatalog + 'static,
    R: ResultRepository + 'static,
{
    pub fn new(catalog: Arc<C>, repository: Arc<R>, reports: ReportGenerator) -> Self {
        Self {
            catalog,
            repository,
            reports: Arc::new(reports),
        }
    }

    /// Ordered questions for a test depth.
    pub async fn questions(&self, depth: TestDepth) -> Result<Vec<Question>, AssessmentError> {
        let started = Instant::now();
        let catalog = Arc::clone(&self.catalog);
        let questions = tokio::task::spawn_blocking(move || catalog.questions(depth.tiers()))
            .await
            .map_err(|err| CatalogError::Unavailable(format!("catalog task failed: {err}")))
            .and_then(|lookup| lookup)
            .map_err(|err| {
                error!(depth = depth.label(), error = %err, "question lookup failed");
                err
            })?;
        debug!(
            depth = depth.label(),
            count = questions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded questions"
        );
        Ok(questions)
    }

    /// Score a submission, attach a report, and persist the result.
    ///
    /// Nothing is stored unless every step up to the insert succeeds.
    pub async fn submit(
        &self,
        depth: TestDepth,
        answers: &[i64],
    ) -> Result<ResultRecord, AssessmentError> {
        let started = Instant::now();
        if answers.is_empty() {
            return Err(ValidationError::EmptyAnswers.into());
        }

        let questions = self.questions(depth).await?;
        if answers.len() > questions.len() {
            debug!(
                answers = answers.len(),
                questions = questions.len(),
                "ignoring answers beyond the delivered questions"
            );
        }

        let evaluation = evaluate(&questions, answers)?;
        let report = self
            .reports
            .generate(&evaluation.type_code, &evaluation.scores)
            .await;

        let record = ResultRecord {
            id: ResultId::generate(),
            type_code: evaluation.type_code,
            dimensions: evaluation.scores.breakdown(),
            report,
            created_at: Utc::now(),
        };

        let repository = Arc::clone(&self.repository);
        let stored = record.clone();
        tokio::task::spawn_blocking(move || repository.insert(stored))
            .await
            .map_err(|err| RepositoryError::Unavailable(format!("store task failed: {err}")))
            .and_then(|insert| insert)
            .map_err(|err| {
                error!(result_id = %record.id, error = %err, "failed to store result");
                err
            })?;

        info!(
            result_id = %record.id,
            type_code = %record.type_code,
            depth = depth.label(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stored assessment result"
        );
        Ok(record)
    }

    /// Fetch a stored result.
    pub async fn result(&self, id: &ResultId) -> Result<ResultRecord, AssessmentError> {
        let repository = Arc::clone(&self.repository);
        let lookup = id.clone();
        tokio::task::spawn_blocking(move || repository.fetch(&lookup))
            .await
            .map_err(|err| RepositoryError::Unavailable(format!("store task failed: {err}")))??
            .ok_or_else(|| AssessmentError::NotFound(id.clone()))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error("result {0} not found")]
    NotFound(ResultId),
}

impl AssessmentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AssessmentError::Validation(_) => StatusCode::BAD_REQUEST,
            AssessmentError::NotFound(_) => StatusCode::NOT_FOUND,
            AssessmentError::Catalog(_) | AssessmentError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
