//! Questionnaire catalog, scoring, report generation, and result storage.
//!
//! The service is generic over its catalog and repository so tests can swap
//! in in-memory fakes; the report generator takes any [`TextGenerator`].

pub mod catalog;
pub mod domain;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, QuestionCatalog, StaticQuestionCatalog};
pub use domain::{
    Dimension, DimensionBreakdown, Polarity, Question, QuestionView, ResultId, TestDepth, Tier,
    ValidationError, RESPONSE_OPTIONS,
};
pub use report::{
    describe_axis, fallback_report, ChatCompletionsClient, GenerationError, GenerationParams,
    GenerationRequest, ReportGenerator, TextGenerator,
};
pub use repository::{RepositoryError, ResultRecord, ResultRepository, ResultView};
pub use router::assessment_router;
pub use scoring::{classify, evaluate, AxisScores, Evaluation, TypeCode};
pub use service::{AssessmentError, AssessmentService};
pub use sqlite::SqliteStore;
