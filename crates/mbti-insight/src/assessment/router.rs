use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::QuestionCatalog;
use super::domain::{QuestionView, ResultId, TestDepth};
use super::repository::ResultRepository;
use super::service::{AssessmentError, AssessmentService};

/// Router builder exposing question listing, submission, and retrieval.
pub fn assessment_router<C, R>(service: Arc<AssessmentService<C, R>>) -> Router
where
    C: QuestionCatalog + 'static,
    R: ResultRepository + 'static,
{
    Router::new()
        .route("/api/questions", get(questions_handler::<C, R>))
        .route("/api/submit", post(submit_handler::<C, R>))
        .route("/api/result/:id", get(result_handler::<C, R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DepthQuery {
    #[serde(rename = "type")]
    pub(crate) test_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerPayload {
    pub(crate) answers: Vec<i64>,
}

fn error_response(error: AssessmentError) -> Response {
    let status = error.status_code();
    let message = match &error {
        AssessmentError::Storage(_) | AssessmentError::Catalog(_) => {
            "storage is temporarily unavailable, please retry".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn questions_handler<C, R>(
    State(service): State<Arc<AssessmentService<C, R>>>,
    Query(query): Query<DepthQuery>,
) -> Response
where
    C: QuestionCatalog + 'static,
    R: ResultRepository + 'static,
{
    let depth = match query.test_type.as_deref().unwrap_or("").parse::<TestDepth>() {
        Ok(depth) => depth,
        Err(error) => return error_response(error.into()),
    };

    match service.questions(depth).await {
        Ok(questions) => {
            let views: Vec<QuestionView> = questions.iter().map(|question| question.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<C, R>(
    State(service): State<Arc<AssessmentService<C, R>>>,
    Query(query): Query<DepthQuery>,
    payload: Result<Json<AnswerPayload>, JsonRejection>,
) -> Response
where
    C: QuestionCatalog + 'static,
    R: ResultRepository + 'static,
{
    let depth = match query.test_type.as_deref() {
        None | Some("") => TestDepth::default(),
        Some(raw) => match raw.parse::<TestDepth>() {
            Ok(depth) => depth,
            Err(error) => return error_response(error.into()),
        },
    };

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response()
        }
    };

    match service.submit(depth, &payload.answers).await {
        Ok(record) => (StatusCode::OK, Json(json!({ "resultId": record.id }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<C, R>(
    State(service): State<Arc<AssessmentService<C, R>>>,
    Path(id): Path<String>,
) -> Response
where
    C: QuestionCatalog + 'static,
    R: ResultRepository + 'static,
{
    match service.result(&ResultId(id)).await {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}
