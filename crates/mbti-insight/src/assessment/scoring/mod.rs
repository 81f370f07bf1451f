//! Pure scoring pipeline: Likert answers to axis scores to a type code.

mod classifier;
mod rules;
mod scale;

pub use classifier::{classify, pole_for, TypeCode};
pub use rules::{score_answers, AxisScores, DimensionScores};
pub use scale::{clamp_response, response_percentage, SCALE_MAX, SCALE_MIN};

use super::domain::{Question, ValidationError};

/// Scores and code computed for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub scores: AxisScores,
    pub type_code: TypeCode,
}

/// Score a submission against the questions delivered for its test depth.
///
/// Rejects an empty answer list up front and any axis left without a single
/// contributing answer, rather than inventing a score for it.
pub fn evaluate(questions: &[Question], answers: &[i64]) -> Result<Evaluation, ValidationError> {
    if answers.is_empty() {
        return Err(ValidationError::EmptyAnswers);
    }

    let scores = score_answers(questions, answers)
        .complete()
        .map_err(ValidationError::UnansweredDimension)?;

    Ok(Evaluation {
        scores,
        type_code: classify(&scores),
    })
}
