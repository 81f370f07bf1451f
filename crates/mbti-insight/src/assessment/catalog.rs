use std::collections::BTreeSet;
use std::io;

use serde::Deserialize;

use super::domain::{Dimension, Polarity, Question, Tier};

const STANDARD_BANK: &str = include_str!("../../data/questions.csv");

/// Read-only source of questionnaire items.
pub trait QuestionCatalog: Send + Sync {
    /// Questions belonging to any of `tiers`, ordered by id.
    fn questions(&self, tiers: &[Tier]) -> Result<Vec<Question>, CatalogError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("question catalog unavailable: {0}")]
    Unavailable(String),
    #[error("question {id} could not be decoded: {reason}")]
    InvalidRow { id: String, reason: String },
    #[error("question bank is malformed: {0}")]
    Malformed(#[from] csv::Error),
}

/// Catalog held entirely in memory, typically the bundled question bank.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionCatalog {
    questions: Vec<Question>,
}

impl StaticQuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Catalog seeded from the bank shipped with the crate.
    pub fn standard() -> Result<Self, CatalogError> {
        Ok(Self::new(standard_questions()?))
    }
}

impl QuestionCatalog for StaticQuestionCatalog {
    fn questions(&self, tiers: &[Tier]) -> Result<Vec<Question>, CatalogError> {
        Ok(select_tiers(self.questions.iter().cloned(), tiers))
    }
}

/// Keep questions from the requested tiers and order them by id.
pub(crate) fn select_tiers(
    questions: impl IntoIterator<Item = Question>,
    tiers: &[Tier],
) -> Vec<Question> {
    let mut selected: Vec<Question> = questions
        .into_iter()
        .filter(|question| tiers.contains(&question.tier))
        .collect();
    selected.sort_by_key(|question| question.id);
    selected
}

/// The bundled question bank.
pub fn standard_questions() -> Result<Vec<Question>, CatalogError> {
    parse_question_bank(STANDARD_BANK.as_bytes())
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: u32,
    tier: String,
    dimension: String,
    direction: i64,
    question: String,
}

impl QuestionRow {
    fn into_question(self) -> Result<Question, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidRow {
            id: self.id.to_string(),
            reason,
        };

        let tier: Tier = self.tier.parse().map_err(invalid)?;
        let dimension: Dimension = self.dimension.parse().map_err(invalid)?;
        let polarity = Polarity::from_direction(self.direction)
            .ok_or_else(|| invalid(format!("direction {} must be 1 or -1", self.direction)))?;
        let prompt = self.question.trim().to_string();
        if prompt.is_empty() {
            return Err(invalid("question text is empty".to_string()));
        }

        Ok(Question {
            id: self.id,
            prompt,
            dimension,
            polarity,
            tier,
        })
    }
}

/// Parse a `id,tier,dimension,direction,question` CSV export.
pub fn parse_question_bank<R: io::Read>(reader: R) -> Result<Vec<Question>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut seen = BTreeSet::new();
    let mut questions = Vec::new();

    for row in reader.deserialize::<QuestionRow>() {
        let question = row?.into_question()?;
        if !seen.insert(question.id) {
            return Err(CatalogError::InvalidRow {
                id: question.id.to_string(),
                reason: "duplicate question id".to_string(),
            });
        }
        questions.push(question);
    }

    questions.sort_by_key(|question| question.id);
    Ok(questions)
}
