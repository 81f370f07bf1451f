//! SQLite-backed catalog and result store.
//!
//! A single connection sits behind a mutex, so at most one statement runs at
//! a time and no lock is held across an `.await`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};

use super::catalog::{CatalogError, QuestionCatalog};
use super::domain::{DimensionBreakdown, Polarity, Question, ResultId, Tier};
use super::repository::{RepositoryError, ResultRecord, ResultRepository};
use super::scoring::AxisScores;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY,
    type TEXT NOT NULL,
    dimension TEXT NOT NULL,
    direction INTEGER NOT NULL,
    question TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_questions_type ON questions(type);
CREATE TABLE IF NOT EXISTS results (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    dimensions TEXT NOT NULL,
    report TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let connection = Connection::open(path.as_ref()).map_err(unavailable)?;
        info!(path = %path.as_ref().display(), "opened sqlite store");
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::from_connection(Connection::open_in_memory().map_err(unavailable)?)
    }

    fn from_connection(connection: Connection) -> Result<Self, RepositoryError> {
        connection.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.connection
            .lock()
            .map_err(|_| RepositoryError::Unavailable("sqlite connection poisoned".to_string()))
    }

    /// Load `questions` into an empty catalog table. Returns rows written.
    pub fn seed_questions(&self, questions: &[Question]) -> Result<usize, RepositoryError> {
        let mut connection = self.lock()?;
        let existing: i64 = connection
            .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
            .map_err(unavailable)?;
        if existing > 0 {
            debug!(existing, "question catalog already seeded");
            return Ok(0);
        }

        let tx = connection.transaction().map_err(unavailable)?;
        for question in questions {
            tx.execute(
                "INSERT INTO questions (id, type, dimension, direction, question) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    question.id,
                    question.tier.label(),
                    question.dimension.code(),
                    question.polarity.direction(),
                    question.prompt,
                ],
            )
            .map_err(unavailable)?;
        }
        tx.commit().map_err(unavailable)?;

        info!(count = questions.len(), "seeded question catalog");
        Ok(questions.len())
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<(), RepositoryError> {
        self.lock()?.execute_batch(sql).map_err(unavailable)
    }
}

fn unavailable(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

type QuestionRow = (i64, String, String, i64, String);

fn decode_question(row: QuestionRow) -> Result<Question, CatalogError> {
    let (id, tier, dimension, direction, prompt) = row;
    let invalid = |reason: String| CatalogError::InvalidRow {
        id: id.to_string(),
        reason,
    };

    Ok(Question {
        id: u32::try_from(id).map_err(|_| invalid("id out of range".to_string()))?,
        prompt,
        dimension: dimension.parse().map_err(invalid)?,
        polarity: Polarity::from_direction(direction)
            .ok_or_else(|| invalid(format!("direction {direction} must be 1 or -1")))?,
        tier: tier.parse::<Tier>().map_err(invalid)?,
    })
}

impl QuestionCatalog for SqliteStore {
    fn questions(&self, tiers: &[Tier]) -> Result<Vec<Question>, CatalogError> {
        if tiers.is_empty() {
            return Ok(Vec::new());
        }

        let connection = self
            .lock()
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;
        let placeholders = vec!["?"; tiers.len()].join(", ");
        let sql = format!(
            "SELECT id, type, dimension, direction, question FROM questions WHERE type IN ({placeholders}) ORDER BY id"
        );

        let catalog_unavailable = |err: rusqlite::Error| CatalogError::Unavailable(err.to_string());
        let mut statement = connection.prepare(&sql).map_err(catalog_unavailable)?;
        let rows = statement
            .query_map(
                params_from_iter(tiers.iter().map(|tier| tier.label())),
                |row| -> rusqlite::Result<QuestionRow> {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                },
            )
            .map_err(catalog_unavailable)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(decode_question(row.map_err(catalog_unavailable)?)?);
        }
        Ok(questions)
    }
}

impl ResultRepository for SqliteStore {
    fn insert(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        let dimensions = serde_json::to_string(&record.dimensions)
            .map_err(|err| RepositoryError::Unavailable(format!("encode dimensions: {err}")))?;
        let connection = self.lock()?;

        let outcome = connection.execute(
            "INSERT INTO results (id, type, dimensions, report, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.as_str(),
                record.type_code.to_string(),
                dimensions,
                record.report,
                record.created_at.to_rfc3339(),
            ],
        );

        match outcome {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepositoryError::Conflict)
            }
            Err(err) => Err(unavailable(err)),
        }
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError> {
        let connection = self.lock()?;
        let row: Option<(String, String, String, String, String)> = connection
            .query_row(
                "SELECT id, type, dimensions, report, created_at FROM results WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()
            .map_err(unavailable)?;

        row.map(decode_result).transpose()
    }
}

fn decode_result(
    (id, type_code, dimensions, report, created_at): (String, String, String, String, String),
) -> Result<ResultRecord, RepositoryError> {
    let type_code = type_code.parse().map_err(RepositoryError::Decode)?;
    let dimensions: [DimensionBreakdown; 4] = serde_json::from_str(&dimensions)
        .map_err(|err| RepositoryError::Decode(format!("dimensions for {id}: {err}")))?;
    if AxisScores::from_breakdown(&dimensions).is_none() {
        return Err(RepositoryError::Decode(format!(
            "dimensions for {id} are inconsistent"
        )));
    }
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|err| RepositoryError::Decode(format!("created_at for {id}: {err}")))?
        .with_timezone(&Utc);

    Ok(ResultRecord {
        id: ResultId(id),
        type_code,
        dimensions,
        report,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::standard_questions;
    use crate::assessment::domain::TestDepth;
    use crate::assessment::scoring::{classify, AxisScores};

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().expect("in-memory sqlite opens");
        let questions = standard_questions().expect("bundled bank parses");
        store.seed_questions(&questions).expect("seed succeeds");
        store
    }

    fn record(id: &str) -> ResultRecord {
        let scores = AxisScores::new([62, 40, 50, 81]);
        ResultRecord {
            id: ResultId(id.to_string()),
            type_code: classify(&scores),
            dimensions: scores.breakdown(),
            report: "<div class=\"mbti-report\"></div>".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn seeding_is_idempotent() {
        let store = seeded_store();
        let questions = standard_questions().expect("bundled bank parses");
        assert_eq!(store.seed_questions(&questions).expect("reseed"), 0);
    }

    #[test]
    fn deeper_tiers_include_shallower_questions_in_id_order() {
        let store = seeded_store();
        let simple = store
            .questions(TestDepth::Simple.tiers())
            .expect("simple tier");
        let full = store.questions(TestDepth::Full.tiers()).expect("full tier");

        assert!(simple.iter().all(|question| question.tier == Tier::Simple));
        assert!(full.len() > simple.len());
        assert_eq!(&full[..simple.len()], simple.as_slice());
        assert!(full.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn undecodable_question_row_is_reported() {
        let store = seeded_store();
        store
            .execute_raw("UPDATE questions SET direction = 0 WHERE id = 1")
            .expect("corrupt row");

        let err = store
            .questions(TestDepth::Simple.tiers())
            .expect_err("decode fails");
        assert!(matches!(err, CatalogError::InvalidRow { ref id, .. } if id == "1"));
    }

    #[test]
    fn stored_results_round_trip() {
        let store = seeded_store();
        let original = record("result_roundtrip");
        store.insert(original.clone()).expect("insert succeeds");

        let fetched = store
            .fetch(&original.id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(fetched.type_code, original.type_code);
        assert_eq!(fetched.dimensions, original.dimensions);
        assert_eq!(fetched.report, original.report);
    }

    #[test]
    fn duplicate_ids_conflict() {
        let store = seeded_store();
        store.insert(record("result_dup")).expect("first insert");
        let err = store
            .insert(record("result_dup"))
            .expect_err("second insert rejected");
        assert!(matches!(err, RepositoryError::Conflict));
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = seeded_store();
        let fetched = store
            .fetch(&ResultId("result_missing".to_string()))
            .expect("fetch succeeds");
        assert!(fetched.is_none());
    }

    #[test]
    fn malformed_dimension_payload_is_a_decode_error() {
        let store = seeded_store();
        store
            .execute_raw(
                "INSERT INTO results (id, type, dimensions, report, created_at) \
                 VALUES ('result_bad', 'INTJ', '{\"not\":\"a list\"}', 'r', '2025-01-01T00:00:00+00:00')",
            )
            .expect("raw insert");

        let err = store
            .fetch(&ResultId("result_bad".to_string()))
            .expect_err("decode fails");
        assert!(matches!(err, RepositoryError::Decode(_)));
    }
}
