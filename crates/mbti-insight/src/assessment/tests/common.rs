use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::catalog::StaticQuestionCatalog;
use crate::assessment::domain::{Dimension, Polarity, Question, ResultId, Tier};
use crate::assessment::report::{
    GenerationError, GenerationRequest, ReportGenerator, TextGenerator,
};
use crate::assessment::repository::{RepositoryError, ResultRecord, ResultRepository};
use crate::assessment::{assessment_router, AssessmentService};
use crate::config::GenerationConfig;

pub(super) fn question(id: u32, dimension: Dimension, polarity: Polarity, tier: Tier) -> Question {
    Question {
        id,
        prompt: format!("Question {id} about {dimension}"),
        dimension,
        polarity,
        tier,
    }
}

/// Eight simple questions, two per axis, alternating forward and reverse.
pub(super) fn toy_questions() -> Vec<Question> {
    let mut questions = Vec::new();
    for (offset, dimension) in Dimension::ALL.into_iter().enumerate() {
        let id = offset as u32 * 2 + 1;
        questions.push(question(id, dimension, Polarity::Forward, Tier::Simple));
        questions.push(question(id + 1, dimension, Polarity::Reverse, Tier::Simple));
    }
    questions
}

/// Toy catalog spread over all three tiers.
pub(super) fn tiered_catalog() -> StaticQuestionCatalog {
    let mut questions = toy_questions();
    for (offset, dimension) in Dimension::ALL.into_iter().enumerate() {
        questions.push(question(
            20 + offset as u32,
            dimension,
            Polarity::Forward,
            Tier::Detailed,
        ));
        questions.push(question(
            40 + offset as u32,
            dimension,
            Polarity::Reverse,
            Tier::Full,
        ));
    }
    StaticQuestionCatalog::new(questions)
}

pub(super) fn generation_config(api_key: Option<&str>) -> GenerationConfig {
    GenerationConfig {
        api_key: api_key.map(str::to_string),
        timeout: Duration::from_secs(5),
        ..GenerationConfig::default()
    }
}

/// Generator that counts calls and answers with a fixed script.
pub(super) struct ScriptedGenerator {
    reply: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(super) fn replying(content: &str) -> Self {
        Self {
            reply: Ok(content.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            ..Self::replying("")
        }
    }

    pub(super) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(request.prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(GenerationError::Transport)
    }
}

pub(super) fn report_generator(
    api_key: Option<&str>,
    generator: Arc<ScriptedGenerator>,
) -> ReportGenerator {
    ReportGenerator::new(&generation_config(api_key), generator)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ResultId, ResultRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ResultRepository for MemoryRepository {
    fn insert(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl ResultRepository for UnavailableRepository {
    fn insert(&self, _record: ResultRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Repository that holds the calling thread for `delay` on every insert.
pub(super) struct SlowRepository {
    delay: Duration,
    inner: MemoryRepository,
}

impl SlowRepository {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: MemoryRepository::default(),
        }
    }
}

impl ResultRepository for SlowRepository {
    fn insert(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        std::thread::sleep(self.delay);
        self.inner.insert(record)
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError> {
        self.inner.fetch(id)
    }
}

/// Repository whose stored rows can no longer be decoded.
pub(super) struct CorruptRepository;

impl ResultRepository for CorruptRepository {
    fn insert(&self, _record: ResultRecord) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn fetch(&self, _id: &ResultId) -> Result<Option<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Decode("type code 'XXXX'".to_string()))
    }
}

pub(super) fn build_service(
    api_key: Option<&str>,
) -> (
    AssessmentService<StaticQuestionCatalog, MemoryRepository>,
    Arc<MemoryRepository>,
    Arc<ScriptedGenerator>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let generator = Arc::new(ScriptedGenerator::replying("```html\n<div>report</div>\n```"));
    let service = AssessmentService::new(
        Arc::new(tiered_catalog()),
        repository.clone(),
        report_generator(api_key, generator.clone()),
    );
    (service, repository, generator)
}

pub(super) fn router_with_service<R>(
    service: AssessmentService<StaticQuestionCatalog, R>,
) -> axum::Router
where
    R: ResultRepository + 'static,
{
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
