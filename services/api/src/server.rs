use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryResultRepository};
use crate::routes::{cors_layer, with_assessment_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mbti_insight::assessment::catalog::standard_questions;
use mbti_insight::assessment::{
    AssessmentService, ChatCompletionsClient, ReportGenerator, SqliteStore, StaticQuestionCatalog,
};
use mbti_insight::config::AppConfig;
use mbti_insight::error::AppError;
use mbti_insight::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let client = ChatCompletionsClient::from_config(&config.generation)?;
    let reports = ReportGenerator::new(&config.generation, Arc::new(client));
    if !reports.is_enabled() {
        warn!("DEEPSEEK_API_KEY is not set; results will carry the fallback report");
    }

    let app = match config.storage.database_path.as_ref() {
        Some(path) => {
            let store = Arc::new(SqliteStore::open(path)?);
            store.seed_questions(&standard_questions()?)?;
            with_assessment_routes(Arc::new(AssessmentService::new(
                store.clone(),
                store,
                reports,
            )))
        }
        None => {
            info!("no database path configured; results are kept in memory");
            with_assessment_routes(Arc::new(AssessmentService::new(
                Arc::new(StaticQuestionCatalog::standard()?),
                Arc::new(InMemoryResultRepository::default()),
                reports,
            )))
        }
    };

    let app = app
        .layer(Extension(app_state))
        .layer(cors_layer())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mbti insight service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
