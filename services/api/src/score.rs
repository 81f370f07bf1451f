use crate::infra::{parse_answer, parse_depth, InMemoryResultRepository};
use clap::Args;
use mbti_insight::assessment::{
    describe_axis, AssessmentService, AxisScores, ChatCompletionsClient, Dimension,
    QuestionCatalog, ReportGenerator, ResultRecord, StaticQuestionCatalog, TestDepth,
};
use mbti_insight::config::AppConfig;
use mbti_insight::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// Test depth: simple, detailed, or full
    #[arg(long, default_value = "simple", value_parser = parse_depth)]
    pub(crate) depth: TestDepth,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Test depth the answers were given for
    #[arg(long, default_value = "simple", value_parser = parse_depth)]
    pub(crate) depth: TestDepth,
    /// Comma-separated answers on the 1-7 scale, in question order
    #[arg(
        long,
        required = true,
        value_delimiter = ',',
        allow_negative_numbers = true,
        value_parser = parse_answer
    )]
    pub(crate) answers: Vec<i64>,
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let catalog = StaticQuestionCatalog::standard()?;
    let questions = catalog.questions(args.depth.tiers())?;

    println!("{} test ({} questions)", args.depth.label(), questions.len());
    for (position, question) in questions.iter().enumerate() {
        println!("{:>3}. [{}] {}", position + 1, question.dimension, question.prompt);
    }
    println!("\nAnswer each question from 1 (strongly disagree) to 7 (strongly agree).");
    Ok(())
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let reports = ReportGenerator::new(
        &config.generation,
        Arc::new(ChatCompletionsClient::from_config(&config.generation)?),
    );
    let service = AssessmentService::new(
        Arc::new(StaticQuestionCatalog::standard()?),
        Arc::new(InMemoryResultRepository::default()),
        reports,
    );

    let record = service.submit(args.depth, &args.answers).await?;
    print!("{}", render_result(&record));
    Ok(())
}

fn render_result(record: &ResultRecord) -> String {
    let mut output = format!("Result {}\nType: {}\n\nDimensions\n", record.id, record.type_code);
    if let Some(scores) = AxisScores::from_breakdown(&record.dimensions) {
        for dimension in Dimension::ALL {
            output.push_str(&format!("  {}\n", describe_axis(dimension, &scores)));
        }
    }
    output.push_str(&format!("\nReport\n{}\n", record.report));
    output
}
