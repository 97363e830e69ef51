use async_trait::async_trait;
use finqa_engine::config::QaConfig;
use finqa_engine::engine::QaEngine;
use finqa_engine::error::Result;
use finqa_engine::fallback::FallbackAnswerer;
use finqa_engine::loader;
use std::path::PathBuf;
use std::sync::Mutex;

const CSV: &str = "\
Topics, Sep-24 , Jun-24 ,Mar-24,Dec-23
 Net Sales/Income from Operations ,\"4,156.67\",\"3,971.65\",\"3,312.61\",\"3,546.98\"
 Net Profit/(Loss) for the period ,150,100,235.5,
Other Expenses ,200,180,0,170
Tax,50,45,40,35
";

/// Records every deferred question; answers with a fixed span.
#[derive(Default)]
struct RecordingFallback {
    questions: Mutex<Vec<String>>,
}

#[async_trait]
impl FallbackAnswerer for RecordingFallback {
    async fn answer(&self, question: &str, _context: &str) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok("model span".to_string())
    }
}

fn write_csv(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("metrics.csv");
    std::fs::write(&path, CSV).unwrap();
    path
}

fn build_engine(dir: &tempfile::TempDir) -> (QaEngine, std::sync::Arc<RecordingFallback>) {
    let path = write_csv(dir);
    let table = loader::load_table(&path).unwrap();
    let fallback = std::sync::Arc::new(RecordingFallback::default());

    struct Shared(std::sync::Arc<RecordingFallback>);

    #[async_trait]
    impl FallbackAnswerer for Shared {
        async fn answer(&self, question: &str, context: &str) -> Result<String> {
            self.0.answer(question, context).await
        }
    }

    let engine = QaEngine::new(
        QaConfig::default(),
        table,
        Box::new(Shared(fallback.clone())),
    );
    (engine, fallback)
}

#[tokio::test]
async fn test_fact_lookup_contains_exact_value() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let answer = engine.answer_query("What is the revenue for Q3?").await;
    assert_eq!(
        answer,
        "The net sales/income from operations for sep-24 is 4156.67."
    );

    let answer = engine.answer_query("What is the tax for September 2024?").await;
    assert_eq!(answer, "The tax for sep-24 is 50.");
}

#[tokio::test]
async fn test_compare_profit_q2_vs_q3() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let answer = engine.answer_query("Compare profit Q2 vs Q3").await;
    assert_eq!(
        answer,
        "net profit/(loss) for the period changed from 100 (jun-24) to 150 (sep-24). \
         Increase of 50.00%"
    );
}

#[tokio::test]
async fn test_yesno_direction_agreement() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let answer = engine
        .answer_query("Did revenue increase from Q2 to Q3?")
        .await;
    assert!(answer.ends_with("Answer: yes"), "answer was: {}", answer);
    assert!(answer.contains("3971.65"));
    assert!(answer.contains("4156.67"));

    // Stated direction contradicts the observed one.
    let answer = engine
        .answer_query("Did revenue decrease from Q2 to Q3?")
        .await;
    assert!(answer.ends_with("Answer: no"), "answer was: {}", answer);
}

#[tokio::test]
async fn test_growth_and_comparison_report_same_percent() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let growth = engine
        .answer_query("What is the tax growth from Q4 to Q1?")
        .await;
    let comparison = engine.answer_query("Compare tax Q4 vs Q1").await;
    assert!(growth.contains("14.29%"), "growth was: {}", growth);
    assert!(comparison.contains("14.29%"), "comparison was: {}", comparison);
}

#[tokio::test]
async fn test_blank_cell_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let answer = engine.answer_query("What is the profit for Q4?").await;
    assert_eq!(
        answer,
        "Could not find net profit/(loss) for the period data for dec-23"
    );
}

#[tokio::test]
async fn test_zero_base_has_defined_message() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let answer = engine
        .answer_query("Did expenses increase from Q1 to Q2?")
        .await;
    assert_eq!(
        answer,
        "Cannot compute change for other expenses: base value for mar-24 is zero"
    );
}

#[tokio::test]
async fn test_unresolved_question_reaches_fallback_with_raw_question() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, fallback) = build_engine(&dir);

    let question = "Summarize the company outlook";
    let answer = engine.answer_query(question).await;
    assert_eq!(answer, "model span");
    assert_eq!(*fallback.questions.lock().unwrap(), vec![question.to_string()]);
}

#[tokio::test]
async fn test_idempotent_answers() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = build_engine(&dir);

    let first = engine.answer_query("Did profit increase from Q2 to Q3?").await;
    let second = engine.answer_query("Did profit increase from Q2 to Q3?").await;
    assert_eq!(first, second);
}
