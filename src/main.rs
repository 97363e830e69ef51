use anyhow::Result;
use clap::Parser;
use finqa_engine::config::QaConfig;
use finqa_engine::engine::QaEngine;
use finqa_engine::fallback::HfQaClient;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "finqa-engine")]
#[command(about = "Question answering over a quarterly financial metrics table")]
struct Args {
    /// Question to answer; omit to start an interactive loop
    question: Option<String>,

    /// Path to the metrics CSV file
    #[arg(short, long)]
    csv_path: Option<PathBuf>,

    /// Fallback QA model identifier
    #[arg(long)]
    model: Option<String>,

    /// Inference API token (or set QA_API_TOKEN env var)
    #[arg(long)]
    api_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = QaConfig::default();
    if let Some(path) = args.csv_path {
        config.csv_path = path;
    }
    if let Some(model) = args.model {
        config.model_id = model;
    }
    let api_token = args
        .api_token
        .or_else(|| std::env::var("QA_API_TOKEN").ok())
        .unwrap_or_default();

    info!("loading metrics table from {}", config.csv_path.display());
    let fallback = Box::new(HfQaClient::new(config.model_id.clone(), api_token));
    let engine = QaEngine::from_config(config, fallback)?;

    if let Some(question) = args.question {
        println!("{}", engine.answer_query(&question).await);
        return Ok(());
    }

    println!("CSV Q&A System - type 'exit' to quit.");
    let stdin = io::stdin();
    loop {
        print!("Your question: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        println!("{}", engine.answer_query(question).await);
    }
    Ok(())
}
