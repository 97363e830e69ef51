use anyhow::Result;
use clap::Parser;
use finqa_engine::{dataset, loader};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "build_dataset")]
#[command(about = "Generate SQuAD-format training data from the metrics CSV")]
struct Args {
    /// Path to the metrics CSV file
    #[arg(short, long, default_value = "Trent.csv")]
    csv_path: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "squad.json")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let table = loader::load_table(&args.csv_path)?;
    let squad = dataset::build_dataset(&table)?;
    let count: usize = squad.data.iter().map(|d| d.paragraphs.len()).sum();
    dataset::export_squad(&squad, &args.out)?;
    info!("wrote {} QA paragraphs to {}", count, args.out.display());
    Ok(())
}
