use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use chrono::Local;
use clap::Parser;
use rezension::config::ExtractConfig;
use rezension::corpus::{enumerate_documents, process_corpus};
use rezension::export::export_records;
use rezension::interrupt::{run_blocking, Interrupt};
use rezension::{info_time, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rezension", about = "Turns archived review pages into structured records")]
struct Args {
    /// Directory holding the archived `<id>.html` pages
    #[arg(short, long, default_value = "data/raw/html")]
    input: PathBuf,
    /// Directory holding the ignore, city and title lists
    #[arg(short, long, default_value = "resources")]
    resources: PathBuf,
    #[arg(long, default_value = "data/processed/reviews.csv")]
    csv: PathBuf,
    #[arg(long, default_value = "data/processed/reviews.parquet")]
    parquet: PathBuf,
    /// Number of parsing workers (default: available cores)
    #[arg(short = 'j', long)]
    workers: Option<usize>,
    /// Only process the first N documents by id
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let interrupt = Interrupt::on_ctrl_c();

    if let Err(err) = run(Args::parse(), &interrupt).await {
        error!(error = %err, "run failed");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            error!(cause = %cause, "caused by");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run(args: Args, interrupt: &Interrupt) -> Result<()> {
    let start_time = Local::now();
    let workers = args
        .workers
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));

    let resources = args.resources;
    let config = run_blocking(interrupt, move || ExtractConfig::load(&resources)).await?;

    let (input, limit) = (args.input, args.limit);
    let docs = run_blocking(interrupt, move || enumerate_documents(&input, limit)).await?;

    let report = process_corpus(docs, Arc::new(config), workers, interrupt).await?;
    export_records(&args.csv, &args.parquet, report.records, interrupt).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
