use std::path::PathBuf;

use anyhow::Context;
use aq_import::{
    extract::{self, AnswerOverrides},
    loader,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "import", about = "Import exam question dumps into the quiz database", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse page*.txt dumps into question_<n>.json files
    Parse {
        /// Directory holding the page*.txt files
        #[arg(long, default_value = ".")]
        pages: PathBuf,
        /// Directory the question files are written to
        #[arg(long, default_value = "json_questions")]
        output: PathBuf,
        /// JSON object of hand-picked answers, e.g. {"18": "AB"}
        #[arg(long)]
        answers: Option<PathBuf>,
    },

    /// Load question_<n>.json files into the database
    Load {
        /// Directory holding the question files
        #[arg(long, default_value = "json_questions")]
        input: PathBuf,
        #[arg(long, env = "DATABASE_URL", default_value = "sqlite://data/quiz.db")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    match Cli::parse().command {
        Command::Parse {
            pages,
            output,
            answers,
        } => parse(pages, output, answers),
        Command::Load {
            input,
            database_url,
        } => load(input, &database_url).await,
    }
}

fn parse(pages: PathBuf, output: PathBuf, answers: Option<PathBuf>) -> anyhow::Result<()> {
    let overrides = match answers {
        Some(path) => extract::read_overrides(&path)?,
        None => AnswerOverrides::new(),
    };

    let report = extract::extract_directory(&pages, &output, &overrides)
        .with_context(|| format!("failed to parse pages in {}", pages.display()))?;

    for rejected in &report.rejected {
        tracing::warn!("Rejected {rejected}");
    }

    println!("Pages: {}", report.pages);
    println!("Questions parsed: {}", report.parsed);
    println!("Saved: {} new JSON files", report.saved);
    println!("Skipped: {} (already exist)", report.skipped);
    println!("Rejected: {}", report.rejected.len());

    Ok(())
}

async fn load(input: PathBuf, database_url: &str) -> anyhow::Result<()> {
    let pool = aq_db::create_pool(database_url, 1).await?;
    aq_db::migrate(&pool).await?;

    let report = loader::load_directory(&pool, &input)
        .await
        .with_context(|| format!("failed to load questions from {}", input.display()))?;
    pool.close().await;

    println!("Imported: {} questions", report.imported);
    println!("Explanations updated: {}", report.explanations_updated);
    println!("Skipped (already exist): {}", report.skipped);
    println!("Failed: {}", report.failed.len());

    if !report.top_tags.is_empty() {
        println!("\nTop AWS services in questions:");
        for tag in &report.top_tags {
            println!("  {}: {}", tag.tag, tag.count);
        }
    }

    Ok(())
}
