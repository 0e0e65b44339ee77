//! Precedent - Main CLI Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use precedent::cli::{Args, Commands, Verbosity};
use precedent::config::Config;
use precedent::embedding::CandleEmbedder;
use precedent::llm::GroqClient;
use precedent::pipeline::{IngestionPipeline, RetrievalPipeline};
use precedent::store::{QdrantStore, VectorStore};
use precedent::types::SearchQuery;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbosity());

    let settings = Config::load(args.config.clone())?;
    let store = Arc::new(QdrantStore::connect(
        &settings.qdrant.url,
        settings.qdrant.api_key.as_deref(),
        &settings.qdrant.collection,
    )?);

    match args.command {
        Commands::Ingest { ref files } => {
            run_ingest(&settings, store, files).await?;
        }
        Commands::Search {
            ref query,
            ref team,
            year,
            limit,
        } => {
            run_search(&settings, store, query.clone(), team.clone(), year, limit).await?;
        }
        Commands::Stats => {
            run_stats(store).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_ingest(
    settings: &Config,
    store: Arc<QdrantStore>,
    files: &[PathBuf],
) -> Result<()> {
    let api_key = settings
        .llm
        .api_key
        .as_deref()
        .context("No API key configured. Set GROQ_API_KEY or llm.api_key in config.toml")?;

    let completion = Arc::new(GroqClient::new(
        &settings.llm.api_base,
        api_key,
        &settings.llm.model,
    )?);

    println!("Loading embedding model ({})...", settings.embedding.model_id);
    let embedder = Arc::new(CandleEmbedder::load(&settings.embedding.model_id)?);

    store
        .ensure_collection(settings.embedding.dimension as u64)
        .await?;

    let pipeline = IngestionPipeline::new(completion, embedder, store);

    let mut stored_total = 0usize;
    let mut failures = 0usize;

    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let raw_text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), filename, e);
                failures += 1;
                continue;
            }
        };

        match pipeline.ingest(&raw_text, &filename).await {
            Ok(count) => {
                println!(
                    "{} {}: {} decision{} indexed",
                    "✓".green(),
                    filename,
                    count,
                    if count == 1 { "" } else { "s" }
                );
                stored_total += count;
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), filename, e);
                failures += 1;
            }
        }
    }

    println!(
        "\n{} {} decision{} indexed from {} file{}",
        "Done:".bold(),
        stored_total,
        if stored_total == 1 { "" } else { "s" },
        files.len() - failures,
        if files.len() - failures == 1 { "" } else { "s" }
    );

    if failures == files.len() {
        bail!("All input files failed");
    }

    Ok(())
}

async fn run_search(
    settings: &Config,
    store: Arc<QdrantStore>,
    query: String,
    team: Option<String>,
    year: Option<i32>,
    limit: usize,
) -> Result<()> {
    println!("Loading embedding model ({})...", settings.embedding.model_id);
    let embedder = Arc::new(CandleEmbedder::load(&settings.embedding.model_id)?);

    let pipeline = RetrievalPipeline::new(embedder, store);
    let search = SearchQuery {
        query,
        filter_team: team,
        filter_year: year,
        limit,
    };

    let results = pipeline.retrieve(&search).await?;

    if results.is_empty() {
        println!(
            "{}",
            "No sufficiently relevant decisions found.".yellow()
        );
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let decision = &result.decision;

        println!(
            "\n{} {} {}",
            format!("{}.", rank + 1).bold(),
            decision.title.bold(),
            format!("(score {:.2})", result.score).dimmed()
        );
        println!(
            "   {} | {} | {}",
            decision.team,
            decision.date,
            decision.source_file.dimmed()
        );
        if !decision.tags.is_empty() {
            println!("   {}", decision.tags.join(", ").cyan());
        }
        println!("   {}", snippet(&result.context, 240));
        if let Some(outcome) = &decision.outcome {
            println!("   {} {}", "Outcome:".bold(), outcome);
        }
    }
    println!();

    Ok(())
}

async fn run_stats(store: Arc<QdrantStore>) -> Result<()> {
    let count = store.count().await?;
    println!(
        "{} {} decision record{} indexed",
        "Store:".bold(),
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Truncate display text on a character boundary.
fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}
