//! stocksearch - search a JSON inventory export from the command line.
//!
//! Reads a JSON array of items (`id`, `name`, optional `sku`, `category`,
//! `description`) and prints ranked matches or autocomplete suggestions.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use stocksearch::{InventoryItem, MatchResult, SearchConfig, SortBy};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Relevance,
    Name,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortBy::Relevance,
            SortArg::Name => SortBy::Name,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "stocksearch")]
#[command(about = "Rank inventory items against a query")]
struct Args {
    /// Query text
    query: String,

    /// JSON file holding an array of inventory items
    #[arg(short, long)]
    records: PathBuf,

    /// JSON search configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print autocomplete suggestions instead of results
    #[arg(long)]
    suggest: bool,

    /// Maximum number of results or suggestions
    #[arg(short, long)]
    limit: Option<usize>,

    /// Fuzzy token similarity threshold (0.0 - 1.0)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Minimum record score (0.0 - 1.0)
    #[arg(long)]
    min_score: Option<f64>,

    /// Result ordering
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => SearchConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(limit) = args.limit {
        config.options.max_results = limit;
    }
    if let Some(threshold) = args.threshold {
        config.options.fuzzy_threshold = threshold;
    }
    if let Some(min_score) = args.min_score {
        config.options.min_score = min_score;
    }
    if let Some(sort) = args.sort {
        config.options.sort_by = sort.into();
    }
    let engine = config.into_engine().context("invalid search configuration")?;

    let raw = fs::read_to_string(&args.records)
        .with_context(|| format!("reading records {}", args.records.display()))?;
    let items: Vec<InventoryItem> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing records {}", args.records.display()))?;
    info!(records = items.len(), "records loaded");

    let start = Instant::now();
    if args.suggest {
        let max = engine.options().max_results.min(10);
        let suggestions = engine.suggest(&items, &args.query, max);
        info!(elapsed_micros = start.elapsed().as_micros() as u64, "suggest done");
        if args.json {
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        } else {
            for s in suggestions {
                println!("{s}");
            }
        }
        return Ok(());
    }

    let results = engine.search(&items, &args.query);
    info!(
        returned = results.len(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "search done"
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}", format_result(result));
        }
    }
    Ok(())
}

fn format_result(result: &MatchResult<'_, InventoryItem>) -> String {
    let kind = result.match_kind.map_or("-", |k| k.as_str());
    let fields: Vec<&str> = result.field_names().collect();
    format!(
        "{:.3}  {:<8}  {:<10}  {}  [{}]",
        result.score,
        kind,
        result.record.id,
        result.record.name,
        fields.join(", ")
    )
}
