//! # news-clusters
//!
//! Groups a batch of news articles into clusters of near-duplicate stories.
//!
//! ## Usage
//!
//! ```
//! # Cluster a JSON file and print the clusters as JSON
//! news-clusters --input articles.json
//!
//! # Read from stdin, merge near-identical titles, show a table
//! cat articles.json | news-clusters --title-merge --format table
//!
//! # Regroup by company and enrich through the configured LLM
//! news-clusters -i articles.json -o clusters.json --regroup-companies --enrich
//! ```
//!
//! ## Configuration
//!
//! Environment variables (flags take precedence):
//! - `CLUSTER_THRESHOLD`, `CLUSTER_TITLE_MERGE`, `CLUSTER_SCORING`, `CLUSTER_TAG_LIMIT`
//! - `ENRICH_LLM_TYPE` ("ollama" or "openai"), `ENRICH_MODEL`, `ENRICH_TEMPERATURE`,
//!   `ENRICH_CONCURRENCY`, `OLLAMA_HOST`, `OLLAMA_PORT`, `OPENAI_API_KEY`
//! - `CACHE_DATABASE_PATH`: SQLite file for the cluster cache (in-memory when unset)
//! - `EXTRA_COMPANIES`: semicolon-separated names added to company detection
//! - `LOG_DIR`, `RUST_LOG`

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prettytable::{Cell, Row as PrettyRow, Table};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{info, warn};

use news_clusters::article::{normalize_articles, Article};
use news_clusters::clustering::{
    cluster_articles, fill_all_heuristic_content, regroup_by_company, Cluster, ClusterParams,
};
use news_clusters::db::{content_hash, ClusterCache, Database, KeyValueStore, MemoryStore};
use news_clusters::enrichment::enrich_clusters;
use news_clusters::environment::Config;
use news_clusters::logging::configure_logging;
use news_clusters::TARGET_CLUSTER;

const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with an article array or an object holding `articles` (stdin when omitted)
    #[arg(short = 'i', long)]
    input: Option<String>,

    /// Where to write the result (stdout when omitted)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Similarity threshold in [0, 1]
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Merge clusters whose first titles are nearly identical
    #[arg(long)]
    title_merge: bool,

    /// Collapse singleton clusters that name the same company
    #[arg(long)]
    regroup_companies: bool,

    /// Enrich clusters through the configured LLM
    #[arg(long)]
    enrich: bool,

    /// Skip the cluster cache
    #[arg(long)]
    no_cache: bool,

    #[arg(short = 'f', long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(threshold) = args.threshold {
        config.set_threshold(threshold);
    }
    if args.title_merge {
        config.title_merge = true;
    }

    let raw = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    let value: Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;
    let articles = normalize_articles(&value);
    info!(target: TARGET_CLUSTER, "Loaded {} articles", articles.len());

    let params = config.cluster_params();
    let start_time = Instant::now();

    let mut clusters = if args.no_cache {
        cluster_articles(&articles, &params)
    } else if let Some(path) = &config.cache_database_path {
        match Database::new(path).await {
            Ok(db) => cached_clusters(&ClusterCache::new(db), &articles, &params).await,
            Err(e) => {
                warn!(target: TARGET_CLUSTER, "Cache database {} unavailable: {}", path, e);
                cluster_articles(&articles, &params)
            }
        }
    } else {
        cached_clusters(&ClusterCache::new(MemoryStore::new()), &articles, &params).await
    };

    if args.regroup_companies {
        let merged = regroup_by_company(&mut clusters);
        fill_all_heuristic_content(&mut clusters, &params);
        info!(target: TARGET_CLUSTER, "Company regroup merged {} clusters", merged);
    }

    if args.enrich {
        match config.llm_params() {
            Ok(llm_params) => {
                let stats = enrich_clusters(&mut clusters, &llm_params, config.enrich_concurrency).await;
                info!(
                    target: TARGET_CLUSTER,
                    "Enriched {} clusters ({} failed)", stats.enriched, stats.failed
                );
            }
            Err(e) => warn!(target: TARGET_CLUSTER, "Skipping enrichment: {}", e),
        }
    }

    info!(
        target: TARGET_CLUSTER,
        "Produced {} clusters from {} articles in {:.2?}",
        clusters.len(),
        articles.len(),
        start_time.elapsed()
    );

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&clusters)?,
        OutputFormat::Table => render_table(&clusters),
    };

    match &args.output {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .with_context(|| format!("Failed to write {}", path))?,
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Returns cached clusters for this input and params, clustering and storing
/// them on a miss.
async fn cached_clusters<S: KeyValueStore>(
    cache: &ClusterCache<S>,
    articles: &[Article],
    params: &ClusterParams,
) -> Vec<Cluster> {
    let hash = content_hash(articles);
    if let Some(clusters) = cache.get(&hash, params).await {
        info!(target: TARGET_CLUSTER, "Using cached clusters for {}", hash);
        return clusters;
    }

    let clusters = cluster_articles(articles, params);
    cache.put(&hash, params, &clusters).await;
    clusters
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}

fn render_table(clusters: &[Cluster]) -> String {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("ID"),
        Cell::new("Articles"),
        Cell::new("Company"),
        Cell::new("Topic"),
        Cell::new("First Title"),
        Cell::new("Enriched"),
    ]));

    for cluster in clusters {
        table.add_row(PrettyRow::new(vec![
            Cell::new(&cluster.id),
            Cell::new(&cluster.len().to_string()),
            Cell::new(cluster.company.as_deref().unwrap_or("-")),
            Cell::new(&preview(cluster.topic.as_deref().unwrap_or("-"))),
            Cell::new(&preview(cluster.first_title())),
            Cell::new(if cluster.enhanced { "yes" } else { "no" }),
        ]));
    }

    table.to_string()
}
