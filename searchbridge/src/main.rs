use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use searchbridge::output::table::render_table;
use searchbridge::Dependencies;
use searchbridge_pipeline::IndexReport;
use searchbridge_shared::EntityMapping;

#[derive(Parser)]
#[command(name = "searchbridge")]
#[command(about = "Bridges relational records to an Elasticsearch index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index all registered entities
    IndexAll {
        /// Purge each index before indexing
        #[arg(long)]
        purge: bool,
    },
    /// Index a single entity
    IndexModel {
        /// Entity identifier, e.g. BlogPost
        model: String,
        /// Purge the index before indexing
        #[arg(long)]
        purge: bool,
    },
    /// Apply an entity's field mapping to its index
    PutMapping {
        /// Entity identifier, e.g. BlogPost
        model: String,
        /// Delete and recreate the index first
        #[arg(long)]
        purge: bool,
    },
    /// Show the search engine version
    Version,
    /// Show per-index document counts
    Status,
    /// Search all registered entities
    Search {
        /// The search term
        term: String,
        /// Exact-match filter, repeatable
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let deps = Dependencies::new().await?;

    match cli.command {
        Commands::IndexAll { purge } => {
            let reports = deps.indexer.index_all(&deps.registry, purge).await?;
            for report in &reports {
                print_report(report);
            }
        }
        Commands::IndexModel { model, purge } => {
            let entity = lookup(&deps, &model)?;
            let report = deps.indexer.index_entity(entity.as_ref(), purge).await?;
            print_report(&report);
        }
        Commands::PutMapping { model, purge } => {
            let entity = lookup(&deps, &model)?;
            deps.mappings.apply(entity.as_ref(), purge).await?;
            println!("{} mapping updated", entity.name());
        }
        Commands::Version => {
            let info = deps.status.version().await?;
            println!(
                "Elasticsearch version {} (lucene {})",
                info.version, info.lucene_version
            );
        }
        Commands::Status => {
            let rows = deps.status.status().await?;
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.index.clone(),
                        row.kind.clone(),
                        row.count.to_string(),
                        row.shards.clone(),
                    ]
                })
                .collect();
            print!(
                "{}",
                render_table(&["Index", "Kind", "Count", "Shards"], &cells)
            );
        }
        Commands::Search { term, filters } => {
            let filters = parse_filters(&filters)?;
            let results = deps.dispatcher.search(&term, &filters).await?;
            for result in &results {
                println!("{} ({} hits)", result.index, result.total());
                for hit in result.hits() {
                    println!("  {}", serde_json::to_string(&hit["_source"])?);
                }
            }
        }
    }

    Ok(())
}

fn lookup(deps: &Dependencies, model: &str) -> Result<Arc<dyn EntityMapping>> {
    deps.registry
        .get(model)
        .ok_or_else(|| anyhow!("Unknown model: {}", model))
}

fn print_report(report: &IndexReport) {
    println!(
        "Indexed {}/{} {} documents in {} batches ({} ms)",
        report.indexed, report.total_records, report.index, report.batches, report.duration_ms
    );
    for failure in report.item_failures.iter().take(5) {
        eprintln!("  rejected {}: {}", failure.doc_id, failure.reason);
    }
    if report.item_failures.len() > 5 {
        eprintln!("  ... and {} more rejections", report.item_failures.len() - 5);
    }
    for failure in &report.batch_failures {
        eprintln!(
            "  batch {} ({} docs) not delivered: {}",
            failure.batch, failure.size, failure.error
        );
    }
}

fn parse_filters(raw: &[String]) -> Result<Map<String, Value>> {
    let mut filters = Map::new();
    for item in raw {
        let (field, value) = item
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid filter '{}', expected FIELD=VALUE", item))?;
        filters.insert(field.to_string(), json!(value));
    }
    Ok(filters)
}
