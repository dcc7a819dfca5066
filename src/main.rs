//! pharmascan - PubMed Pharma Affiliation Screener
//!
//! Fetches research papers from PubMed for a search query and reports the
//! ones with authors affiliated to pharmaceutical/biotech companies.
//!
//! ## Usage
//!
//! ```bash
//! pharmascan "cancer immunotherapy" --file results.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pharmascan::{classify::Classifier, eutils::EutilsClient, extract, report};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Fetch research papers from PubMed and identify non-academic authors
/// from pharmaceutical/biotech companies.
#[derive(Parser)]
#[command(name = "pharmascan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// The search query for PubMed (full PubMed query syntax is supported)
    query: String,

    /// Print debug information during execution
    #[arg(short, long)]
    debug: bool,

    /// Save the CSV report to this file instead of printing to stdout
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Maximum number of PubMed IDs to retrieve
    #[arg(long, default_value_t = 20)]
    retmax: usize,

    /// NCBI API key (raises the E-utilities rate limit)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let client = EutilsClient::new(cli.api_key.clone())?;

    let pmids = client
        .search_ids(&cli.query, cli.retmax)
        .await
        .context("PubMed ID search failed")?;

    if pmids.is_empty() {
        println!("No PubMed IDs found for the given query.");
        return Ok(());
    }
    println!("Found {} PubMed IDs. Fetching details...", pmids.len());

    let records = client
        .fetch_article_records(&pmids)
        .await
        .context("PubMed details fetch failed")?;

    if records.is_empty() {
        println!("No articles found in the PubMed API response.");
        return Ok(());
    }

    let classifier = Classifier::new();
    let mut evaluated = Vec::with_capacity(records.len());
    for record in &records {
        // extraction failures are logged and skipped; one bad record must
        // not abort the batch
        let Some(article) = extract::extract_article(record) else {
            continue;
        };
        let result = classifier.evaluate_article(&article);
        debug!(pmid = %article.pmid, relevant = result.is_relevant(), "Evaluated article");
        evaluated.push((article, result));
    }

    let rows = report::build_rows(&evaluated);
    if rows.is_empty() {
        println!(
            "Found 0 relevant papers with pharmaceutical/biotech affiliations among {} processed articles.",
            records.len()
        );
        return Ok(());
    }

    match &cli.file {
        Some(path) => {
            report::write_csv(path, &rows).context("Failed to write CSV report")?;
            println!(
                "Successfully saved {} relevant papers to '{}'",
                rows.len(),
                path.display()
            );
        }
        None => {
            report::write_stdout(&rows).context("Failed to write CSV to stdout")?;
        }
    }

    Ok(())
}
