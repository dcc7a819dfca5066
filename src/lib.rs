//! # pharmascan
//!
//! PubMed Pharma Affiliation Screener
//!
//! Searches PubMed for a query, fetches the matching article records, and
//! reports the papers with at least one author affiliated to a
//! pharmaceutical/biotech company.
//!
//! ## Modules
//!
//! - [`eutils`] - NCBI E-utilities client (esearch/efetch)
//! - [`extract`] - Article record splitting and normalization
//! - [`classify`] - Pharma/biotech affiliation classification
//! - [`report`] - CSV report generation
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pharmascan::{classify::Classifier, eutils::EutilsClient, extract};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EutilsClient::new(None)?;
//!     let pmids = client.search_ids("cancer immunotherapy", 20).await?;
//!     let records = client.fetch_article_records(&pmids).await?;
//!
//!     let classifier = Classifier::new();
//!     for record in &records {
//!         if let Some(article) = extract::extract_article(record) {
//!             let result = classifier.evaluate_article(&article);
//!             println!("{}: {} non-academic authors", article.pmid,
//!                 result.non_academic_authors.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod error;
pub mod eutils;
pub mod extract;
pub mod report;

pub use error::{PharmascanError, Result};
