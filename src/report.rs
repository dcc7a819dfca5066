//! CSV report generation.
//!
//! Builds the final report rows from evaluated articles and serializes them
//! with a fixed header, either to a file or to stdout. Only relevant
//! articles (at least one company-affiliated author) produce a row.

use crate::classify::ClassificationResult;
use crate::error::Result;
use crate::extract::{Article, NOT_AVAILABLE};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;

/// Fixed column order of the report.
pub const REPORT_HEADER: &[&str] = &[
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One row of the final report.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

/// Build report rows from evaluated articles, keeping only the relevant
/// ones. A missing corresponding email renders as "N/A".
pub fn build_rows(evaluated: &[(Article, ClassificationResult)]) -> Vec<ReportRow> {
    evaluated
        .iter()
        .filter(|(_, result)| result.is_relevant())
        .map(|(article, result)| ReportRow {
            pubmed_id: article.pmid.clone(),
            title: article.title.clone(),
            publication_date: article.publication_date.clone(),
            non_academic_authors: join(&result.non_academic_authors),
            company_affiliations: join(&result.company_affiliations),
            corresponding_email: article
                .corresponding_email
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
        .collect()
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join("; ")
}

/// Write the report to `path`, header included even when `rows` is empty.
pub fn write_csv(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let wtr = csv::WriterBuilder::new().has_headers(true).from_path(path)?;
    write_records(wtr, rows)
}

/// Print the report as CSV on stdout.
pub fn write_stdout(rows: &[ReportRow]) -> Result<()> {
    let wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(io::stdout());
    write_records(wtr, rows)
}

fn write_records<W: io::Write>(mut wtr: csv::Writer<W>, rows: &[ReportRow]) -> Result<()> {
    // serde only emits the header with the first row, so an empty report
    // needs it written explicitly.
    if rows.is_empty() {
        wtr.write_record(REPORT_HEADER)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
