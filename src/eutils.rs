//! NCBI E-utilities API client.
//!
//! Two endpoints are used:
//! - esearch: query -> list of PMIDs (JSON)
//! - efetch: PMIDs -> full article records (XML)
//!
//! Both are issued as a single bounded request; `retmax` caps the result
//! size and there is deliberately no pagination. An optional NCBI API key
//! raises the service's rate limit.

use crate::error::{PharmascanError, Result};
use crate::extract;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// NCBI E-utilities base URL
const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// E-utilities client for PubMed searches.
pub struct EutilsClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl EutilsClient {
    /// Create a new EutilsClient.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Optional NCBI API key, appended to every request
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pharmascan/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PharmascanError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, api_key })
    }

    /// Search PubMed and return the matching PMIDs.
    ///
    /// A query with zero matches returns an empty vector, not an error.
    pub async fn search_ids(&self, query: &str, retmax: usize) -> Result<Vec<String>> {
        let url = format!("{}/esearch.fcgi", EUTILS_BASE_URL);
        let retmax = retmax.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("db", "pubmed"),
            ("term", query),
            ("retmode", "json"),
            ("retmax", &retmax),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key));
        }

        debug!(query, "Searching PubMed");
        let response = self.client.get(&url).query(&params).send().await?;
        let response = check_status(response, "esearch")?;

        let data: EsearchResponse = response.json().await?;
        let ids = data.esearchresult.idlist;
        info!(count = ids.len(), "esearch complete");
        Ok(ids)
    }

    /// Fetch the raw article records for a list of PMIDs.
    ///
    /// Issues one efetch request for all ids and splits the returned
    /// `<PubmedArticleSet>` into per-article records. An empty id list
    /// short-circuits without any network call.
    pub async fn fetch_article_records(&self, pmids: &[String]) -> Result<Vec<String>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/efetch.fcgi", EUTILS_BASE_URL);
        let id_string = pmids.join(",");

        let mut params: Vec<(&str, &str)> = vec![
            ("db", "pubmed"),
            ("id", &id_string),
            ("retmode", "xml"),
            ("rettype", "full"),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key));
        }

        debug!(ids = pmids.len(), "Fetching article details");
        let response = self.client.get(&url).query(&params).send().await?;
        let response = check_status(response, "efetch")?;

        let xml = response.text().await?;
        let records = extract::split_article_set(&xml)?;
        info!(
            requested = pmids.len(),
            received = records.len(),
            "efetch complete"
        );
        Ok(records)
    }
}

fn check_status(response: reqwest::Response, endpoint: &str) -> Result<reqwest::Response> {
    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(PharmascanError::RateLimited(5));
    }
    if !response.status().is_success() {
        return Err(PharmascanError::Api {
            code: response.status().as_u16() as i32,
            message: format!("E-utilities {} error: {}", endpoint, response.status()),
        });
    }
    Ok(response)
}

// === E-utilities response types ===

#[derive(Debug, Default, Deserialize)]
struct EsearchResponse {
    #[serde(default)]
    esearchresult: EsearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_esearch_response() {
        let body = r#"{
            "header": {"type": "esearch", "version": "0.3"},
            "esearchresult": {
                "count": "2",
                "retmax": "2",
                "retstart": "0",
                "idlist": ["39110000", "39110001"]
            }
        }"#;
        let data: EsearchResponse = serde_json::from_str(body).expect("valid esearch body");
        assert_eq!(data.esearchresult.idlist, vec!["39110000", "39110001"]);
    }

    #[test]
    fn test_parse_esearch_zero_hits() {
        let body = r#"{"esearchresult": {"count": "0", "idlist": []}}"#;
        let data: EsearchResponse = serde_json::from_str(body).expect("valid esearch body");
        assert!(data.esearchresult.idlist.is_empty());
    }

    #[test]
    fn test_parse_esearch_missing_result_defaults_empty() {
        let data: EsearchResponse = serde_json::from_str("{}").expect("valid body");
        assert!(data.esearchresult.idlist.is_empty());
    }
}
