//! PubMed article record extraction.
//!
//! Turns the raw efetch XML into normalized [`Article`] values. The efetch
//! response is a `<PubmedArticleSet>` holding one `<PubmedArticle>` per
//! matched publication; [`split_article_set`] cuts the set into per-article
//! records and [`extract_article`] normalizes a single record.
//!
//! A record that cannot be parsed is skipped (logged, `None`), never fatal:
//! one bad record must not abort the rest of the batch.

use crate::error::{PharmascanError, Result};
use lazy_static::lazy_static;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::warn;

/// Sentinel for fields absent from the source record.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel display name for authors with no usable name fields.
const UNKNOWN_AUTHOR: &str = "Unknown Author";

lazy_static! {
    /// Standard email shape: local part, domain, TLD of at least two letters.
    static ref EMAIL_RE: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("valid email regex");
    /// Inline markup inside text fields (italics in titles and the like).
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").expect("valid tag regex");
}

/// Normalized representation of one publication record.
#[derive(Debug, Clone)]
pub struct Article {
    /// PMID, or "N/A" when the record carries none.
    pub pmid: String,
    /// Article title, or "N/A" when missing.
    pub title: String,
    /// `YYYY[-Mon[-DD]]`, the free-text MedlineDate, or "N/A".
    pub publication_date: String,
    /// Authors in document order.
    pub authors: Vec<Author>,
    /// First email-shaped substring found in any author affiliation, in
    /// document order. Heuristic: the fetched records carry no reliable
    /// corresponding-author marker, so this may belong to any author.
    pub corresponding_email: Option<String>,
}

/// One author of an [`Article`].
#[derive(Debug, Clone)]
pub struct Author {
    /// Display name: "Fore Last", last name, initials, or "Unknown Author".
    pub name: String,
    /// Raw affiliation strings as encountered, trimmed, empties dropped.
    pub affiliations: Vec<String>,
}

/// Split a `<PubmedArticleSet>` document into raw per-article records.
///
/// Returns one XML string per `<PubmedArticle>` element, in document order.
/// A document without articles yields an empty vector; a document that
/// cannot be tokenized yields an error.
pub fn split_article_set(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"PubmedArticle" => {
                let end = e.to_end().into_owned();
                let inner = reader.read_text(end.name())?;
                records.push(format!("<PubmedArticle>{}</PubmedArticle>", inner));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Extract a normalized [`Article`] from one raw `<PubmedArticle>` record.
///
/// Missing fields become their documented sentinels; a structurally
/// malformed record logs the cause and returns `None` so the caller can
/// skip it and continue with the rest of the batch.
pub fn extract_article(record_xml: &str) -> Option<Article> {
    match parse_record(record_xml) {
        Ok(article) => Some(article),
        Err(e) => {
            warn!(error = %e, "Skipping unparseable article record");
            None
        }
    }
}

fn parse_record(xml: &str) -> Result<Article> {
    let mut reader = Reader::from_str(xml);

    let mut pmid: Option<String> = None;
    let mut title: Option<String> = None;
    let mut year: Option<String> = None;
    let mut month: Option<String> = None;
    let mut day: Option<String> = None;
    let mut medline_date: Option<String> = None;
    let mut in_pub_date = false;
    let mut date_done = false;

    let mut authors: Vec<Author> = Vec::new();
    let mut in_author_list = false;
    let mut in_author = false;
    let mut last_name: Option<String> = None;
    let mut fore_name: Option<String> = None;
    let mut initials: Option<String> = None;
    let mut affiliations: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"PMID" if pmid.is_none() => {
                    pmid = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"ArticleTitle" if title.is_none() => {
                    title = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"PubDate" if !date_done => in_pub_date = true,
                b"Year" if in_pub_date && year.is_none() => {
                    year = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"Month" if in_pub_date && month.is_none() => {
                    month = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"Day" if in_pub_date && day.is_none() => {
                    day = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"MedlineDate" if in_pub_date && medline_date.is_none() => {
                    medline_date = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"AuthorList" => in_author_list = true,
                b"Author" if in_author_list => {
                    in_author = true;
                    last_name = None;
                    fore_name = None;
                    initials = None;
                    affiliations = Vec::new();
                }
                b"LastName" if in_author => {
                    last_name = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"ForeName" if in_author => {
                    fore_name = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"Initials" if in_author => {
                    initials = non_empty(read_element_text(&mut reader, &e)?);
                }
                b"Affiliation" if in_author => {
                    if let Some(text) = non_empty(read_element_text(&mut reader, &e)?) {
                        affiliations.push(text);
                    }
                }
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"PubDate" if in_pub_date => {
                    in_pub_date = false;
                    date_done = true;
                }
                b"Author" if in_author => {
                    in_author = false;
                    authors.push(Author {
                        name: display_name(fore_name.take(), last_name.take(), initials.take()),
                        affiliations: std::mem::take(&mut affiliations),
                    });
                }
                b"AuthorList" => in_author_list = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let corresponding_email = authors
        .iter()
        .flat_map(|a| a.affiliations.iter())
        .find_map(|aff| EMAIL_RE.find(aff).map(|m| m.as_str().to_string()));

    Ok(Article {
        pmid: pmid.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        title: title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        publication_date: build_date(year, month, day, medline_date),
        authors,
        corresponding_email,
    })
}

/// Read the inner content of the element opened by `start`, flattening any
/// nested inline markup and resolving character entities.
fn read_element_text(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<String> {
    let end = start.to_end().into_owned();
    let raw = reader.read_text(end.name())?;
    let flat = TAG_RE.replace_all(&raw, "");
    let text = unescape(&flat).map_err(|e| PharmascanError::Parse(e.to_string()))?;
    Ok(text.trim().to_string())
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Name preference: fore + last > last > initials > "Unknown Author".
fn display_name(fore: Option<String>, last: Option<String>, initials: Option<String>) -> String {
    match (fore, last, initials) {
        (Some(f), Some(l), _) => format!("{} {}", f, l),
        (None, Some(l), _) => l,
        (_, None, Some(i)) => i,
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}

/// Year, then month and day when present; MedlineDate as free-text fallback.
fn build_date(
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
    medline_date: Option<String>,
) -> String {
    match year {
        Some(mut date) => {
            if let Some(m) = month {
                date.push('-');
                date.push_str(&m);
            }
            if let Some(d) = day {
                date.push('-');
                date.push_str(&d);
            }
            date
        }
        None => medline_date.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECORD: &str = r#"<PubmedArticle>
  <MedlineCitation Owner="NLM" Status="MEDLINE">
    <PMID Version="1">34567890</PMID>
    <Article PubModel="Print">
      <Journal>
        <JournalIssue CitedMedium="Print">
          <PubDate><Year>2023</Year><Month>Oct</Month><Day>15</Day></PubDate>
        </JournalIssue>
        <Title>Journal of Biotech Research</Title>
      </Journal>
      <ArticleTitle>Novel Gene Therapy for Solid Tumors</ArticleTitle>
      <AuthorList CompleteYN="Y">
        <Author ValidYN="Y">
          <LastName>Smith</LastName>
          <ForeName>John</ForeName>
          <Initials>J</Initials>
          <AffiliationInfo>
            <Affiliation>University of XYZ, Dept. of Biology, City, Country.</Affiliation>
          </AffiliationInfo>
        </Author>
        <Author ValidYN="Y">
          <LastName>Doe</LastName>
          <ForeName>Jane</ForeName>
          <Initials>J</Initials>
          <AffiliationInfo>
            <Affiliation>PharmaCo Inc., R&amp;D Department, Biotech City, Country. jane.doe@pharmaco.com</Affiliation>
          </AffiliationInfo>
        </Author>
      </AuthorList>
    </Article>
  </MedlineCitation>
</PubmedArticle>"#;

    #[test]
    fn test_extract_full_record() {
        let article = extract_article(SAMPLE_RECORD).expect("sample record parses");
        assert_eq!(article.pmid, "34567890");
        assert_eq!(article.title, "Novel Gene Therapy for Solid Tumors");
        assert_eq!(article.publication_date, "2023-Oct-15");
        assert_eq!(article.authors.len(), 2);
        assert_eq!(article.authors[0].name, "John Smith");
        assert_eq!(
            article.authors[0].affiliations,
            vec!["University of XYZ, Dept. of Biology, City, Country.".to_string()]
        );
        assert_eq!(article.authors[1].name, "Jane Doe");
        assert_eq!(
            article.authors[1].affiliations[0],
            "PharmaCo Inc., R&D Department, Biotech City, Country. jane.doe@pharmaco.com"
        );
        assert_eq!(
            article.corresponding_email.as_deref(),
            Some("jane.doe@pharmaco.com")
        );
    }

    #[test]
    fn test_missing_fields_become_sentinels() {
        let record = "<PubmedArticle><MedlineCitation></MedlineCitation></PubmedArticle>";
        let article = extract_article(record).expect("minimal record parses");
        assert_eq!(article.pmid, NOT_AVAILABLE);
        assert_eq!(article.title, NOT_AVAILABLE);
        assert_eq!(article.publication_date, NOT_AVAILABLE);
        assert!(article.authors.is_empty());
        assert!(article.corresponding_email.is_none());
    }

    #[test]
    fn test_date_year_only() {
        let record = "<PubmedArticle><PubDate><Year>2024</Year></PubDate></PubmedArticle>";
        let article = extract_article(record).expect("parses");
        assert_eq!(article.publication_date, "2024");
    }

    #[test]
    fn test_date_medline_fallback() {
        let record =
            "<PubmedArticle><PubDate><MedlineDate>2000 Spring</MedlineDate></PubDate></PubmedArticle>";
        let article = extract_article(record).expect("parses");
        assert_eq!(article.publication_date, "2000 Spring");
    }

    #[test]
    fn test_only_first_pub_date_is_used() {
        let record = "<PubmedArticle>\
            <PubDate><Year>2023</Year></PubDate>\
            <PubDate><Year>1999</Year><Month>Jan</Month></PubDate>\
            </PubmedArticle>";
        let article = extract_article(record).expect("parses");
        assert_eq!(article.publication_date, "2023");
    }

    #[test]
    fn test_title_inline_markup_is_flattened() {
        let record = "<PubmedArticle><ArticleTitle>Role of <i>BRCA1</i> in tumors</ArticleTitle></PubmedArticle>";
        let article = extract_article(record).expect("parses");
        assert_eq!(article.title, "Role of BRCA1 in tumors");
    }

    #[test]
    fn test_author_name_preference_order() {
        let record = "<PubmedArticle><AuthorList>\
            <Author><LastName>Wang</LastName></Author>\
            <Author><Initials>LQ</Initials></Author>\
            <Author><ForeName>Li</ForeName><Initials>L</Initials></Author>\
            <Author><CollectiveName>The XYZ Consortium</CollectiveName></Author>\
            </AuthorList></PubmedArticle>";
        let article = extract_article(record).expect("parses");
        let names: Vec<&str> = article.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Wang", "LQ", "L", "Unknown Author"]);
    }

    #[test]
    fn test_affiliations_flattened_trimmed_and_empties_dropped() {
        let record = "<PubmedArticle><AuthorList><Author>\
            <LastName>Chen</LastName>\
            <AffiliationInfo><Affiliation>  Global Bio-Solutions, Inc., Research Park.  </Affiliation></AffiliationInfo>\
            <AffiliationInfo><Affiliation></Affiliation></AffiliationInfo>\
            <AffiliationInfo><Affiliation>Harvard Medical School, Boston, MA, USA.</Affiliation></AffiliationInfo>\
            </Author></AuthorList></PubmedArticle>";
        let article = extract_article(record).expect("parses");
        assert_eq!(
            article.authors[0].affiliations,
            vec![
                "Global Bio-Solutions, Inc., Research Park.".to_string(),
                "Harvard Medical School, Boston, MA, USA.".to_string(),
            ]
        );
    }

    #[test]
    fn test_first_email_across_article_wins() {
        let record = "<PubmedArticle><AuthorList>\
            <Author><LastName>First</LastName>\
            <Affiliation>Acme Labs, first@acme.example.com</Affiliation></Author>\
            <Author><LastName>Second</LastName>\
            <Affiliation>Other Labs, second@other.example.com</Affiliation></Author>\
            </AuthorList></PubmedArticle>";
        let article = extract_article(record).expect("parses");
        assert_eq!(
            article.corresponding_email.as_deref(),
            Some("first@acme.example.com")
        );
    }

    #[test]
    fn test_malformed_record_yields_none() {
        let record = "<PubmedArticle><MedlineCitation></Wrong></PubmedArticle>";
        assert!(extract_article(record).is_none());
    }

    #[test]
    fn test_split_two_article_set() {
        let set = format!(
            "<?xml version=\"1.0\"?><PubmedArticleSet>{}{}</PubmedArticleSet>",
            "<PubmedArticle><MedlineCitation><PMID>1</PMID></MedlineCitation></PubmedArticle>",
            "<PubmedArticle><MedlineCitation><PMID>2</PMID></MedlineCitation></PubmedArticle>"
        );
        let records = split_article_set(&set).expect("set splits");
        assert_eq!(records.len(), 2);
        assert!(records[0].contains("<PMID>1</PMID>"));
        assert!(records[1].contains("<PMID>2</PMID>"));

        let first = extract_article(&records[0]).expect("split record parses");
        assert_eq!(first.pmid, "1");
    }

    #[test]
    fn test_split_empty_set() {
        let records = split_article_set("<PubmedArticleSet></PubmedArticleSet>").expect("splits");
        assert!(records.is_empty());
    }

    #[test]
    fn test_split_malformed_document_errors() {
        assert!(split_article_set("<PubmedArticleSet><PubmedArticle></Wrong>").is_err());
    }
}
