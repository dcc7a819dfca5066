//! Pharma/biotech affiliation classification.
//!
//! Decides whether an affiliation string describes a commercial
//! (pharmaceutical/biotech) organization rather than an academic
//! institution, and extracts the best available company label when it does.
//!
//! The heuristic is deliberately rule-based: three independent signal sets
//! (academic keywords, industry-sector keywords, legal-entity suffixes plus
//! a named-company roster) feed one decision function. Any explicit company
//! signal overrides a lone academic keyword match; an affiliation with no
//! signal at all is treated as non-company.

use crate::extract::Article;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

/// Institutional keywords; a whole-word match counts as an academic signal.
const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "hospital",
    "school of",
    "department of",
    "institute of",
    "medical center",
    "clinic",
    "academy",
    "foundation",
    "nih",
    "cdc",
    "fda",
    "who",
    "nhs",
    "health system",
];

/// Generic industry-sector keywords; a whole-word match counts as a company
/// signal.
const SECTOR_KEYWORDS: &[&str] = &[
    "pharmaceutical",
    "pharma",
    "drug company",
    "biotech",
    "biotechnology",
    "therapeutics",
    "diagnostics",
    "biosciences",
    "genomics",
    "laboratories",
    "r&d",
    "research & development",
];

/// Built-in roster of known pharmaceutical/biotech players, matched as
/// case-insensitive substrings. English/Western-pharma centric; swap the
/// roster with [`Classifier::with_roster`] when a broader list is needed.
const NAMED_COMPANIES: &[&str] = &[
    "AbbVie",
    "Pfizer",
    "Novartis",
    "Roche",
    "Merck",
    "Janssen",
    "AstraZeneca",
    "Gilead",
    "Amgen",
    "Sanofi",
    "Bayer",
    "Eli Lilly",
    "GlaxoSmithKline",
    "Regeneron",
    "Vertex",
    "Biogen",
    "Moderna",
    "BioNTech",
    "Novo Nordisk",
    "Teva",
    "Mylan",
    "Daiichi Sankyo",
    "Takeda",
    "Chiesi",
    "Grunenthal",
    "Gyala Therapeutics",
    "Biosfer Teslab",
];

/// Qualifiers that suppress "research center"/"research institute" as an
/// academic signal: such units are typically application-specific rather
/// than pure academic departments.
const RESEARCH_UNIT_QUALIFIERS: &[&str] = &[
    " for cancer",
    " for disease",
    " for clinical",
    " for innovation",
    " for translational",
];

lazy_static! {
    static ref ACADEMIC_RE: Regex = word_list_regex(ACADEMIC_KEYWORDS);
    static ref SECTOR_RE: Regex = word_list_regex(SECTOR_KEYWORDS);
    /// Corporate legal-entity suffixes, matched as whole tokens. The dotted
    /// forms anchor on a leading separator instead of `\b` on both sides: a
    /// trailing `\b` after a period can never match before punctuation, and
    /// a bare leading `\b` would match the tail of "u.s.a.".
    static ref SUFFIX_RE: Regex = Regex::new(
        r"\b(?:inc|llc|corp|co|ag|gmbh|limited|plc)\b|(?:^|[\s,(])s\.a\.|\bpte ltd\b|(?:^|[\s,(])s\.l\."
    )
    .expect("valid suffix regex");
    static ref RESEARCH_UNIT_RE: Regex =
        Regex::new(r"\bresearch (?:center|institute)\b").expect("valid research unit regex");
    /// Capitalized phrase ending in a legal suffix, matched over the
    /// original (non-lowercased) text for label extraction.
    static ref COMPANY_LABEL_RE: Regex = Regex::new(
        r"(?i)\b([A-Z][a-z0-9\s,.&-]+?\b(?:inc|llc|corp|co|gmbh|ag|ltd|s\.a\.|pte ltd|plc|s\.l\.)\.?)\b"
    )
    .expect("valid company label regex");
}

fn word_list_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("valid keyword regex")
}

/// Signals detected in one normalized (lowercased) affiliation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Signals {
    academic: bool,
    sector: bool,
    suffix: bool,
    entity: bool,
}

/// Per-article aggregation of company-affiliated authors.
///
/// Invariant: a name is in `non_academic_authors` iff at least one of that
/// author's affiliations classified as company-affiliated. Both sets
/// deduplicate by exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Display names of authors with at least one company affiliation.
    pub non_academic_authors: BTreeSet<String>,
    /// Every company label extracted from the article's affiliations.
    pub company_affiliations: BTreeSet<String>,
}

impl ClassificationResult {
    /// An article is worth reporting iff any author classified as
    /// company-affiliated.
    pub fn is_relevant(&self) -> bool {
        !self.non_academic_authors.is_empty()
    }
}

struct RosterEntry {
    label: String,
    needle: String,
}

/// Affiliation classifier with a swappable named-company roster.
///
/// The generic keyword and suffix tables are immutable static data compiled
/// once; only the roster is per-instance.
pub struct Classifier {
    roster: Vec<RosterEntry>,
}

impl Classifier {
    /// Classifier with the built-in named-company roster.
    pub fn new() -> Self {
        Self::with_roster(NAMED_COMPANIES.iter().map(|s| s.to_string()))
    }

    /// Classifier with a caller-supplied roster. Entries are matched as
    /// case-insensitive substrings and returned verbatim as labels.
    pub fn with_roster<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let roster = entries
            .into_iter()
            .map(|label| RosterEntry {
                needle: label.to_lowercase(),
                label,
            })
            .collect();
        Self { roster }
    }

    /// Classify one affiliation string.
    ///
    /// Returns `Some(company_label)` when the text reads as a commercial
    /// organization, `None` otherwise. Pure function of the input and the
    /// classifier's lexicon; matching is case-insensitive throughout.
    pub fn classify(&self, affiliation: &str) -> Option<String> {
        let lower = affiliation.to_lowercase();
        let signals = self.signals(&lower);
        if !is_company_affiliated(signals) {
            return None;
        }
        Some(self.extract_label(affiliation, &lower))
    }

    /// Evaluate every affiliation of every author of `article`.
    ///
    /// Every extracted label lands in the company set, not just the first
    /// per author; authors whose affiliations all classify as `None` stay
    /// out of the non-academic set entirely.
    pub fn evaluate_article(&self, article: &Article) -> ClassificationResult {
        let mut result = ClassificationResult::default();

        for author in &article.authors {
            let mut company_affiliated = false;
            for affiliation in &author.affiliations {
                if let Some(label) = self.classify(affiliation) {
                    result.company_affiliations.insert(label);
                    company_affiliated = true;
                }
            }
            if company_affiliated {
                result.non_academic_authors.insert(author.name.clone());
            }
        }

        result
    }

    fn signals(&self, lower: &str) -> Signals {
        Signals {
            academic: has_academic_signal(lower),
            sector: SECTOR_RE.is_match(lower),
            suffix: SUFFIX_RE.is_match(lower),
            entity: self.matched_entity(lower).is_some(),
        }
    }

    fn matched_entity(&self, lower: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|e| lower.contains(&e.needle))
    }

    /// Label priority: roster entry > capitalized suffix phrase > the full
    /// trimmed affiliation. The fallback guarantees a non-empty label for
    /// every company classification.
    fn extract_label(&self, original: &str, lower: &str) -> String {
        if let Some(entry) = self.matched_entity(lower) {
            return entry.label.clone();
        }
        if let Some(m) = COMPANY_LABEL_RE.captures(original).and_then(|c| c.get(1)) {
            return m.as_str().trim().to_string();
        }
        original.trim().to_string()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Decision rule over the detected signals. Academic keywords alone are a
/// weak signal; any explicit company signal overrides them. No signal
/// either way defaults to non-company.
fn is_company_affiliated(signals: Signals) -> bool {
    let has_company = signals.sector || signals.suffix || signals.entity;
    if signals.academic && !has_company {
        return false;
    }
    has_company
}

/// Academic keyword match, with "research center"/"research institute"
/// suppressed when immediately followed by one of the application-specific
/// qualifiers.
fn has_academic_signal(lower: &str) -> bool {
    if ACADEMIC_RE.is_match(lower) {
        return true;
    }
    RESEARCH_UNIT_RE.find_iter(lower).any(|m| {
        let rest = &lower[m.end()..];
        !RESEARCH_UNIT_QUALIFIERS.iter().any(|q| rest.starts_with(q))
    })
}
