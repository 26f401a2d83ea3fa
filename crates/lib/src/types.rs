//! # Core Data Structures
//!
//! The types that flow through the search pipeline and out over the wire.
//! `VerseResult` and `WordDetail` serialize exactly as the HTTP API exposes
//! them, so handlers return them directly without a mapping layer.

use serde::{Deserialize, Serialize};

/// A verse returned by the nearest-neighbor query, before enrichment.
///
/// Carries the row id so the enrichment join can address the verse without
/// re-deriving its reference.
#[derive(Debug, Clone, PartialEq)]
pub struct VerseHit {
    pub verse_id: i64,
    pub book_name: String,
    pub chapter_num: i64,
    pub verse_num: i64,
    pub text: String,
    /// Cosine similarity against the query vector, clamped to `[0.0, 1.0]`.
    pub similarity: f64,
}

/// One word of a tagged verse, with its lexicon and morphology data joined
/// in. Every field past the surface text is nullable: a word may carry no
/// Strong's ID, an ID may have no lexicon entry, and a grammar code may have
/// no morphology description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetail {
    pub word_text: String,
    pub word_position: i64,
    pub strongs_id: Option<String>,
    pub lemma: Option<String>,
    pub definition: Option<String>,
    pub morphology_code: Option<String>,
    pub morphology_description: Option<String>,
}

/// A fully assembled search result: one verse plus its word-level detail.
///
/// For untagged translations `words` is always empty. The order of `words`
/// follows `word_position` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseResult {
    pub book_name: String,
    pub chapter_num: i64,
    pub verse_num: i64,
    pub text: String,
    pub similarity: f64,
    pub words: Vec<WordDetail>,
}

impl VerseResult {
    /// Assembles a result from a ranked hit and its (possibly empty) words.
    pub fn from_hit(hit: VerseHit, words: Vec<WordDetail>) -> Self {
        Self {
            book_name: hit.book_name,
            chapter_num: hit.chapter_num,
            verse_num: hit.verse_num,
            text: hit.text,
            similarity: hit.similarity,
            words,
        }
    }
}

/// How a set of Strong's IDs is applied to enriched results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrongsMode {
    /// Keep only verses containing at least one of the IDs.
    #[default]
    Filter,
    /// Keep every verse, but boost the ranking of verses containing the IDs.
    Boost,
}

/// A single lexicon entry, as served by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub strongs_id: String,
    pub language: crate::translation::OriginalLanguage,
    pub lemma: Option<String>,
    pub transliteration: Option<String>,
    pub definition: Option<String>,
}
