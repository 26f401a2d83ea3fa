//! # berea: Semantic Bible Verse Search
//!
//! This library composes three independently simple pieces into a verse
//! search pipeline:
//!
//! 1. **Similarity search**: query text is embedded by an external,
//!    OpenAI-compatible provider, and the nearest verses are fetched with a
//!    cosine-distance query against stored embeddings.
//! 2. **Lexical enrichment**: for Strong's-tagged translations, the ranked
//!    page of verses is joined (in one batched query) against word, lexicon
//!    and morphology tables, and the flat rows are regrouped into nested
//!    per-verse word lists.
//! 3. **Strong's-ID post-processing**: the enriched page can be filtered to
//!    verses containing given IDs, or re-ranked with a small boost per
//!    matching word.
//!
//! The supported translations form a closed set (see [`Translation`]);
//! English translations carry no word-level tagging and enrich to empty
//! word lists rather than erroring. All fallible paths return
//! [`SearchError`], which distinguishes caller mistakes from dependency
//! timeouts and outages so an HTTP layer can map them to proper status
//! codes.

pub mod constants;
pub mod enrich;
pub mod errors;
pub mod providers;
pub mod rerank;
pub mod search;
pub mod translation;
pub mod types;

pub use errors::SearchError;
pub use search::{search, search_with_lexicon, verse_with_lexicon, StrongsSelection};
pub use translation::{LexiconTables, OriginalLanguage, Translation};
pub use types::{LexiconEntry, StrongsMode, VerseHit, VerseResult, WordDetail};
