//! # Search Pipeline
//!
//! Composition of the whole request flow: validate input, embed the query
//! text, run the nearest-neighbor query, enrich with word-level data, then
//! apply any Strong's-ID filter or boost.
//!
//! Ordering matters here. Validation runs before any network call, and the
//! embedding call completes before a database connection is taken, so a
//! slow provider never sits on a connection it is not using. Each stage is
//! fallible and `?` propagates the first failure; nothing downstream runs
//! after a stage fails.

use crate::constants::MAX_SEARCH_LIMIT;
use crate::enrich::enrich;
use crate::errors::SearchError;
use crate::providers::db::VerseStore;
use crate::providers::embedding::TextEmbedder;
use crate::rerank::{boost_by_strongs, filter_by_strongs};
use crate::translation::Translation;
use crate::types::{StrongsMode, VerseHit, VerseResult};
use std::collections::HashSet;
use tracing::info;

/// A set of Strong's IDs and how to apply it to enriched results.
#[derive(Debug, Clone)]
pub struct StrongsSelection {
    /// Normalized (uppercase) Strong's IDs, e.g. `H430`, `G2316`.
    pub ids: HashSet<String>,
    pub mode: StrongsMode,
    /// Only read in `StrongsMode::Boost`.
    pub boost_weight: f64,
}

/// Runs the similarity stage only: validate, embed, query.
///
/// Returns ranked hits with no word-level data attached. The caller decides
/// whether to enrich.
pub async fn search(
    store: &VerseStore,
    embedder: &dyn TextEmbedder,
    query_text: &str,
    translation: Translation,
    limit: u32,
) -> Result<Vec<VerseHit>, SearchError> {
    validate_query(query_text, limit)?;

    info!(%translation, limit, "starting verse search for '{query_text}'");
    let query_vector = embedder.embed(query_text).await?;
    store.similar_verses(translation, &query_vector, limit).await
}

/// Runs the full pipeline: similarity search, lexical enrichment, and the
/// optional Strong's-ID stage.
///
/// With `strongs` set to `Filter`, fewer than `limit` results may come
/// back, possibly none; the page is filtered, not re-queried. With `Boost`,
/// the page is re-ordered but complete.
pub async fn search_with_lexicon(
    store: &VerseStore,
    embedder: &dyn TextEmbedder,
    query_text: &str,
    translation: Translation,
    limit: u32,
    strongs: Option<&StrongsSelection>,
) -> Result<Vec<VerseResult>, SearchError> {
    let hits = search(store, embedder, query_text, translation, limit).await?;
    let results = enrich(store, translation, hits).await?;

    let Some(selection) = strongs else {
        return Ok(results);
    };
    Ok(match selection.mode {
        StrongsMode::Filter => filter_by_strongs(results, &selection.ids),
        StrongsMode::Boost => boost_by_strongs(results, &selection.ids, selection.boost_weight),
    })
}

/// Looks up a single verse by reference and enriches it.
///
/// Returns `Ok(None)` when the verse does not exist in the given
/// translation; absent data is not an error.
pub async fn verse_with_lexicon(
    store: &VerseStore,
    translation: Translation,
    book_name: &str,
    chapter_num: i64,
    verse_num: i64,
) -> Result<Option<VerseResult>, SearchError> {
    let Some(hit) = store
        .verse_by_reference(translation, book_name, chapter_num, verse_num)
        .await?
    else {
        return Ok(None);
    };
    let mut results = enrich(store, translation, vec![hit]).await?;
    Ok(results.pop())
}

fn validate_query(query_text: &str, limit: u32) -> Result<(), SearchError> {
    if query_text.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(SearchError::LimitOutOfRange {
            requested: limit,
            max: MAX_SEARCH_LIMIT,
        });
    }
    Ok(())
}
