//! # Re-ranking
//!
//! Deterministic post-processing of enriched results against a set of
//! Strong's IDs: either filter the page down to verses containing one of
//! the IDs, or keep the whole page and boost the ranking of verses that
//! contain them. Both operate purely on data already in memory; no model
//! call and no extra query.

use crate::types::VerseResult;
use std::collections::HashSet;
use tracing::debug;

/// Counts the words in `result` whose Strong's ID is in `strongs_ids`.
///
/// Multiple occurrences count separately, so a verse using a boosted term
/// three times outranks a verse using it once.
fn matching_words(result: &VerseResult, strongs_ids: &HashSet<String>) -> usize {
    result
        .words
        .iter()
        .filter(|word| {
            word.strongs_id
                .as_deref()
                .map_or(false, |id| strongs_ids.contains(id))
        })
        .count()
}

/// Keeps only the results containing at least one word tagged with one of
/// `strongs_ids`. Relative order is unchanged. An empty ID set filters
/// nothing.
pub fn filter_by_strongs(
    results: Vec<VerseResult>,
    strongs_ids: &HashSet<String>,
) -> Vec<VerseResult> {
    if strongs_ids.is_empty() {
        return results;
    }
    let before = results.len();
    let filtered: Vec<VerseResult> = results
        .into_iter()
        .filter(|result| matching_words(result, strongs_ids) > 0)
        .collect();
    debug!(before, after = filtered.len(), "filtered by Strong's IDs");
    filtered
}

/// Re-orders results by `similarity + boost_weight * matches`.
///
/// The stored similarity is never modified; the boosted score exists only
/// as an ordering key. Equal boosted scores fall back to base similarity,
/// then to (book, chapter, verse) ascending, so the ordering is total and
/// repeated runs agree. An empty ID set returns the input unchanged.
pub fn boost_by_strongs(
    results: Vec<VerseResult>,
    strongs_ids: &HashSet<String>,
    boost_weight: f64,
) -> Vec<VerseResult> {
    if strongs_ids.is_empty() {
        return results;
    }

    let mut scored: Vec<(f64, VerseResult)> = results
        .into_iter()
        .map(|result| {
            let matches = matching_words(&result, strongs_ids) as f64;
            (result.similarity + boost_weight * matches, result)
        })
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| b.similarity.total_cmp(&a.similarity))
            .then_with(|| a.book_name.cmp(&b.book_name))
            .then_with(|| a.chapter_num.cmp(&b.chapter_num))
            .then_with(|| a.verse_num.cmp(&b.verse_num))
    });

    scored.into_iter().map(|(_, result)| result).collect()
}
