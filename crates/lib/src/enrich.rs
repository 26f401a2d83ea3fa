//! # Lexical Enrichment
//!
//! Attaches word-level lexicon and morphology data to a page of ranked
//! verse hits. The data comes back from the store as one flat stream of
//! join rows (one batched query, not one query per verse); this module owns
//! the regrouping of that stream into per-verse word lists and the merge
//! back into ranked order.
//!
//! The regrouping is deliberately a pure function over already-fetched
//! rows, so its edge cases (verses with no words, join fan-out duplicating
//! a word) are testable without a database.

use crate::errors::SearchError;
use crate::providers::db::VerseStore;
use crate::translation::Translation;
use crate::types::{VerseHit, VerseResult, WordDetail};
use std::collections::HashMap;
use tracing::debug;

/// One flat row of the batched enrichment join.
///
/// The word columns are all optional: a verse with no tagged words still
/// produces one row where every word column is NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRow {
    pub book_name: String,
    pub chapter_num: i64,
    pub verse_num: i64,
    pub word_position: Option<i64>,
    pub word_text: Option<String>,
    pub strongs_id: Option<String>,
    pub grammar_code: Option<String>,
    pub lemma: Option<String>,
    pub definition: Option<String>,
    pub morphology_description: Option<String>,
}

/// Identifies one verse within a translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub book_name: String,
    pub chapter_num: i64,
    pub verse_num: i64,
}

impl VerseKey {
    fn of_row(row: &WordRow) -> Self {
        Self {
            book_name: row.book_name.clone(),
            chapter_num: row.chapter_num,
            verse_num: row.verse_num,
        }
    }

    fn of_hit(hit: &VerseHit) -> Self {
        Self {
            book_name: hit.book_name.clone(),
            chapter_num: hit.chapter_num,
            verse_num: hit.verse_num,
        }
    }
}

/// Folds the flat join stream into one `(verse, words)` entry per verse.
///
/// Expects rows pre-sorted by verse reference then word position, which is
/// what `VerseStore::word_rows` returns. A new entry opens whenever the
/// verse key changes; no row is dropped and none is counted twice:
///
/// * A row with NULL word columns contributes a verse entry with an empty
///   word list (the verse had no tagged words).
/// * Adjacent rows repeating the same word position within a verse are the
///   join fanning out (for example a duplicated morphology code); only the
///   first is kept.
pub fn group_word_rows(rows: Vec<WordRow>) -> Vec<(VerseKey, Vec<WordDetail>)> {
    let mut grouped: Vec<(VerseKey, Vec<WordDetail>)> = Vec::new();
    for row in rows {
        let key = VerseKey::of_row(&row);
        match grouped.last_mut() {
            Some((current, words)) if *current == key => push_word(words, row),
            _ => {
                let mut words = Vec::new();
                push_word(&mut words, row);
                grouped.push((key, words));
            }
        }
    }
    grouped
}

fn push_word(words: &mut Vec<WordDetail>, row: WordRow) {
    // NULL position means the LEFT JOIN found no word for this verse.
    let Some(word_position) = row.word_position else {
        return;
    };
    if words.last().map_or(false, |w| w.word_position == word_position) {
        return;
    }
    words.push(WordDetail {
        word_text: row.word_text.unwrap_or_default(),
        word_position,
        strongs_id: row.strongs_id,
        lemma: row.lemma,
        definition: row.definition,
        morphology_code: row.grammar_code,
        morphology_description: row.morphology_description,
    });
}

/// Enriches ranked hits with word-level detail.
///
/// For untagged translations this is a no-op that attaches empty word
/// lists. For tagged translations the store is asked once for the whole
/// page of verses, and the grouped result is merged back in the hits'
/// ranked order, which the join does not preserve.
pub async fn enrich(
    store: &VerseStore,
    translation: Translation,
    hits: Vec<VerseHit>,
) -> Result<Vec<VerseResult>, SearchError> {
    let Some(tables) = translation.lexicon_tables() else {
        return Ok(hits
            .into_iter()
            .map(|hit| VerseResult::from_hit(hit, Vec::new()))
            .collect());
    };

    if hits.is_empty() {
        return Ok(Vec::new());
    }

    let verse_ids: Vec<i64> = hits.iter().map(|hit| hit.verse_id).collect();
    let rows = store.word_rows(tables, &verse_ids).await?;
    debug!(
        hits = hits.len(),
        rows = rows.len(),
        "regrouping enrichment rows"
    );

    let mut words_by_verse: HashMap<VerseKey, Vec<WordDetail>> =
        group_word_rows(rows).into_iter().collect();

    Ok(hits
        .into_iter()
        .map(|hit| {
            let words = words_by_verse
                .remove(&VerseKey::of_hit(&hit))
                .unwrap_or_default();
            VerseResult::from_hit(hit, words)
        })
        .collect())
}
