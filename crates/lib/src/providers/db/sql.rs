//! # SQL Statements
//!
//! This module centralizes the SQL used by the verse store. Keeping the
//! strings here keeps the store logic readable and isolates the
//! SQLite-dialect pieces (vector functions, placeholder syntax) in one
//! place.

use crate::translation::LexiconTables;

/// Idempotent table creation, run on every startup.
///
/// The morphology tables deliberately do not declare `code` as unique:
/// real datasets repeat codes, and the enrichment regrouping is written to
/// tolerate the resulting join fan-out.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS verses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_name TEXT NOT NULL,
        chapter_num INTEGER NOT NULL,
        verse_num INTEGER NOT NULL,
        translation_source TEXT NOT NULL,
        text TEXT NOT NULL,
        embedding BLOB
    )",
    "CREATE TABLE IF NOT EXISTS hebrew_words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_name TEXT NOT NULL,
        chapter_num INTEGER NOT NULL,
        verse_num INTEGER NOT NULL,
        word_position INTEGER NOT NULL,
        word_text TEXT NOT NULL,
        strongs_id TEXT,
        grammar_code TEXT
    )",
    "CREATE TABLE IF NOT EXISTS greek_words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_name TEXT NOT NULL,
        chapter_num INTEGER NOT NULL,
        verse_num INTEGER NOT NULL,
        word_position INTEGER NOT NULL,
        word_text TEXT NOT NULL,
        strongs_id TEXT,
        grammar_code TEXT
    )",
    "CREATE TABLE IF NOT EXISTS hebrew_lexicon (
        strongs_id TEXT PRIMARY KEY,
        lemma TEXT,
        transliteration TEXT,
        definition TEXT
    )",
    "CREATE TABLE IF NOT EXISTS greek_lexicon (
        strongs_id TEXT PRIMARY KEY,
        lemma TEXT,
        transliteration TEXT,
        definition TEXT
    )",
    "CREATE TABLE IF NOT EXISTS hebrew_morphology (
        code TEXT NOT NULL,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS greek_morphology (
        code TEXT NOT NULL,
        description TEXT
    )",
];

/// Returns the nearest-neighbor query for one translation.
///
/// The query vector is spliced in as a `vector32` literal (floats only, so
/// no quoting concerns); the translation code is bound as `?1`. Distance is
/// ascending cosine distance, and the reference columns break ties so equal
/// distances always come back in the same order.
///
/// # Arguments
///
/// * `vector_str`: The query vector rendered as `[v1, v2, ...]`.
/// * `limit`: The maximum number of rows to return, already validated.
pub fn nearest_verses(vector_str: &str, limit: u32) -> String {
    format!(
        "
        SELECT id, book_name, chapter_num, verse_num, text,
               vector_distance_cos(embedding, vector32('{vector_str}')) AS distance
        FROM verses
        WHERE translation_source = ?1 AND embedding IS NOT NULL
        ORDER BY distance ASC, book_name ASC, chapter_num ASC, verse_num ASC
        LIMIT {limit};
    "
    )
}

/// Returns the batched enrichment join for one tagged language.
///
/// Starts from `verses` and LEFT JOINs outward, so a verse with no tagged
/// words still yields exactly one row (with NULL word columns) instead of
/// vanishing. Rows come back ordered by verse reference then word position,
/// which is the order the regrouping in `enrich` expects.
pub fn word_detail_join(tables: &LexiconTables, verse_count: usize) -> String {
    let placeholders = vec!["?"; verse_count].join(", ");
    format!(
        "
        SELECT v.book_name, v.chapter_num, v.verse_num,
               w.word_position, w.word_text, w.strongs_id, w.grammar_code,
               l.lemma, l.definition, m.description
        FROM verses v
        LEFT JOIN {words} w
            ON w.book_name = v.book_name
           AND w.chapter_num = v.chapter_num
           AND w.verse_num = v.verse_num
        LEFT JOIN {lexicon} l ON l.strongs_id = w.strongs_id
        LEFT JOIN {morphology} m ON m.code = w.grammar_code
        WHERE v.id IN ({placeholders})
        ORDER BY v.book_name ASC, v.chapter_num ASC, v.verse_num ASC, w.word_position ASC;
    ",
        words = tables.words,
        lexicon = tables.lexicon,
        morphology = tables.morphology,
    )
}

/// Looks up a single verse by translation and reference. Book name matching
/// is case-insensitive.
pub const VERSE_BY_REFERENCE_SQL: &str = "
        SELECT id, book_name, chapter_num, verse_num, text
        FROM verses
        WHERE translation_source = ?1
          AND LOWER(book_name) = LOWER(?2)
          AND chapter_num = ?3
          AND verse_num = ?4
        LIMIT 1;
    ";

/// Returns the lookup query for one lexicon table.
pub fn lexicon_entry(table: &str) -> String {
    format!(
        "
        SELECT strongs_id, lemma, transliteration, definition
        FROM {table}
        WHERE strongs_id = ?1
        LIMIT 1;
    "
    )
}
