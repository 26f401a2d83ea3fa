//! # Verse Store
//!
//! Provider for the local verse database, built on Turso. The store owns a
//! `Database` handle and takes a fresh connection per operation; clones
//! share the same underlying database, which is how the server and tests
//! pass it around.
//!
//! Every public query method runs under the store's query timeout. The
//! deadline covers the whole operation, connection included, so a wedged
//! database surfaces as `DatabaseTimeout` instead of hanging a request.

use crate::enrich::WordRow;
use crate::errors::SearchError;
use crate::translation::{LexiconTables, OriginalLanguage, Translation};
use crate::types::{LexiconEntry, VerseHit};
use std::time::Duration;
use tracing::debug;
use turso::{params, Database, Value as TursoValue};

mod sql;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// A provider for the local verse database.
#[derive(Clone)]
pub struct VerseStore {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
    query_timeout: Duration,
}

impl VerseStore {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// Use `":memory:"` for an isolated in-memory database; to share an
    /// in-memory database across handles, create one store and `.clone()`
    /// it.
    pub async fn new(db_path: &str) -> Result<Self, SearchError> {
        let db = turso::Builder::new_local(db_path).build().await?;

        // WAL improves concurrent access for file-based databases and is a
        // safe no-op for in-memory ones. PRAGMA returns a row, so `query`
        // is used instead of `execute`.
        let conn = db.connect()?;
        conn.query("PRAGMA journal_mode=WAL;", ()).await?;

        Ok(Self {
            db,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    /// Overrides the per-query deadline.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Ensures all application tables exist. Idempotent, run on startup.
    pub async fn initialize_schema(&self) -> Result<(), SearchError> {
        let conn = self.db.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }

    /// Runs the nearest-neighbor query against one translation's verses.
    ///
    /// Returns at most `limit` hits ordered by descending similarity, ties
    /// broken by reference so repeated runs return identical orderings.
    /// Verses without a stored embedding never match.
    pub async fn similar_verses(
        &self,
        translation: Translation,
        query_vector: &[f32],
        limit: u32,
    ) -> Result<Vec<VerseHit>, SearchError> {
        tokio::time::timeout(
            self.query_timeout,
            self.similar_verses_inner(translation, query_vector, limit),
        )
        .await
        .map_err(|_| SearchError::DatabaseTimeout(self.query_timeout))?
    }

    async fn similar_verses_inner(
        &self,
        translation: Translation,
        query_vector: &[f32],
        limit: u32,
    ) -> Result<Vec<VerseHit>, SearchError> {
        let conn = self.db.connect()?;

        let vector_str = format!(
            "[{}]",
            query_vector
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        );
        let query = sql::nearest_verses(&vector_str, limit);

        debug!(translation = %translation, limit, "running nearest-neighbor query");
        let mut rows = conn.query(&query, params![translation.code()]).await?;

        let mut hits = Vec::new();
        while let Some(row) = rows.next().await? {
            let distance = float_column(row.get_value(5)?, "distance")?;
            hits.push(VerseHit {
                verse_id: integer_column(row.get_value(0)?, "id")?,
                book_name: text_column(row.get_value(1)?, "book_name")?,
                chapter_num: integer_column(row.get_value(2)?, "chapter_num")?,
                verse_num: integer_column(row.get_value(3)?, "verse_num")?,
                text: text_column(row.get_value(4)?, "text")?,
                // Cosine distance is 0 for identical directions, up to 2 for
                // opposite ones. Anti-similar verses clamp to 0 rather than
                // going negative.
                similarity: (1.0 - distance).clamp(0.0, 1.0),
            });
        }

        debug!(count = hits.len(), "nearest-neighbor query finished");
        Ok(hits)
    }

    /// Fetches the flat word, lexicon and morphology rows for a batch of
    /// verse ids in a single query.
    ///
    /// Rows come back grouped by verse reference and ordered by word
    /// position. A verse with no tagged words yields exactly one row with
    /// NULL word columns; see `enrich::group_word_rows` for how the flat
    /// stream is folded back into per-verse word lists.
    pub async fn word_rows(
        &self,
        tables: LexiconTables,
        verse_ids: &[i64],
    ) -> Result<Vec<WordRow>, SearchError> {
        if verse_ids.is_empty() {
            return Ok(Vec::new());
        }
        tokio::time::timeout(self.query_timeout, self.word_rows_inner(tables, verse_ids))
            .await
            .map_err(|_| SearchError::DatabaseTimeout(self.query_timeout))?
    }

    async fn word_rows_inner(
        &self,
        tables: LexiconTables,
        verse_ids: &[i64],
    ) -> Result<Vec<WordRow>, SearchError> {
        let conn = self.db.connect()?;
        let query = sql::word_detail_join(&tables, verse_ids.len());
        let query_params: Vec<TursoValue> = verse_ids
            .iter()
            .map(|id| TursoValue::Integer(*id))
            .collect();

        debug!(
            language = %tables.language,
            verses = verse_ids.len(),
            "running batched enrichment join"
        );
        let mut rows = conn.query(&query, query_params).await?;

        let mut word_rows = Vec::new();
        while let Some(row) = rows.next().await? {
            word_rows.push(WordRow {
                book_name: text_column(row.get_value(0)?, "book_name")?,
                chapter_num: integer_column(row.get_value(1)?, "chapter_num")?,
                verse_num: integer_column(row.get_value(2)?, "verse_num")?,
                word_position: optional_integer_column(row.get_value(3)?, "word_position")?,
                word_text: optional_text_column(row.get_value(4)?, "word_text")?,
                strongs_id: optional_text_column(row.get_value(5)?, "strongs_id")?,
                grammar_code: optional_text_column(row.get_value(6)?, "grammar_code")?,
                lemma: optional_text_column(row.get_value(7)?, "lemma")?,
                definition: optional_text_column(row.get_value(8)?, "definition")?,
                morphology_description: optional_text_column(row.get_value(9)?, "description")?,
            });
        }

        debug!(rows = word_rows.len(), "enrichment join finished");
        Ok(word_rows)
    }

    /// Looks up a single verse by translation and reference. Returns
    /// `Ok(None)` when the verse is not present; absence is not an error.
    pub async fn verse_by_reference(
        &self,
        translation: Translation,
        book_name: &str,
        chapter_num: i64,
        verse_num: i64,
    ) -> Result<Option<VerseHit>, SearchError> {
        tokio::time::timeout(
            self.query_timeout,
            self.verse_by_reference_inner(translation, book_name, chapter_num, verse_num),
        )
        .await
        .map_err(|_| SearchError::DatabaseTimeout(self.query_timeout))?
    }

    async fn verse_by_reference_inner(
        &self,
        translation: Translation,
        book_name: &str,
        chapter_num: i64,
        verse_num: i64,
    ) -> Result<Option<VerseHit>, SearchError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                sql::VERSE_BY_REFERENCE_SQL,
                params![translation.code(), book_name, chapter_num, verse_num],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        Ok(Some(VerseHit {
            verse_id: integer_column(row.get_value(0)?, "id")?,
            book_name: text_column(row.get_value(1)?, "book_name")?,
            chapter_num: integer_column(row.get_value(2)?, "chapter_num")?,
            verse_num: integer_column(row.get_value(3)?, "verse_num")?,
            text: text_column(row.get_value(4)?, "text")?,
            // A direct lookup has no query vector to score against.
            similarity: 0.0,
        }))
    }

    /// Looks up one lexicon entry in the given language's lexicon table.
    /// Returns `Ok(None)` for an unknown Strong's ID.
    pub async fn lexicon_entry(
        &self,
        language: OriginalLanguage,
        strongs_id: &str,
    ) -> Result<Option<LexiconEntry>, SearchError> {
        tokio::time::timeout(
            self.query_timeout,
            self.lexicon_entry_inner(language, strongs_id),
        )
        .await
        .map_err(|_| SearchError::DatabaseTimeout(self.query_timeout))?
    }

    async fn lexicon_entry_inner(
        &self,
        language: OriginalLanguage,
        strongs_id: &str,
    ) -> Result<Option<LexiconEntry>, SearchError> {
        let conn = self.db.connect()?;
        let query = sql::lexicon_entry(language.tables().lexicon);
        let mut rows = conn.query(&query, params![strongs_id]).await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        Ok(Some(LexiconEntry {
            strongs_id: text_column(row.get_value(0)?, "strongs_id")?,
            language,
            lemma: optional_text_column(row.get_value(1)?, "lemma")?,
            transliteration: optional_text_column(row.get_value(2)?, "transliteration")?,
            definition: optional_text_column(row.get_value(3)?, "definition")?,
        }))
    }
}

impl std::fmt::Debug for VerseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerseStore")
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

fn text_column(value: TursoValue, column: &str) -> Result<String, SearchError> {
    match value {
        TursoValue::Text(s) => Ok(s),
        other => Err(SearchError::RowDecode(format!(
            "expected text in '{column}', got {other:?}"
        ))),
    }
}

fn optional_text_column(value: TursoValue, column: &str) -> Result<Option<String>, SearchError> {
    match value {
        TursoValue::Null => Ok(None),
        TursoValue::Text(s) => Ok(Some(s)),
        other => Err(SearchError::RowDecode(format!(
            "expected text or null in '{column}', got {other:?}"
        ))),
    }
}

fn integer_column(value: TursoValue, column: &str) -> Result<i64, SearchError> {
    match value {
        TursoValue::Integer(i) => Ok(i),
        other => Err(SearchError::RowDecode(format!(
            "expected integer in '{column}', got {other:?}"
        ))),
    }
}

fn optional_integer_column(value: TursoValue, column: &str) -> Result<Option<i64>, SearchError> {
    match value {
        TursoValue::Null => Ok(None),
        TursoValue::Integer(i) => Ok(Some(i)),
        other => Err(SearchError::RowDecode(format!(
            "expected integer or null in '{column}', got {other:?}"
        ))),
    }
}

fn float_column(value: TursoValue, column: &str) -> Result<f64, SearchError> {
    match value {
        TursoValue::Real(f) => Ok(f),
        // Integer affinity can surface for exact scores like 0 or 1.
        TursoValue::Integer(i) => Ok(i as f64),
        other => Err(SearchError::RowDecode(format!(
            "expected number in '{column}', got {other:?}"
        ))),
    }
}
