//! Shared fixtures for `berea` integration tests: an isolated in-memory
//! verse store, seed helpers for every table, and a deterministic
//! `TextEmbedder` double so pipeline tests never talk to a real provider.

use anyhow::Result;
use async_trait::async_trait;
use berea::errors::SearchError;
use berea::providers::db::VerseStore;
use berea::providers::embedding::TextEmbedder;
use berea::translation::{OriginalLanguage, Translation};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use turso::Value as TursoValue;

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub store: VerseStore,
}

impl TestSetup {
    /// Creates a new, isolated in-memory verse store and initializes the
    /// schema.
    pub async fn new() -> Result<Self> {
        let store = VerseStore::new(":memory:").await?;
        store.initialize_schema().await?;
        Ok(Self { store })
    }
}

// --- Seed Helpers ---

/// Encodes a vector as the raw little-endian f32 bytes the store's vector
/// functions read from the `embedding` column.
pub fn vector_bytes(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Inserts a verse and returns its row id. Pass `None` for `embedding` to
/// seed a verse that similarity search must skip.
pub async fn add_verse(
    store: &VerseStore,
    translation: Translation,
    book_name: &str,
    chapter_num: i64,
    verse_num: i64,
    text: &str,
    embedding: Option<&[f32]>,
) -> Result<i64> {
    let conn = store.db.connect()?;
    let params: Vec<TursoValue> = vec![
        text_value(book_name),
        TursoValue::Integer(chapter_num),
        TursoValue::Integer(verse_num),
        text_value(translation.code()),
        text_value(text),
        match embedding {
            Some(vector) => TursoValue::Blob(vector_bytes(vector)),
            None => TursoValue::Null,
        },
    ];
    let mut rows = conn
        .query(
            "INSERT INTO verses (book_name, chapter_num, verse_num, translation_source, text, embedding)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
            params,
        )
        .await?;
    match rows.next().await? {
        Some(row) => match row.get_value(0)? {
            TursoValue::Integer(id) => Ok(id),
            other => anyhow::bail!("unexpected id value from insert: {other:?}"),
        },
        None => anyhow::bail!("insert returned no id"),
    }
}

/// Inserts one tagged word into the given language's words table.
pub async fn add_word(
    store: &VerseStore,
    language: OriginalLanguage,
    book_name: &str,
    chapter_num: i64,
    verse_num: i64,
    word_position: i64,
    word_text: &str,
    strongs_id: Option<&str>,
    grammar_code: Option<&str>,
) -> Result<()> {
    let conn = store.db.connect()?;
    let sql = format!(
        "INSERT INTO {} (book_name, chapter_num, verse_num, word_position, word_text, strongs_id, grammar_code)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        language.tables().words
    );
    let params: Vec<TursoValue> = vec![
        text_value(book_name),
        TursoValue::Integer(chapter_num),
        TursoValue::Integer(verse_num),
        TursoValue::Integer(word_position),
        text_value(word_text),
        optional_text_value(strongs_id),
        optional_text_value(grammar_code),
    ];
    conn.execute(&sql, params).await?;
    Ok(())
}

/// Inserts one lexicon entry into the given language's lexicon table.
pub async fn add_lexicon_entry(
    store: &VerseStore,
    language: OriginalLanguage,
    strongs_id: &str,
    lemma: &str,
    transliteration: &str,
    definition: &str,
) -> Result<()> {
    let conn = store.db.connect()?;
    let sql = format!(
        "INSERT INTO {} (strongs_id, lemma, transliteration, definition)
         VALUES (?, ?, ?, ?)",
        language.tables().lexicon
    );
    let params: Vec<TursoValue> = vec![
        text_value(strongs_id),
        text_value(lemma),
        text_value(transliteration),
        text_value(definition),
    ];
    conn.execute(&sql, params).await?;
    Ok(())
}

/// Inserts one morphology row. The schema allows duplicate codes on
/// purpose, so calling this twice with the same code builds the fan-out
/// case the enrichment regrouping has to survive.
pub async fn add_morphology(
    store: &VerseStore,
    language: OriginalLanguage,
    code: &str,
    description: &str,
) -> Result<()> {
    let conn = store.db.connect()?;
    let sql = format!(
        "INSERT INTO {} (code, description) VALUES (?, ?)",
        language.tables().morphology
    );
    let params: Vec<TursoValue> = vec![text_value(code), text_value(description)];
    conn.execute(&sql, params).await?;
    Ok(())
}

fn text_value(s: &str) -> TursoValue {
    TursoValue::Text(s.to_string())
}

fn optional_text_value(s: Option<&str>) -> TursoValue {
    match s {
        Some(s) => TursoValue::Text(s.to_string()),
        None => TursoValue::Null,
    }
}

// --- Mock Embedder ---

#[derive(Clone, Debug)]
enum MockEmbedderResponse {
    Vector(Vec<f32>),
    Timeout(Duration),
    Unreachable(String),
}

/// A programmable `TextEmbedder` double.
///
/// Returns a fixed vector (or a fixed failure) and records every query text
/// it receives, so tests can assert both results and whether the provider
/// was consulted at all.
#[derive(Clone, Debug)]
pub struct MockEmbedder {
    response: Arc<Mutex<MockEmbedderResponse>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEmbedder {
    /// An embedder that answers every query with `vector`.
    pub fn returning(vector: Vec<f32>) -> Self {
        Self::with_response(MockEmbedderResponse::Vector(vector))
    }

    /// An embedder that fails every query as a provider timeout.
    pub fn timing_out(after: Duration) -> Self {
        Self::with_response(MockEmbedderResponse::Timeout(after))
    }

    /// An embedder that fails every query as an unreachable provider.
    pub fn unreachable(message: &str) -> Self {
        Self::with_response(MockEmbedderResponse::Unreachable(message.to_string()))
    }

    fn with_response(response: MockEmbedderResponse) -> Self {
        Self {
            response: Arc::new(Mutex::new(response)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Retrieves the recorded query texts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextEmbedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError> {
        self.calls.lock().unwrap().push(text.to_string());
        match self.response.lock().unwrap().clone() {
            MockEmbedderResponse::Vector(vector) => Ok(vector),
            MockEmbedderResponse::Timeout(after) => Err(SearchError::EmbeddingTimeout(after)),
            MockEmbedderResponse::Unreachable(message) => {
                Err(SearchError::EmbeddingUnavailable(message))
            }
        }
    }
}
