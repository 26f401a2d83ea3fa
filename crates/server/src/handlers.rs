//! # Request Handlers
//!
//! One handler per route, each a thin layer over the library pipeline:
//! parse and normalize parameters, call through, let `AppError` translate
//! failures. Query parameters arrive as raw strings and are parsed here so
//! a malformed value produces the same `{"error": ...}` JSON shape as every
//! other failure instead of a framework default.

use crate::errors::AppError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use berea::constants::{DEFAULT_BOOST_WEIGHT, DEFAULT_SEARCH_LIMIT};
use berea::search::{search, search_with_lexicon, verse_with_lexicon, StrongsSelection};
use berea::translation::OriginalLanguage;
use berea::types::{LexiconEntry, StrongsMode, VerseResult};
use berea::{SearchError, Translation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// The root handler.
pub async fn root() -> &'static str {
    "berea server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Query parameters for `/api/vector-search`.
///
/// Everything is an `Option<String>`; parsing happens in the handler so
/// errors stay in our JSON shape.
#[derive(Debug, Deserialize)]
pub struct VectorSearchParams {
    pub q: Option<String>,
    pub translation: Option<String>,
    pub limit: Option<String>,
}

/// The handler for `/api/vector-search`.
///
/// Similarity search only: results carry empty `words` lists regardless of
/// translation.
pub async fn vector_search_handler(
    State(app_state): State<AppState>,
    Query(params): Query<VectorSearchParams>,
) -> Result<Json<Vec<VerseResult>>, AppError> {
    let query_text = require_query(params.q)?;
    let translation = parse_translation(params.translation.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;

    info!(%translation, limit, "vector search: '{query_text}'");
    let hits = search(
        app_state.store.as_ref(),
        app_state.embedder.as_ref(),
        &query_text,
        translation,
        limit,
    )
    .await?;

    let results = hits
        .into_iter()
        .map(|hit| VerseResult::from_hit(hit, Vec::new()))
        .collect();
    Ok(Json(results))
}

/// Query parameters for `/api/vector-search-with-lexicon`.
#[derive(Debug, Deserialize)]
pub struct LexiconSearchParams {
    pub q: Option<String>,
    pub translation: Option<String>,
    pub limit: Option<String>,
    /// Comma-separated Strong's IDs, e.g. `H430,H3068`.
    pub strongs_ids: Option<String>,
    /// `filter` (default) or `boost`.
    pub strongs_mode: Option<String>,
    pub boost_weight: Option<String>,
}

/// The handler for `/api/vector-search-with-lexicon`.
///
/// Full pipeline: similarity search, then word-level enrichment for tagged
/// translations, then the optional Strong's-ID filter or boost stage.
pub async fn lexicon_search_handler(
    State(app_state): State<AppState>,
    Query(params): Query<LexiconSearchParams>,
) -> Result<Json<Vec<VerseResult>>, AppError> {
    let query_text = require_query(params.q)?;
    let translation = parse_translation(params.translation.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;
    let strongs = parse_strongs_selection(
        params.strongs_ids.as_deref(),
        params.strongs_mode.as_deref(),
        params.boost_weight.as_deref(),
    )?;

    info!(
        %translation,
        limit,
        strongs = strongs.is_some(),
        "lexicon search: '{query_text}'"
    );
    let results = search_with_lexicon(
        app_state.store.as_ref(),
        app_state.embedder.as_ref(),
        &query_text,
        translation,
        limit,
        strongs.as_ref(),
    )
    .await?;

    Ok(Json(results))
}

/// Query parameters for `/api/verse`.
#[derive(Debug, Deserialize)]
pub struct VerseParams {
    pub book: Option<String>,
    pub chapter: Option<String>,
    pub verse: Option<String>,
    pub translation: Option<String>,
}

/// The handler for `/api/verse`: direct lookup of one verse by reference,
/// enriched like a search result. `similarity` is `0.0` because there is no
/// query to score against.
pub async fn verse_handler(
    State(app_state): State<AppState>,
    Query(params): Query<VerseParams>,
) -> Result<Json<VerseResult>, AppError> {
    let book = params
        .book
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("missing 'book' parameter".to_string()))?;
    let chapter = parse_reference_number(params.chapter.as_deref(), "chapter")?;
    let verse = parse_reference_number(params.verse.as_deref(), "verse")?;
    let translation = parse_translation(params.translation.as_deref())?;

    let result = verse_with_lexicon(app_state.store.as_ref(), translation, &book, chapter, verse)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("{book} {chapter}:{verse} not found in {translation}"))
        })?;

    Ok(Json(result))
}

/// The handler for `/api/lexicon/{strongs_id}`.
///
/// The language is derived from the ID prefix: `H` for Hebrew, `G` for
/// Greek. Anything else is malformed input, not a missing entry.
pub async fn lexicon_handler(
    State(app_state): State<AppState>,
    Path(strongs_id): Path<String>,
) -> Result<Json<LexiconEntry>, AppError> {
    let id = strongs_id.trim().to_ascii_uppercase();
    let language = match id.chars().next() {
        Some('H') => OriginalLanguage::Hebrew,
        Some('G') => OriginalLanguage::Greek,
        _ => {
            return Err(AppError::BadRequest(format!(
                "malformed Strong's ID '{strongs_id}': expected an H or G prefix"
            )))
        }
    };

    let entry = app_state
        .store
        .lexicon_entry(language, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no lexicon entry for '{id}'")))?;

    Ok(Json(entry))
}

/// One row of the `/api/translations` listing.
#[derive(Debug, Serialize)]
pub struct TranslationInfo {
    pub code: &'static str,
    pub tagged: bool,
    pub lexicon_language: Option<OriginalLanguage>,
}

/// The handler for `/api/translations`: the closed set of supported
/// translation codes and whether each carries word-level tagging.
pub async fn translations_handler() -> Json<Vec<TranslationInfo>> {
    let translations = Translation::ALL
        .iter()
        .map(|translation| TranslationInfo {
            code: translation.code(),
            tagged: translation.lexicon_tables().is_some(),
            lexicon_language: translation.lexicon_tables().map(|tables| tables.language),
        })
        .collect();
    Json(translations)
}

// --- Parameter parsing helpers ---

fn require_query(q: Option<String>) -> Result<String, AppError> {
    match q {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(AppError::Search(SearchError::EmptyQuery)),
    }
}

/// Missing translation defaults to KJV; an unknown code is a 400, never a
/// silent fallback.
fn parse_translation(raw: Option<&str>) -> Result<Translation, AppError> {
    match raw {
        None => Ok(Translation::Kjv),
        Some(code) => code.parse().map_err(AppError::Search),
    }
}

fn parse_limit(raw: Option<&str>) -> Result<u32, AppError> {
    match raw {
        None => Ok(DEFAULT_SEARCH_LIMIT),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::BadRequest(format!("limit must be a positive integer, got '{raw}'"))
        }),
    }
}

fn parse_reference_number(raw: Option<&str>, name: &str) -> Result<i64, AppError> {
    let raw = raw.ok_or_else(|| AppError::BadRequest(format!("missing '{name}' parameter")))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be an integer, got '{raw}'")))
}

/// Builds the Strong's selection from its three query parameters. No
/// `strongs_ids` (or an all-empty list) means the stage is skipped
/// entirely, so `strongs_mode` alone has no effect.
fn parse_strongs_selection(
    ids: Option<&str>,
    mode: Option<&str>,
    boost_weight: Option<&str>,
) -> Result<Option<StrongsSelection>, AppError> {
    let Some(raw_ids) = ids else {
        return Ok(None);
    };

    let ids: HashSet<String> = raw_ids
        .split(',')
        .map(|id| id.trim().to_ascii_uppercase())
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return Ok(None);
    }

    let mode = match mode {
        None => StrongsMode::default(),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "filter" => StrongsMode::Filter,
            "boost" => StrongsMode::Boost,
            _ => {
                return Err(AppError::BadRequest(format!(
                    "strongs_mode must be 'filter' or 'boost', got '{raw}'"
                )))
            }
        },
    };

    let boost_weight = match boost_weight {
        None => DEFAULT_BOOST_WEIGHT,
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::BadRequest(format!("boost_weight must be a number, got '{raw}'"))
        })?,
    };

    Ok(Some(StrongsSelection {
        ids,
        mode,
        boost_weight,
    }))
}
