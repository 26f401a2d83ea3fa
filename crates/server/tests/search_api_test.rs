//! # Search Endpoint Tests
//!
//! Integration tests for `/api/vector-search` and
//! `/api/vector-search-with-lexicon`, covering the response shapes, the
//! error-status contract, and the Strong's filter/boost modes. The
//! embedding provider is an `httpmock` server returning hand-built vectors,
//! so similarity values are known in advance.

mod common;

use anyhow::Result;
use berea::{OriginalLanguage, Translation};
use berea_test_utils::{add_lexicon_entry, add_morphology, add_verse, add_word};
use common::TestApp;
use httpmock::Method;
use serde_json::{json, Value};
use std::time::Duration;

/// Seeds three KJV verses at known angles to the query vector
/// `[1, 0, 0, 0]`, one KJV verse with no embedding, and one TAHOT verse
/// that must never leak into KJV results.
async fn seed_kjv_fixture(app: &TestApp) -> Result<()> {
    let store = app.store();
    add_verse(
        store,
        Translation::Kjv,
        "Genesis",
        1,
        1,
        "In the beginning God created the heaven and the earth.",
        Some(&[1.0, 0.0, 0.0, 0.0]),
    )
    .await?;
    add_verse(
        store,
        Translation::Kjv,
        "Genesis",
        1,
        3,
        "And God said, Let there be light: and there was light.",
        Some(&[0.8, 0.6, 0.0, 0.0]),
    )
    .await?;
    add_verse(
        store,
        Translation::Kjv,
        "John",
        1,
        1,
        "In the beginning was the Word, and the Word was with God.",
        Some(&[0.6, 0.8, 0.0, 0.0]),
    )
    .await?;
    // No embedding: similarity search must skip it.
    add_verse(
        store,
        Translation::Kjv,
        "Psalms",
        23,
        1,
        "The LORD is my shepherd; I shall not want.",
        None,
    )
    .await?;
    // Different translation: must not appear in KJV results.
    add_verse(
        store,
        Translation::Tahot,
        "Genesis",
        1,
        1,
        "בְּרֵאשִׁית בָּרָא אֱלֹהִים",
        Some(&[1.0, 0.0, 0.0, 0.0]),
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn vector_search_returns_ranked_results_with_empty_words() -> Result<()> {
    // --- Arrange ---
    let app = TestApp::spawn().await?;
    seed_kjv_fixture(&app).await?;
    let embeddings_mock = app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    // --- Act ---
    let response = app
        .client
        .get(format!("{}/api/vector-search", app.address))
        .query(&[("q", "the creation of the world"), ("limit", "2")])
        .send()
        .await?;

    // --- Assert ---
    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results.len(), 2, "limit must cap the result count");

    assert_eq!(results[0]["book_name"], "Genesis");
    assert_eq!(results[0]["chapter_num"], 1);
    assert_eq!(results[0]["verse_num"], 1);
    assert!(results[0]["similarity"].as_f64().unwrap() > 0.99);
    assert_eq!(results[0]["words"], json!([]));

    assert_eq!(results[1]["verse_num"], 3);
    let second = results[1]["similarity"].as_f64().unwrap();
    assert!((second - 0.8).abs() < 1e-3, "expected ~0.8, got {second}");

    embeddings_mock.assert();
    Ok(())
}

#[tokio::test]
async fn vector_search_is_deterministic() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_kjv_fixture(&app).await?;
    app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = app
            .client
            .get(format!("{}/api/vector-search", app.address))
            .query(&[("q", "the creation of the world"), ("limit", "3")])
            .send()
            .await?;
        assert_eq!(response.status(), 200);
        bodies.push(response.text().await?);
    }
    assert_eq!(bodies[0], bodies[1], "same query must yield identical JSON");
    Ok(())
}

#[tokio::test]
async fn vector_search_rejects_missing_or_blank_query() -> Result<()> {
    let app = TestApp::spawn().await?;
    let embeddings_mock = app.mock_embedding(&[1.0, 0.0]);

    for query in [None, Some("   ")] {
        let mut request = app
            .client
            .get(format!("{}/api/vector-search", app.address));
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }
        let response = request.send().await?;
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await?;
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    // Input validation must fail before the provider is consulted.
    embeddings_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn vector_search_rejects_unknown_translation_before_any_work() -> Result<()> {
    let app = TestApp::spawn().await?;
    let embeddings_mock = app.mock_embedding(&[1.0, 0.0]);

    let response = app
        .client
        .get(format!("{}/api/vector-search", app.address))
        .query(&[("q", "light"), ("translation", "XYZ")])
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().contains("XYZ"));
    embeddings_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn vector_search_rejects_bad_limits() -> Result<()> {
    let app = TestApp::spawn().await?;
    let embeddings_mock = app.mock_embedding(&[1.0, 0.0]);

    for limit in ["0", "51", "ten", "-3"] {
        let response = app
            .client
            .get(format!("{}/api/vector-search", app.address))
            .query(&[("q", "light"), ("limit", limit)])
            .send()
            .await?;
        assert_eq!(response.status(), 400, "limit '{limit}' must be rejected");
        let body: Value = response.json().await?;
        assert!(body["error"].is_string());
    }

    embeddings_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn provider_error_maps_to_502() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/embeddings");
        then.status(500).body("model not loaded");
    });

    let response = app
        .client
        .get(format!("{}/api/vector-search", app.address))
        .query(&[("q", "light")])
        .send()
        .await?;

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await?;
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn provider_timeout_maps_to_504() -> Result<()> {
    let app = TestApp::spawn().await?;
    // The harness configures a 2s embedding deadline; answer after 5s.
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/embeddings");
        then.status(200)
            .delay(Duration::from_secs(5))
            .json_body(json!({ "data": [{ "embedding": [1.0, 0.0] }] }));
    });

    let response = app
        .client
        .get(format!("{}/api/vector-search", app.address))
        .query(&[("q", "light")])
        .send()
        .await?;

    assert_eq!(response.status(), 504);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().contains("timed out"));
    Ok(())
}

/// Seeds two TAHOT verses with tagged words. Genesis 1:1 is closest to the
/// query vector; Psalms 100:3 carries two `H430` words for the filter and
/// boost tests.
async fn seed_tahot_fixture(app: &TestApp) -> Result<()> {
    let store = app.store();

    add_verse(
        store,
        Translation::Tahot,
        "Genesis",
        1,
        1,
        "בְּרֵאשִׁית בָּרָא אֱלֹהִים",
        Some(&[1.0, 0.0, 0.0, 0.0]),
    )
    .await?;
    for (position, word, strongs, grammar) in [
        (1, "בְּרֵאשִׁית", Some("H7225"), Some("HNcfsa")),
        (2, "בָּרָא", Some("H1254"), Some("HVqp3ms")),
        (3, "אֱלֹהִים", Some("H430"), Some("HNcmpa")),
    ] {
        add_word(
            store,
            OriginalLanguage::Hebrew,
            "Genesis",
            1,
            1,
            position,
            word,
            strongs,
            grammar,
        )
        .await?;
    }

    add_verse(
        store,
        Translation::Tahot,
        "Psalms",
        100,
        3,
        "יְהוָה הוּא אֱלֹהִים",
        Some(&[0.8, 0.6, 0.0, 0.0]),
    )
    .await?;
    for (position, word, strongs) in [
        (1, "יְהוָה", Some("H3068")),
        (2, "אֱלֹהִים", Some("H430")),
        (3, "אֱלֹהֵינוּ", Some("H430")),
    ] {
        add_word(
            store,
            OriginalLanguage::Hebrew,
            "Psalms",
            100,
            3,
            position,
            word,
            strongs,
            Some("HNcmpa"),
        )
        .await?;
    }

    add_lexicon_entry(
        store,
        OriginalLanguage::Hebrew,
        "H7225",
        "רֵאשִׁית",
        "reshith",
        "beginning, chief",
    )
    .await?;
    add_lexicon_entry(
        store,
        OriginalLanguage::Hebrew,
        "H430",
        "אֱלֹהִים",
        "elohim",
        "God, gods, judges",
    )
    .await?;
    // H1254 has no lexicon entry on purpose.

    add_morphology(
        store,
        OriginalLanguage::Hebrew,
        "HNcfsa",
        "Noun, common, feminine, singular, absolute",
    )
    .await?;
    add_morphology(
        store,
        OriginalLanguage::Hebrew,
        "HNcmpa",
        "Noun, common, masculine, plural, absolute",
    )
    .await?;
    // HVqp3ms has no morphology row on purpose.

    Ok(())
}

#[tokio::test]
async fn lexicon_search_nests_word_details() -> Result<()> {
    // --- Arrange ---
    let app = TestApp::spawn().await?;
    seed_tahot_fixture(&app).await?;
    let embeddings_mock = app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    // --- Act ---
    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[("q", "creation"), ("translation", "TAHOT"), ("limit", "5")])
        .send()
        .await?;

    // --- Assert ---
    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results.len(), 2);

    let top = &results[0];
    assert_eq!(top["book_name"], "Genesis");
    let words = top["words"].as_array().unwrap();
    assert_eq!(words.len(), 3, "every tagged word must appear exactly once");

    // Word order follows word_position.
    assert_eq!(words[0]["word_position"], 1);
    assert_eq!(words[1]["word_position"], 2);
    assert_eq!(words[2]["word_position"], 3);

    // Fully joined word: lexicon and morphology both present.
    assert_eq!(words[0]["strongs_id"], "H7225");
    assert_eq!(words[0]["lemma"], "רֵאשִׁית");
    assert_eq!(words[0]["definition"], "beginning, chief");
    assert_eq!(words[0]["morphology_code"], "HNcfsa");
    assert_eq!(
        words[0]["morphology_description"],
        "Noun, common, feminine, singular, absolute"
    );

    // Strong's ID without a lexicon entry: the word survives with nulls.
    assert_eq!(words[1]["strongs_id"], "H1254");
    assert_eq!(words[1]["lemma"], json!(null));
    assert_eq!(words[1]["definition"], json!(null));
    assert_eq!(words[1]["morphology_description"], json!(null));

    embeddings_mock.assert();
    Ok(())
}

#[tokio::test]
async fn lexicon_search_on_untagged_translation_returns_empty_words() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_kjv_fixture(&app).await?;
    app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[("q", "creation"), ("translation", "KJV"), ("limit", "5")])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result["words"], json!([]), "English verses carry no tags");
    }
    Ok(())
}

#[tokio::test]
async fn lexicon_search_filters_by_strongs_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_tahot_fixture(&app).await?;
    app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[
            ("q", "god"),
            ("translation", "TAHOT"),
            ("strongs_ids", "h3068"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results.len(), 1, "only the verse containing H3068 remains");
    assert_eq!(results[0]["book_name"], "Psalms");

    // A filter that matches nothing is an empty page, not an error.
    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[
            ("q", "god"),
            ("translation", "TAHOT"),
            ("strongs_ids", "H9999"),
        ])
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results, Vec::<Value>::new());
    Ok(())
}

#[tokio::test]
async fn strongs_filter_on_untagged_translation_empties_the_page() -> Result<()> {
    // KJV verses carry no tagged words, so no verse can match a Strong's
    // ID; the filter yields an empty page, never an error.
    let app = TestApp::spawn().await?;
    seed_kjv_fixture(&app).await?;
    app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[
            ("q", "god"),
            ("translation", "KJV"),
            ("strongs_ids", "H430"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results, Vec::<Value>::new());
    Ok(())
}

#[tokio::test]
async fn lexicon_search_boost_mode_reorders_without_dropping() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_tahot_fixture(&app).await?;
    app.mock_embedding(&[1.0, 0.0, 0.0, 0.0]);

    // Boosted scores with weight 0.3: Genesis 1:1 (similarity 1.0, one H430
    // word) lands on 1.3, Psalms 100:3 (similarity ~0.8, two H430 words) on
    // 1.4, so Psalms overtakes.
    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[
            ("q", "god"),
            ("translation", "TAHOT"),
            ("strongs_ids", "H430"),
            ("strongs_mode", "boost"),
            ("boost_weight", "0.3"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let results: Vec<Value> = response.json().await?;
    assert_eq!(results.len(), 2, "boost mode never drops results");
    assert_eq!(results[0]["book_name"], "Psalms");
    assert_eq!(results[1]["book_name"], "Genesis");

    // The reported similarity stays the base cosine score.
    let psalms_similarity = results[0]["similarity"].as_f64().unwrap();
    assert!(
        (psalms_similarity - 0.8).abs() < 1e-3,
        "boost must not rewrite similarity, got {psalms_similarity}"
    );
    Ok(())
}

#[tokio::test]
async fn lexicon_search_rejects_unknown_strongs_mode() -> Result<()> {
    let app = TestApp::spawn().await?;
    let embeddings_mock = app.mock_embedding(&[1.0, 0.0]);

    let response = app
        .client
        .get(format!("{}/api/vector-search-with-lexicon", app.address))
        .query(&[
            ("q", "god"),
            ("strongs_ids", "H430"),
            ("strongs_mode", "rerank"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().contains("strongs_mode"));
    embeddings_mock.assert_hits(0);
    Ok(())
}
