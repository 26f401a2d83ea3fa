//! # Translation Policy
//!
//! The set of supported translation sources is closed: adding one is a code
//! change, not a data change. Each translation knows whether it carries
//! word-level Strong's tagging and, if so, which word, lexicon and
//! morphology tables back it. Everything downstream (enrichment, the HTTP
//! layer, tests) derives its behavior from this module instead of
//! re-checking translation codes.

use crate::errors::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Original-manuscript language behind a tagged translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginalLanguage {
    Hebrew,
    Greek,
}

impl OriginalLanguage {
    /// The table triple holding this language's word-level data.
    pub fn tables(self) -> LexiconTables {
        match self {
            OriginalLanguage::Hebrew => LexiconTables {
                language: OriginalLanguage::Hebrew,
                words: "hebrew_words",
                lexicon: "hebrew_lexicon",
                morphology: "hebrew_morphology",
            },
            OriginalLanguage::Greek => LexiconTables {
                language: OriginalLanguage::Greek,
                words: "greek_words",
                lexicon: "greek_lexicon",
                morphology: "greek_morphology",
            },
        }
    }
}

impl fmt::Display for OriginalLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginalLanguage::Hebrew => write!(f, "hebrew"),
            OriginalLanguage::Greek => write!(f, "greek"),
        }
    }
}

/// The word, lexicon and morphology tables for one tagged language.
///
/// Table names are compile-time constants so they can be spliced into SQL
/// without any quoting concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconTables {
    pub language: OriginalLanguage,
    pub words: &'static str,
    pub lexicon: &'static str,
    pub morphology: &'static str,
}

/// A supported translation source, matching `verses.translation_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Translation {
    /// King James Version. English, no word-level tagging.
    Kjv,
    /// American Standard Version. English, no word-level tagging.
    Asv,
    /// Young's Literal Translation. English, no word-level tagging.
    Ylt,
    /// Translators Amalgamated Hebrew Old Testament. Strong's-tagged Hebrew.
    Tahot,
    /// Translators Amalgamated Greek New Testament. Strong's-tagged Greek.
    Tagnt,
}

impl Translation {
    /// Every supported translation, in presentation order.
    pub const ALL: [Translation; 5] = [
        Translation::Kjv,
        Translation::Asv,
        Translation::Ylt,
        Translation::Tahot,
        Translation::Tagnt,
    ];

    /// The code stored in the `verses.translation_source` column.
    pub fn code(&self) -> &'static str {
        match self {
            Translation::Kjv => "KJV",
            Translation::Asv => "ASV",
            Translation::Ylt => "YLT",
            Translation::Tahot => "TAHOT",
            Translation::Tagnt => "TAGNT",
        }
    }

    /// The tables used for lexical enrichment, or `None` for translations
    /// without word-level tagging. Enrichment of an untagged translation is
    /// a no-op that yields empty word lists, never an error.
    pub fn lexicon_tables(&self) -> Option<LexiconTables> {
        match self {
            Translation::Tahot => Some(OriginalLanguage::Hebrew.tables()),
            Translation::Tagnt => Some(OriginalLanguage::Greek.tables()),
            Translation::Kjv | Translation::Asv | Translation::Ylt => None,
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Translation {
    type Err = SearchError;

    /// Parses a translation code, case-insensitively and ignoring
    /// surrounding whitespace. Unknown codes are rejected; there is no
    /// pass-through for arbitrary strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KJV" => Ok(Translation::Kjv),
            "ASV" => Ok(Translation::Asv),
            "YLT" => Ok(Translation::Ylt),
            "TAHOT" => Ok(Translation::Tahot),
            "TAGNT" => Ok(Translation::Tagnt),
            _ => Err(SearchError::InvalidTranslation(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("KJV".parse::<Translation>().unwrap(), Translation::Kjv);
        assert_eq!("kjv".parse::<Translation>().unwrap(), Translation::Kjv);
        assert_eq!(" tahot ".parse::<Translation>().unwrap(), Translation::Tahot);
        assert_eq!("TaGnT".parse::<Translation>().unwrap(), Translation::Tagnt);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "XYZ".parse::<Translation>().unwrap_err();
        assert!(matches!(err, SearchError::InvalidTranslation(code) if code == "XYZ"));
        assert!("".parse::<Translation>().is_err());
        assert!("NIV".parse::<Translation>().is_err());
    }

    #[test]
    fn only_tagged_translations_have_lexicon_tables() {
        assert!(Translation::Kjv.lexicon_tables().is_none());
        assert!(Translation::Asv.lexicon_tables().is_none());
        assert!(Translation::Ylt.lexicon_tables().is_none());

        let hebrew = Translation::Tahot.lexicon_tables().unwrap();
        assert_eq!(hebrew.language, OriginalLanguage::Hebrew);
        assert_eq!(hebrew.words, "hebrew_words");

        let greek = Translation::Tagnt.lexicon_tables().unwrap();
        assert_eq!(greek.language, OriginalLanguage::Greek);
        assert_eq!(greek.morphology, "greek_morphology");
    }

    #[test]
    fn display_matches_stored_code() {
        for translation in Translation::ALL {
            assert_eq!(translation.to_string(), translation.code());
        }
    }
}
