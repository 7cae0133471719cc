use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::translation::TranslationResult;

/// A saved word or a history record. Both collections share the shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WordEntry {
    pub id: String,

    pub word: String,

    #[serde(default)]
    pub translation: String,

    #[serde(alias = "fromLang")]
    pub source_language: String,

    #[serde(alias = "toLang")]
    pub target_language: String,

    #[serde(alias = "result")]
    pub full_result: TranslationResult,

    pub created_at: DateTime<Utc>,
}

/// Entry before the store assigned it an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub word: String,
    pub translation: String,
    pub source_language: String,
    pub target_language: String,
    pub full_result: TranslationResult,
}

impl NewEntry {
    /// `translation` is always derived from the result here, never passed in.
    pub fn from_result(
        word: &str,
        source_language: &str,
        target_language: &str,
        result: TranslationResult,
    ) -> Self {
        NewEntry {
            word: word.trim().to_string(),
            translation: result.headline().to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            full_result: result,
        }
    }

    pub fn into_entry(self, id: String, created_at: DateTime<Utc>) -> WordEntry {
        WordEntry {
            id,
            word: self.word,
            translation: self.translation,
            source_language: self.source_language,
            target_language: self.target_language,
            full_result: self.full_result,
            created_at,
        }
    }
}

impl WordEntry {
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.word.to_lowercase().contains(&q) || self.translation.to_lowercase().contains(&q)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Saved,
    History,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Saved => "saved",
            Collection::History => "history",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_comes_from_first_alternative() {
        let result = TranslationResult {
            original_word: "run".into(),
            main_translation: "correr".into(),
            alternatives: vec!["correr".into(), "trotar".into()],
            ..Default::default()
        };
        let e = NewEntry::from_result("  run ", "en", "es", result);
        assert_eq!(e.word, "run");
        assert_eq!(e.translation, "correr");
    }

    #[test]
    fn search_is_case_insensitive_on_word_and_translation() {
        let e = NewEntry::from_result(
            "House",
            "en",
            "de",
            TranslationResult {
                main_translation: "Haus".into(),
                ..Default::default()
            },
        )
        .into_entry("abc".into(), Utc::now());

        assert!(e.matches("hou"));
        assert!(e.matches("HAUS"));
        assert!(e.matches(""));
        assert!(!e.matches("garden"));
    }
}
