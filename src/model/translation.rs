use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full result of a word lookup, as returned by `POST /translate`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TranslationResult {
    #[serde(rename = "word", default)]
    pub original_word: String,

    #[serde(rename = "main", default)]
    pub main_translation: String,

    #[serde(default)]
    pub alternatives: Vec<String>,

    #[serde(rename = "partOfSpeech", default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,

    #[serde(default)]
    pub meanings: Vec<Meaning>,

    /// Tense name -> slash separated person forms.
    #[serde(rename = "forms", default)]
    pub conjugation_forms: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Meaning {
    #[serde(rename = "meaning", default)]
    pub meaning_text: String,

    #[serde(rename = "translation", default)]
    pub translated_form: String,

    #[serde(rename = "example", default)]
    pub example_sentence: String,

    #[serde(rename = "exampleTranslation", default)]
    pub example_translation: String,
}

impl TranslationResult {
    /// The translation stored alongside saved and history entries.
    ///
    /// The first alternative that is not blank after trimming. Blank
    /// alternatives are skipped, and the main translation is used when none
    /// remain.
    pub fn headline(&self) -> &str {
        self.alternatives
            .iter()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
            .unwrap_or_else(|| self.main_translation.trim())
    }

    /// Presence checks only; the content itself is taken as-is.
    pub fn is_complete(&self) -> bool {
        !self.main_translation.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wire_shape() {
        let v = json!({
            "word": "hello",
            "main": "hola",
            "alternatives": ["hola", "buenas"],
            "partOfSpeech": "phrase",
            "meanings": [{
                "meaning": "greeting",
                "translation": "hola",
                "example": "¡Hola, amigo!",
                "exampleTranslation": "Hello, friend!"
            }],
            "forms": {}
        });

        let r: TranslationResult = serde_json::from_value(v).unwrap();
        assert_eq!(r.original_word, "hello");
        assert_eq!(r.part_of_speech.as_deref(), Some("phrase"));
        assert!(r.phonetic.is_none());
        assert_eq!(r.meanings[0].example_translation, "Hello, friend!");
        assert!(r.is_complete());
    }

    #[test]
    fn headline_skips_blank_alternatives() {
        let mut r = TranslationResult {
            main_translation: "correr".into(),
            alternatives: vec!["  ".into(), "trotar".into()],
            ..Default::default()
        };
        assert_eq!(r.headline(), "trotar");

        r.alternatives.clear();
        assert_eq!(r.headline(), "correr");
    }
}
