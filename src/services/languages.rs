use serde::Serialize;

const FALLBACK_SPEECH_LOCALE: &str = "en-US";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    pub speech_locale: &'static str,
}

const SUPPORTED: &[Language] = &[
    Language { code: "en", name: "English", flag: "🇬🇧", speech_locale: "en-US" },
    Language { code: "es", name: "Spanish", flag: "🇪🇸", speech_locale: "es-ES" },
    Language { code: "pt", name: "Portuguese", flag: "🇧🇷", speech_locale: "pt-PT" },
    Language { code: "de", name: "German", flag: "🇩🇪", speech_locale: "de-DE" },
    Language { code: "fr", name: "French", flag: "🇫🇷", speech_locale: "fr-FR" },
    Language { code: "uk", name: "Ukrainian", flag: "🇺🇦", speech_locale: "uk-UA" },
    Language { code: "ru", name: "Russian", flag: "🇷🇺", speech_locale: "ru-RU" },
];

/// Immutable lookup table of the languages the app offers.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    languages: &'static [Language],
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self { languages: SUPPORTED }
    }
}

impl LanguageTable {
    pub fn all(&self) -> &[Language] {
        self.languages
    }

    pub fn get(&self, code: &str) -> Option<&Language> {
        let code = code.trim();
        self.languages.iter().find(|l| l.code.eq_ignore_ascii_case(code))
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn speech_locale(&self, code: &str) -> &'static str {
        self.get(code)
            .map(|l| l.speech_locale)
            .unwrap_or(FALLBACK_SPEECH_LOCALE)
    }
}
