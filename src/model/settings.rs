use serde::{Deserialize, Serialize};

/// The user's language pair. Stored as `settings/langs` remotely.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    #[serde(rename = "native", alias = "native_language")]
    pub native_language: String,

    #[serde(rename = "target", alias = "target_language")]
    pub target_language: String,
}

impl LanguagePreference {
    pub fn new(native: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            native_language: native.into(),
            target_language: target.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.native_language.trim().is_empty() && !self.target_language.trim().is_empty()
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.target_language.clone(), self.native_language.clone())
    }
}
