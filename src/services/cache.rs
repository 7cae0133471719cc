use serde::de::DeserializeOwned;
use serde::Serialize;

use super::local_store::LocalStore;

/// Deterministic cache addresses, one namespace per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey<'a> {
    Translation {
        word: &'a str,
        native: &'a str,
        target: &'a str,
    },
    Grammar {
        word: &'a str,
        target: &'a str,
    },
}

impl CacheKey<'_> {
    pub fn render(&self) -> String {
        match self {
            CacheKey::Translation {
                word,
                native,
                target,
            } => format!("tr_{}_{}_{}", word.trim(), native, target),
            CacheKey::Grammar { word, target } => format!("grammar_{}_{}", word.trim(), target),
        }
    }
}

/// Unbounded response cache over the local store. No eviction, no expiry.
pub fn get<T: DeserializeOwned>(store: &LocalStore, key: &CacheKey) -> Option<T> {
    let rendered = key.render();
    let value = store.get(&rendered)?;

    match serde_json::from_value::<T>(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("[cache] unreadable entry {rendered}: {e}");
            None
        }
    }
}

pub fn put<T: Serialize>(store: &mut LocalStore, key: &CacheKey, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(v) => store.set(&key.render(), v),
        Err(e) => tracing::warn!("[cache] failed to encode {}: {e}", key.render()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::translation::TranslationResult;
    use serde_json::json;

    #[test]
    fn keys_separate_operations_and_language_pairs() {
        let tr = CacheKey::Translation {
            word: " hello ",
            native: "en",
            target: "es",
        };
        let gr = CacheKey::Grammar {
            word: "hello",
            target: "es",
        };
        assert_eq!(tr.render(), "tr_hello_en_es");
        assert_eq!(gr.render(), "grammar_hello_es");
        assert_ne!(
            tr.render(),
            CacheKey::Translation {
                word: "hello",
                native: "es",
                target: "en"
            }
            .render()
        );
    }

    #[test]
    fn payload_of_wrong_shape_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open(dir.path());
        let key = CacheKey::Grammar {
            word: "run",
            target: "es",
        };
        store.set(&key.render(), json!("not an object"));

        assert!(get::<TranslationResult>(&store, &key).is_none());
    }
}
