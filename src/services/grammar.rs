use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::model::grammar::ConjugationTable;
use crate::services::api::WordyApi;
use crate::services::cache::{self, CacheKey};
use crate::services::local_store::LocalStore;

#[derive(Debug, Serialize)]
pub struct GrammarOutcome {
    pub table: ConjugationTable,
    pub from_cache: bool,
}

/// Fetches the conjugation table for a translated word. No retry: a failure
/// leaves the table unloaded and the user may ask again.
pub fn load_conjugation(
    api: &dyn WordyApi,
    local: &mut LocalStore,
    word: &str,
    translation: &str,
    target_lang: &str,
) -> CoreResult<GrammarOutcome> {
    let word = word.trim();
    let translation = translation.trim();

    if word.is_empty() || translation.is_empty() {
        return Err(CoreError::validation("Translate a word first"));
    }

    let key = CacheKey::Grammar {
        word,
        target: target_lang,
    };

    if let Some(table) = cache::get::<ConjugationTable>(local, &key) {
        return Ok(GrammarOutcome {
            table,
            from_cache: true,
        });
    }

    let table = api.grammar(word, translation, target_lang)?;
    cache::put(local, &key, &table);
    tracing::debug!("[grammar] loaded {word:?} ({target_lang}), verb={}", table.is_verb);

    Ok(GrammarOutcome {
        table,
        from_cache: false,
    })
}
