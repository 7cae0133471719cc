use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::model::entry::{NewEntry, WordEntry};
use crate::model::settings::LanguagePreference;
use crate::model::translation::TranslationResult;
use crate::services::api::WordyApi;
use crate::services::cache::{self, CacheKey};
use crate::services::local_store::LocalStore;
use crate::services::session::Session;

#[derive(Debug, Serialize)]
pub struct TranslateOutcome {
    pub result: TranslationResult,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_entry: Option<WordEntry>,
}

/// Cache first; on a miss one call to `/translate`, then cache write and a
/// history record for the signed-in user. Failures touch neither.
pub fn translate(
    api: &dyn WordyApi,
    local: &mut LocalStore,
    session: Option<&mut Session>,
    word: &str,
    langs: &LanguagePreference,
) -> CoreResult<TranslateOutcome> {
    let word = word.trim();
    if word.is_empty() {
        return Err(CoreError::validation("Enter a word to translate"));
    }
    if !langs.is_complete() {
        return Err(CoreError::validation("Choose a language pair first"));
    }

    let key = CacheKey::Translation {
        word,
        native: &langs.native_language,
        target: &langs.target_language,
    };

    if let Some(hit) = cache::get::<TranslationResult>(local, &key).filter(|r| r.is_complete()) {
        tracing::debug!("[translate] cache hit {}", key.render());
        return Ok(TranslateOutcome {
            result: hit,
            from_cache: true,
            history_entry: None,
        });
    }

    let result = api.translate(word, &langs.native_language, &langs.target_language)?;
    cache::put(local, &key, &result);

    let history_entry = match session {
        Some(session) => {
            let entry = NewEntry::from_result(
                word,
                &langs.native_language,
                &langs.target_language,
                result.clone(),
            );
            match session.record_history(entry) {
                Ok(e) => Some(e),
                Err(e) => {
                    tracing::warn!("[translate] history not recorded for {word:?}: {e}");
                    None
                }
            }
        }
        None => None,
    };

    tracing::info!(
        "[translate] {word:?} {}->{}",
        langs.native_language,
        langs.target_language
    );

    Ok(TranslateOutcome {
        result,
        from_cache: false,
        history_entry,
    })
}
