//! In-memory fakes for the API and the remote store.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use chrono::{Duration, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};
use crate::model::entry::{Collection, NewEntry, WordEntry};
use crate::model::grammar::ConjugationTable;
use crate::model::settings::LanguagePreference;
use crate::model::translation::TranslationResult;
use crate::services::api::WordyApi;
use crate::services::api_types::{EmailKind, SpeechAudio};
use crate::services::store::RemoteStore;

pub fn sample_result(word: &str, main: &str) -> TranslationResult {
    TranslationResult {
        original_word: word.to_string(),
        main_translation: main.to_string(),
        alternatives: vec![main.to_string()],
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub translate_calls: Cell<usize>,
    pub grammar_calls: Cell<usize>,
    pub suggestion_calls: RefCell<Vec<String>>,
    pub speech_calls: Cell<usize>,
    pub emails: RefCell<Vec<(String, EmailKind)>>,
    pub fail_translate: Cell<bool>,
    pub fail_grammar: Cell<bool>,
    pub fail_speech: Cell<bool>,
    pub grammar_table: RefCell<Option<ConjugationTable>>,
    pub suggestion_results: RefCell<VecDeque<Vec<String>>>,
}

impl WordyApi for FakeApi {
    fn translate(&self, text: &str, _from: &str, _to: &str) -> CoreResult<TranslationResult> {
        self.translate_calls.set(self.translate_calls.get() + 1);
        if self.fail_translate.get() {
            return Err(CoreError::Http {
                status: 500,
                message: "Translation failed".into(),
            });
        }
        Ok(sample_result(text, &format!("{text}-tr")))
    }

    fn grammar(&self, _word: &str, translation: &str, _to: &str) -> CoreResult<ConjugationTable> {
        self.grammar_calls.set(self.grammar_calls.get() + 1);
        if self.fail_grammar.get() {
            return Err(CoreError::Malformed("grammar: body is not JSON".into()));
        }
        Ok(self.grammar_table.borrow().clone().unwrap_or_else(|| ConjugationTable {
            is_verb: true,
            lemma: Some(translation.to_string()),
            ..Default::default()
        }))
    }

    fn suggestions(&self, prefix: &str, _lang: &str) -> Vec<String> {
        self.suggestion_calls.borrow_mut().push(prefix.to_string());
        self.suggestion_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| vec![format!("{prefix}llo")])
    }

    fn speech(&self, _text: &str, _lang: &str) -> CoreResult<SpeechAudio> {
        self.speech_calls.set(self.speech_calls.get() + 1);
        if self.fail_speech.get() {
            return Err(CoreError::Upstream("TTS failed".into()));
        }
        Ok(SpeechAudio {
            mime: "audio/mpeg".into(),
            bytes: vec![1, 2, 3],
        })
    }

    fn send_email(&self, to: &str, kind: EmailKind) -> CoreResult<()> {
        self.emails.borrow_mut().push((to.to_string(), kind));
        Ok(())
    }
}

/// Remote store in memory with a deterministic clock and failure switches.
#[derive(Default)]
pub struct MemoryStore {
    pub saved: Vec<WordEntry>,
    pub history: Vec<WordEntry>,
    pub langs: Option<LanguagePreference>,
    pub fail_writes: bool,
    pub fail_deletes: bool,
    pub next_id: usize,
}

impl MemoryStore {
    fn items(&mut self, collection: Collection) -> &mut Vec<WordEntry> {
        match collection {
            Collection::Saved => &mut self.saved,
            Collection::History => &mut self.history,
        }
    }
}

impl RemoteStore for MemoryStore {
    fn add(&mut self, collection: Collection, entry: NewEntry) -> CoreResult<WordEntry> {
        if self.fail_writes {
            return Err(CoreError::Storage("remote unavailable".into()));
        }
        self.next_id += 1;
        let created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap()
            + Duration::seconds(self.next_id as i64);
        let created = entry.into_entry(format!("id-{}", self.next_id), created_at);
        self.items(collection).insert(0, created.clone());
        Ok(created)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> CoreResult<()> {
        if self.fail_deletes {
            return Err(CoreError::Storage("remote unavailable".into()));
        }
        self.items(collection).retain(|e| e.id != id);
        Ok(())
    }

    fn delete_many(&mut self, collection: Collection, ids: &[String]) -> CoreResult<()> {
        if self.fail_deletes {
            return Err(CoreError::Storage("remote unavailable".into()));
        }
        self.items(collection).retain(|e| !ids.contains(&e.id));
        Ok(())
    }

    fn list(&self, collection: Collection) -> CoreResult<Vec<WordEntry>> {
        Ok(match collection {
            Collection::Saved => self.saved.clone(),
            Collection::History => self.history.clone(),
        })
    }

    fn load_langs(&self) -> CoreResult<Option<LanguagePreference>> {
        Ok(self.langs.clone())
    }

    fn save_langs(&mut self, langs: &LanguagePreference) -> CoreResult<()> {
        if self.fail_writes {
            return Err(CoreError::Storage("remote unavailable".into()));
        }
        self.langs = Some(langs.clone());
        Ok(())
    }
}

impl<T: WordyApi + ?Sized> WordyApi for std::rc::Rc<T> {
    fn translate(&self, text: &str, from: &str, to: &str) -> CoreResult<TranslationResult> {
        (**self).translate(text, from, to)
    }

    fn grammar(&self, word: &str, translation: &str, to: &str) -> CoreResult<ConjugationTable> {
        (**self).grammar(word, translation, to)
    }

    fn suggestions(&self, prefix: &str, lang: &str) -> Vec<String> {
        (**self).suggestions(prefix, lang)
    }

    fn speech(&self, text: &str, lang: &str) -> CoreResult<SpeechAudio> {
        (**self).speech(text, lang)
    }

    fn send_email(&self, to: &str, kind: EmailKind) -> CoreResult<()> {
        (**self).send_email(to, kind)
    }
}
