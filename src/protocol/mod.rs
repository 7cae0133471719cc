use std::time::Instant;

use serde_json::{json, Value};

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::model::entry::{Collection, NewEntry};
use crate::model::settings::LanguagePreference;
use crate::model::translation::TranslationResult;
use crate::services::api::WordyApi;
use crate::services::debounce::{InputOutcome, SuggestionDebouncer};
use crate::services::languages::LanguageTable;
use crate::services::local_store::LocalStore;
use crate::services::session::Session;
use crate::services::speech::SpeechTrigger;
use crate::services::store::RemoteStore;
use crate::services::{account, grammar, translate};

mod command;
use command::Command;

const DEFAULT_NATIVE: &str = "en";

pub type StoreFactory = Box<dyn Fn(&str) -> CoreResult<Box<dyn RemoteStore>>>;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn str_field<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, kind: &str, message: impl Into<String>, retryable: bool) -> String {
    json!({
        "id": id,
        "status": "error",
        "kind": kind,
        "message": message.into(),
        "retryable": retryable
    })
    .to_string()
}

fn core_err(id: Value, e: &CoreError) -> String {
    err(id, e.kind(), e.to_string(), e.retryable())
}

fn event(name: &str, payload: Value) -> String {
    json!({
        "event": name,
        "payload": payload
    })
    .to_string()
}

/// State behind the line protocol. One instance per process; every command
/// runs to completion before the next line is read.
pub struct Core {
    config: CoreConfig,
    api: Box<dyn WordyApi>,
    open_store: StoreFactory,
    local: LocalStore,
    languages: LanguageTable,
    langs: LanguagePreference,
    session: Option<Session>,
    debouncer: SuggestionDebouncer,
    speech: SpeechTrigger,
    last_result: Option<TranslationResult>,
}

impl Core {
    pub fn new(config: CoreConfig, api: Box<dyn WordyApi>, open_store: StoreFactory) -> Self {
        let languages = LanguageTable::default();
        let local = LocalStore::open(&config.data_dir);
        let debouncer =
            SuggestionDebouncer::new(config.suggestion_delay(), config.min_suggestion_chars);
        let speech = SpeechTrigger::new(
            languages.clone(),
            config.speech_rate,
            config.on_device_speech,
        );

        Self {
            config,
            api,
            open_store,
            local,
            languages,
            langs: LanguagePreference::new(DEFAULT_NATIVE, ""),
            session: None,
            debouncer,
            speech,
            last_result: None,
        }
    }

    /// When the pending suggestion fetch is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Fires a due suggestion fetch and returns the event line for it.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let prefix = self.debouncer.take_due(now)?;
        let suggestions = self.api.suggestions(&prefix, &self.langs.native_language);

        Some(event(
            "suggestions",
            json!({ "prefix": prefix, "suggestions": suggestions }),
        ))
    }

    pub fn handle(&mut self, input: &str, now: Instant) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd_str = get_cmd(&req);
        let payload = get_payload(&req);

        tracing::debug!("cmd {cmd_str}");

        match Command::from(cmd_str) {
            Command::Ping => ok(id, json!({ "message": "wordy-core alive" })),

            Command::SessionOpen => {
                let uid = str_field(payload, "uid").trim();
                if uid.is_empty() {
                    return err(id, "validation", "payload.uid is required", false);
                }

                let native = match str_field(payload, "native_lang").trim() {
                    n if self.languages.is_supported(n) => n,
                    _ => DEFAULT_NATIVE,
                };
                self.langs = LanguagePreference::new(native, "");
                self.last_result = None;

                if let Some(previous) = self.session.take() {
                    previous.close(&mut self.local);
                }

                let store = match (self.open_store)(uid) {
                    Ok(s) => s,
                    Err(e) => return core_err(id, &e),
                };
                let session = match Session::open(uid, store, self.config.history_cap) {
                    Ok(s) => s,
                    Err(e) => return core_err(id, &e),
                };

                if let Some(langs) = session.resolve_langs(&mut self.local) {
                    self.langs = langs;
                }

                let lib = session.library();
                let response = json!({
                    "langs": self.langs,
                    "needs_language_selection": !self.langs.is_complete(),
                    "saved": lib.entries(Collection::Saved),
                    "history": lib.entries(Collection::History),
                });
                self.session = Some(session);
                ok(id, response)
            }

            Command::SessionClose => {
                if let Some(session) = self.session.take() {
                    session.close(&mut self.local);
                }
                self.langs = LanguagePreference::new(DEFAULT_NATIVE, "");
                self.last_result = None;
                self.debouncer.cancel();
                ok(id, json!({}))
            }

            Command::LangsGet => ok(id, json!({ "langs": self.langs })),

            Command::LangsSet => {
                let native = match str_field(payload, "native").trim() {
                    "" => self.langs.native_language.clone(),
                    n => n.to_string(),
                };
                let target = str_field(payload, "target").trim().to_string();

                for code in [&native, &target] {
                    if !self.languages.is_supported(code) {
                        return err(id, "validation", format!("unsupported language: {code:?}"), false);
                    }
                }

                let langs = LanguagePreference::new(native, target);
                if let Some(session) = self.session.as_mut() {
                    if let Err(e) = session.save_langs(&mut self.local, &langs) {
                        return core_err(id, &e);
                    }
                }

                self.langs = langs;
                ok(id, json!({ "langs": self.langs }))
            }

            Command::LangsSwap => {
                self.langs = self.langs.swapped();
                self.last_result = None;
                ok(id, json!({ "langs": self.langs }))
            }

            Command::LanguagesList => ok(id, json!({ "languages": self.languages.all() })),

            Command::SuggestInput => {
                let text = str_field(payload, "text");
                match self.debouncer.on_input(text, now) {
                    InputOutcome::Clear => ok(id, json!({ "action": "clear" })),
                    InputOutcome::Scheduled(due) => ok(
                        id,
                        json!({
                            "action": "scheduled",
                            "delay_ms": due.saturating_duration_since(now).as_millis() as u64
                        }),
                    ),
                }
            }

            Command::Translate => {
                self.debouncer.cancel();

                let word = str_field(payload, "word");
                match translate::translate(
                    self.api.as_ref(),
                    &mut self.local,
                    self.session.as_mut(),
                    word,
                    &self.langs,
                ) {
                    Ok(outcome) => {
                        self.last_result = Some(outcome.result.clone());
                        ok(id, json!(outcome))
                    }
                    Err(e) => core_err(id, &e),
                }
            }

            Command::GrammarLoad => {
                let last = self.last_result.as_ref();

                let word = match str_field(payload, "word").trim() {
                    "" => last.map(|r| r.original_word.as_str()).unwrap_or(""),
                    w => w,
                };
                let translation = match str_field(payload, "translation").trim() {
                    "" => last.map(|r| r.main_translation.as_str()).unwrap_or(""),
                    t => t,
                };

                if !self.langs.is_complete() {
                    return err(id, "validation", "select a target language first", false);
                }

                match grammar::load_conjugation(
                    self.api.as_ref(),
                    &mut self.local,
                    word,
                    translation,
                    &self.langs.target_language,
                ) {
                    Ok(outcome) => ok(id, json!(outcome)),
                    Err(e) => core_err(id, &e),
                }
            }

            Command::SavedToggle => {
                let Some(session) = self.session.as_mut() else {
                    return core_err(id, &CoreError::NoSession);
                };

                let result = match payload.get("result") {
                    Some(v) if !v.is_null() => match serde_json::from_value::<TranslationResult>(v.clone()) {
                        Ok(r) => r,
                        Err(e) => return err(id, "validation", format!("invalid payload.result: {e}"), false),
                    },
                    _ => match &self.last_result {
                        Some(r) => r.clone(),
                        None => return err(id, "validation", "nothing to save", false),
                    },
                };

                let word = match str_field(payload, "word").trim() {
                    "" => result.original_word.clone(),
                    w => w.to_string(),
                };
                if word.trim().is_empty() {
                    return err(id, "validation", "payload.word is required", false);
                }

                let entry = NewEntry::from_result(
                    &word,
                    &self.langs.native_language,
                    &self.langs.target_language,
                    result,
                );
                match session.toggle_saved(entry) {
                    Ok(toggle) => ok(id, json!(toggle)),
                    Err(e) => core_err(id, &e),
                }
            }

            Command::SavedList => self.list(id, Collection::Saved, payload),
            Command::HistoryList => self.list(id, Collection::History, payload),
            Command::SavedDelete => self.delete(id, Collection::Saved, payload),
            Command::HistoryDelete => self.delete(id, Collection::History, payload),

            Command::HistoryClear => {
                let Some(session) = self.session.as_mut() else {
                    return core_err(id, &CoreError::NoSession);
                };
                match session.clear_history() {
                    Ok(removed) => ok(id, json!({ "removed": removed })),
                    Err(e) => core_err(id, &e),
                }
            }

            Command::TtsSpeak => {
                let text = str_field(payload, "text");
                let lang = match str_field(payload, "lang").trim() {
                    "" => self.langs.target_language.clone(),
                    l => l.to_string(),
                };

                match self.speech.speak(self.api.as_ref(), text, &lang) {
                    Ok(directives) => ok(
                        id,
                        json!({ "state": self.speech.state(), "directives": directives }),
                    ),
                    Err(e) => core_err(id, &e),
                }
            }

            Command::TtsFinished => {
                let Some(token) = payload.get("token").and_then(|v| v.as_u64()) else {
                    return err(id, "validation", "payload.token is required", false);
                };
                let matched = self.speech.finished(token);
                ok(id, json!({ "matched": matched, "state": self.speech.state() }))
            }

            Command::TtsFailed => {
                let Some(token) = payload.get("token").and_then(|v| v.as_u64()) else {
                    return err(id, "validation", "payload.token is required", false);
                };
                let directives = self.speech.failed(token);
                ok(id, json!({ "state": self.speech.state(), "directives": directives }))
            }

            Command::AuthDescribeError => {
                let code = str_field(payload, "code");
                ok(id, json!({ "message": account::describe_auth_error(code) }))
            }

            Command::AccountSendEmail => {
                let to = str_field(payload, "to");
                let kind = str_field(payload, "type");
                match account::send_account_email(self.api.as_ref(), to, kind) {
                    Ok(()) => ok(id, json!({ "success": true })),
                    Err(e) => core_err(id, &e),
                }
            }

            Command::Unknown => err(id, "unknown_command", "unknown command", false),
        }
    }

    fn list(&self, id: Value, collection: Collection, payload: &Value) -> String {
        let Some(session) = self.session.as_ref() else {
            return core_err(id, &CoreError::NoSession);
        };
        let query = str_field(payload, "query");
        let entries = session.library().search(collection, query);
        ok(id, json!({ "entries": entries }))
    }

    fn delete(&mut self, id: Value, collection: Collection, payload: &Value) -> String {
        let Some(session) = self.session.as_mut() else {
            return core_err(id, &CoreError::NoSession);
        };
        let entry_id = str_field(payload, "id").trim();
        if entry_id.is_empty() {
            return err(id, "validation", "payload.id is required", false);
        }
        match session.delete(collection, entry_id) {
            Ok(removed) => ok(id, json!({ "removed": removed })),
            Err(e) => core_err(id, &e),
        }
    }
}
