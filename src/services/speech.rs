use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::services::api::WordyApi;
use crate::services::languages::LanguageTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SpeechState {
    Idle,
    Requesting { text: String },
    Playing { text: String, lang: String, token: u64 },
    Synthesizing { text: String, token: u64 },
}

impl SpeechState {
    pub fn text(&self) -> Option<&str> {
        match self {
            SpeechState::Idle => None,
            SpeechState::Requesting { text }
            | SpeechState::Playing { text, .. }
            | SpeechState::Synthesizing { text, .. } => Some(text),
        }
    }

    pub fn token(&self) -> Option<u64> {
        match self {
            SpeechState::Playing { token, .. } | SpeechState::Synthesizing { token, .. } => {
                Some(*token)
            }
            _ => None,
        }
    }
}

/// Instructions for the shell, which owns the audio element and the
/// on-device synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum SpeechDirective {
    /// Pause any audio and cancel any on-device utterance.
    StopAll,
    PlayAudio {
        token: u64,
        mime: String,
        audio_base64: String,
    },
    Synthesize {
        token: u64,
        text: String,
        locale: String,
        rate: f32,
    },
}

/// Single active utterance; the token ties shell reports to it.
#[derive(Debug)]
pub struct SpeechTrigger {
    state: SpeechState,
    next_token: u64,
    languages: LanguageTable,
    rate: f32,
    on_device: bool,
}

impl SpeechTrigger {
    pub fn new(languages: LanguageTable, rate: f32, on_device: bool) -> Self {
        Self {
            state: SpeechState::Idle,
            next_token: 1,
            languages,
            rate,
            on_device,
        }
    }

    pub fn state(&self) -> &SpeechState {
        &self.state
    }

    pub fn speak(
        &mut self,
        api: &dyn WordyApi,
        text: &str,
        lang: &str,
    ) -> CoreResult<Vec<SpeechDirective>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::validation("Nothing to pronounce"));
        }

        let mut directives = vec![SpeechDirective::StopAll];

        // Same word again: stop.
        if self.state.text() == Some(text) {
            self.state = SpeechState::Idle;
            return Ok(directives);
        }

        self.state = SpeechState::Requesting {
            text: text.to_string(),
        };

        match api.speech(text, lang) {
            Ok(audio) => {
                let token = self.issue_token();
                self.state = SpeechState::Playing {
                    text: text.to_string(),
                    lang: lang.to_string(),
                    token,
                };
                directives.push(SpeechDirective::PlayAudio {
                    token,
                    mime: audio.mime,
                    audio_base64: BASE64.encode(&audio.bytes),
                });
            }
            Err(e) => {
                tracing::warn!("[speech] remote voice unavailable, falling back: {e}");
                directives.extend(self.fall_back(text, lang));
            }
        }

        Ok(directives)
    }

    /// The shell finished playing `token`. Stale tokens are ignored.
    pub fn finished(&mut self, token: u64) -> bool {
        if self.state.token() == Some(token) {
            self.state = SpeechState::Idle;
            true
        } else {
            false
        }
    }

    /// Audio playback failed: try the on-device voice once. A failed
    /// on-device utterance just ends.
    pub fn failed(&mut self, token: u64) -> Vec<SpeechDirective> {
        if self.state.token() != Some(token) {
            return Vec::new();
        }

        match std::mem::replace(&mut self.state, SpeechState::Idle) {
            SpeechState::Playing { text, lang, .. } => self.fall_back(&text, &lang),
            _ => Vec::new(),
        }
    }

    fn fall_back(&mut self, text: &str, lang: &str) -> Vec<SpeechDirective> {
        if !self.on_device {
            self.state = SpeechState::Idle;
            return Vec::new();
        }

        let token = self.issue_token();
        self.state = SpeechState::Synthesizing {
            text: text.to_string(),
            token,
        };

        vec![SpeechDirective::Synthesize {
            token,
            text: text.to_string(),
            locale: self.languages.speech_locale(lang).to_string(),
            rate: self.rate,
        }]
    }

    fn issue_token(&mut self) -> u64 {
        let t = self.next_token;
        self.next_token += 1;
        t
    }
}
