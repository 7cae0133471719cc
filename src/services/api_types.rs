use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    pub text: &'a str,
    #[serde(rename = "fromLang")]
    pub from_lang: &'a str,
    #[serde(rename = "toLang")]
    pub to_lang: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GrammarRequest<'a> {
    pub word: &'a str,
    pub translation: &'a str,
    #[serde(rename = "toLang")]
    pub to_lang: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsRequest<'a> {
    pub prefix: &'a str,
    pub lang: &'a str,
}

#[derive(Debug, Deserialize, Default)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeechRequest<'a> {
    pub text: &'a str,
    pub lang: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmailRequest<'a> {
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: EmailKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    Reset,
    Verify,
}

impl EmailKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "reset" => Some(EmailKind::Reset),
            "verify" => Some(EmailKind::Verify),
            _ => None,
        }
    }
}

/// Audio returned by `POST /tts`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub mime: String,
    pub bytes: Vec<u8>,
}
