use crate::error::{CoreError, CoreResult};
use crate::model::grammar::ConjugationTable;
use crate::model::translation::TranslationResult;
use crate::services::api_types::{
    EmailKind, EmailRequest, GrammarRequest, SpeechAudio, SpeechRequest, SuggestionsRequest,
    SuggestionsResponse, TranslateRequest,
};

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use std::time::Duration;

const ERROR_SNIPPET_CHARS: usize = 400;

/// The Wordy HTTP API. Credentials for the language services live behind it,
/// never in the core.
pub trait WordyApi {
    fn translate(&self, text: &str, from_lang: &str, to_lang: &str)
        -> CoreResult<TranslationResult>;

    fn grammar(&self, word: &str, translation: &str, to_lang: &str)
        -> CoreResult<ConjugationTable>;

    /// Never fails: any problem yields an empty list.
    fn suggestions(&self, prefix: &str, lang: &str) -> Vec<String>;

    fn speech(&self, text: &str, lang: &str) -> CoreResult<SpeechAudio>;

    fn send_email(&self, to: &str, kind: EmailKind) -> CoreResult<()>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CoreError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send<B: Serialize>(&self, path: &str, body: &B) -> CoreResult<reqwest::blocking::Response> {
        let url = self.url(path);
        tracing::debug!("POST {url}");

        self.client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| {
                tracing::warn!("POST {url} failed: {e}");
                CoreError::Network(e)
            })
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> CoreResult<Value> {
        let resp = self.send(path, body)?;
        let status = resp.status();

        // Read as text first so an HTTP error keeps its message even when the body is not JSON.
        let text = resp.text().map_err(CoreError::Network)?;

        if !status.is_success() {
            return Err(CoreError::Http {
                status: status.as_u16(),
                message: extract_error_message(status, &text),
            });
        }

        let v: Value = serde_json::from_str(&text)
            .map_err(|_| CoreError::Malformed(format!("{path}: body is not JSON")))?;

        if let Some(msg) = upstream_error(&v) {
            return Err(CoreError::Upstream(msg));
        }

        Ok(v)
    }
}

impl WordyApi for HttpApi {
    fn translate(
        &self,
        text: &str,
        from_lang: &str,
        to_lang: &str,
    ) -> CoreResult<TranslationResult> {
        let body = TranslateRequest {
            text,
            from_lang,
            to_lang,
        };
        let v = self.post_json("translate", &body)?;

        let result: TranslationResult = serde_json::from_value(v)
            .map_err(|e| CoreError::Malformed(format!("translate: {e}")))?;

        if !result.is_complete() {
            return Err(CoreError::Malformed(
                "translate: missing main translation".into(),
            ));
        }

        Ok(result)
    }

    fn grammar(
        &self,
        word: &str,
        translation: &str,
        to_lang: &str,
    ) -> CoreResult<ConjugationTable> {
        let body = GrammarRequest {
            word,
            translation,
            to_lang,
        };
        let v = self.post_json("grammar", &body)?;

        serde_json::from_value(v).map_err(|e| CoreError::Malformed(format!("grammar: {e}")))
    }

    fn suggestions(&self, prefix: &str, lang: &str) -> Vec<String> {
        let body = SuggestionsRequest { prefix, lang };

        match self.post_json("suggestions", &body) {
            Ok(v) => serde_json::from_value::<SuggestionsResponse>(v)
                .map(|r| r.suggestions)
                .unwrap_or_default(),
            Err(e) => {
                tracing::debug!("suggestions for {prefix:?} dropped: {e}");
                Vec::new()
            }
        }
    }

    fn speech(&self, text: &str, lang: &str) -> CoreResult<SpeechAudio> {
        let resp = self.send("tts", &SpeechRequest { text, lang })?;
        let status = resp.status();

        let mime = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = resp.bytes().map_err(CoreError::Network)?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(CoreError::Http {
                status: status.as_u16(),
                message: extract_error_message(status, &text),
            });
        }

        if !mime.starts_with("audio/") {
            let text = String::from_utf8_lossy(&bytes);
            if let Some(msg) = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| upstream_error(&v))
            {
                return Err(CoreError::Upstream(msg));
            }
            return Err(CoreError::Malformed(format!("tts: unexpected content type {mime:?}")));
        }

        if bytes.is_empty() {
            return Err(CoreError::Malformed("tts: empty audio".into()));
        }

        Ok(SpeechAudio {
            mime,
            bytes: bytes.to_vec(),
        })
    }

    fn send_email(&self, to: &str, kind: EmailKind) -> CoreResult<()> {
        let v = self.post_json("send-email", &EmailRequest { to, kind })?;

        match v.get("success").and_then(|s| s.as_bool()) {
            Some(true) => Ok(()),
            _ => Err(CoreError::Malformed("send-email: missing success flag".into())),
        }
    }
}

/// `{ "error": "..." }` or `{ "error": { "message": "..." } }` in a 2xx body.
fn upstream_error(v: &Value) -> Option<String> {
    let err = v.get("error")?;
    if err.is_null() {
        return None;
    }
    if let Some(s) = err.as_str() {
        return Some(s.to_string());
    }
    if let Some(msg) = err.get("message").and_then(|m| m.as_str()) {
        return Some(msg.to_string());
    }
    Some(err.to_string())
}

pub(crate) fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = v.get("error").and_then(|e| e.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body_text.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }

    if trimmed.chars().count() > ERROR_SNIPPET_CHARS {
        let snippet: String = trimmed.chars().take(ERROR_SNIPPET_CHARS).collect();
        format!("{snippet}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn api_for(server: &Server) -> HttpApi {
        HttpApi::new(&format!("{}/api/", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn translate_posts_wire_body_and_parses_result() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/translate")
            .match_body(Matcher::Json(json!({
                "text": "hello",
                "fromLang": "en",
                "toLang": "es"
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"word":"hello","main":"hola","alternatives":["hola"],"meanings":[],"forms":{}}"#)
            .create();

        let r = api_for(&server).translate("hello", "en", "es").unwrap();
        assert_eq!(r.main_translation, "hola");
        mock.assert();
    }

    #[test]
    fn error_body_maps_to_http_error() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/translate")
            .with_status(500)
            .with_body(r#"{"error":"Translation failed: No content"}"#)
            .create();

        let err = api_for(&server).translate("hello", "en", "es").unwrap_err();
        match err {
            CoreError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Translation failed: No content");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/translate")
            .with_body("<html>oops</html>")
            .create();

        let err = api_for(&server).translate("hello", "en", "es").unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn missing_main_is_malformed() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/translate")
            .with_body(r#"{"word":"hello"}"#)
            .create();

        let err = api_for(&server).translate("hello", "en", "es").unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn suggestions_swallow_failures() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/suggestions")
            .with_status(503)
            .create();

        assert!(api_for(&server).suggestions("he", "en").is_empty());
    }

    #[test]
    fn speech_returns_audio_bytes() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/tts")
            .with_header("content-type", "audio/mpeg")
            .with_body(vec![0x49, 0x44, 0x33])
            .create();

        let audio = api_for(&server).speech("hola", "es").unwrap();
        assert_eq!(audio.mime, "audio/mpeg");
        assert_eq!(audio.bytes, vec![0x49, 0x44, 0x33]);
    }

    #[test]
    fn speech_json_error_is_upstream() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/tts")
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"No API key"}"#)
            .create();

        let err = api_for(&server).speech("hola", "es").unwrap_err();
        assert_eq!(err.to_string(), "No API key");
    }

    #[test]
    fn grammar_non_verb_parses() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/grammar")
            .match_body(Matcher::Json(json!({
                "word": "house",
                "translation": "casa",
                "toLang": "es"
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"isVerb":false}"#)
            .create();

        let table = api_for(&server).grammar("house", "casa", "es").unwrap();
        assert!(!table.is_verb);
        assert!(table.table.is_empty());
        mock.assert();
    }

    #[test]
    fn grammar_error_body_is_upstream() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/grammar")
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Grammar lookup failed"}"#)
            .create();

        let err = api_for(&server).grammar("run", "correr", "es").unwrap_err();
        assert!(matches!(err, CoreError::Upstream(ref m) if m == "Grammar lookup failed"));
        assert_eq!(err.kind(), "http");
    }

    #[test]
    fn send_email_success() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/send-email")
            .match_body(Matcher::Json(json!({
                "to": "ana@example.com",
                "type": "reset"
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create();

        api_for(&server)
            .send_email("ana@example.com", EmailKind::Reset)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn send_email_without_success_flag_is_malformed() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/send-email")
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create();

        let err = api_for(&server)
            .send_email("ana@example.com", EmailKind::Verify)
            .unwrap_err();
        assert!(matches!(err, CoreError::Malformed(_)));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let msg = extract_error_message(StatusCode::BAD_GATEWAY, &body);
        assert_eq!(msg.len(), ERROR_SNIPPET_CHARS + 3);
    }
}
