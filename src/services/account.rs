use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::services::api::WordyApi;
use crate::services::api_types::EmailKind;

const FALLBACK_AUTH_MESSAGE: &str = "Something went wrong";

const AUTH_MESSAGES: &[(&str, &str)] = &[
    ("auth/user-not-found", "No account with this email"),
    ("auth/wrong-password", "Incorrect password"),
    ("auth/email-already-in-use", "Email already registered"),
    ("auth/weak-password", "Password must be at least 6 characters"),
    ("auth/invalid-email", "Invalid email address"),
    ("auth/invalid-credential", "Invalid email or password"),
    ("auth/too-many-requests", "Too many attempts. Try again later"),
];

/// Human readable text for an authentication error code.
pub fn describe_auth_error(code: &str) -> &'static str {
    let code = code.trim();
    AUTH_MESSAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, msg)| *msg)
        .unwrap_or(FALLBACK_AUTH_MESSAGE)
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn send_account_email(api: &dyn WordyApi, to: &str, kind: &str) -> CoreResult<()> {
    let to = to.trim();
    if !email_re().is_match(to) {
        return Err(CoreError::validation(describe_auth_error("auth/invalid-email")));
    }

    let kind = EmailKind::parse(kind)
        .ok_or_else(|| CoreError::validation("type must be reset or verify"))?;

    api.send_email(to, kind)?;
    tracing::info!("[account] {kind:?} email requested");
    Ok(())
}
