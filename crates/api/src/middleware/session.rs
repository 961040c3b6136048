//! Cookie-based session identity for the project wizard.
//!
//! The session id is a random UUID carried in the `smoothie_session` cookie.
//! It is issued when the wizard is entered; requests without a (well-formed)
//! cookie have no session and the wizard treats their state as absent.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderValue;

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "smoothie_session";

/// The wizard session of a request, if the client sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSession {
    pub id: Option<String>,
}

impl WizardSession {
    /// The existing id, or a freshly generated one. The flag is `true` when
    /// the id is new and a cookie must be set.
    pub fn id_or_new(&self) -> (String, bool) {
        match &self.id {
            Some(id) => (id.clone(), false),
            None => (uuid::Uuid::new_v4().to_string(), true),
        }
    }
}

impl FromRequestParts<AppState> for WizardSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| cookie_value(header, SESSION_COOKIE))
            .filter(|value| uuid::Uuid::parse_str(value).is_ok())
            .map(str::to_string);
        Ok(WizardSession { id })
    }
}

/// Find `name` in a `Cookie` header value.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// `Set-Cookie` value issuing the session id.
pub fn session_cookie(session_id: &str, max_age: Duration) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        max_age.as_secs()
    ))
    .ok()
}
