use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};

use crate::domain::entities::{Bearer, Role};
use crate::interface_adapters::protocol::ErrorBody;
use crate::use_cases::session::{Session, SessionGrant};

// Cookie names shared with the browser UI. The token cookie is the
// credential and stays HttpOnly; role and email are display hints the
// client script may read.
pub const AUTH_COOKIE: &str = "auth_token";
pub const ROLE_COOKIE: &str = "user_role";
pub const EMAIL_COOKIE: &str = "user_email";

fn cookie(name: &str, value: &str, max_age: u64, http_only: bool) -> String {
    let mut out = format!("{name}={value}; Max-Age={max_age}; Path=/; SameSite=Strict");
    if http_only {
        out.push_str("; HttpOnly");
    }
    out
}

// The three Set-Cookie values persisted at login.
pub fn session_cookies(grant: &SessionGrant) -> [String; 3] {
    [
        cookie(AUTH_COOKIE, &grant.token, grant.max_age_seconds, true),
        cookie(ROLE_COOKIE, grant.role.as_str(), grant.max_age_seconds, false),
        cookie(EMAIL_COOKIE, &grant.email, grant.max_age_seconds, false),
    ]
}

// Expire all session cookies together on logout.
pub fn clear_session_cookies() -> [String; 3] {
    [
        cookie(AUTH_COOKIE, "", 0, true),
        cookie(ROLE_COOKIE, "", 0, false),
        cookie(EMAIL_COOKIE, "", 0, false),
    ]
}

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

// Rebuild the request identity from the session cookies. Absence of the
// token cookie is the only rejection; a missing or garbled role cookie
// just yields a session that fails the role guards.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorBody>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, AUTH_COOKIE).ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                message: "Authentication required".to_string(),
            }),
        ))?;

        let role = read_cookie(&parts.headers, ROLE_COOKIE)
            .and_then(|value| Role::parse(&value));
        let email = read_cookie(&parts.headers, EMAIL_COOKIE);

        Ok(Session {
            bearer: Bearer(token),
            role,
            email,
        })
    }
}
