use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};

use crate::domain::entities::LoginRequest;
use crate::interface_adapters::cookies::{clear_session_cookies, session_cookies};
use crate::interface_adapters::protocol::LoginReply;
use crate::interface_adapters::state::AppState;
use crate::use_cases::session::LoginUseCase;

// Exchange credentials for the backend token and persist it in the
// session cookies. Failures keep the uniform `{success, message}`
// envelope so the login form can display them directly.
#[tracing::instrument(name = "login", skip_all, fields(email = %payload.email))]
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let use_case = LoginUseCase {
        auth: state.auth.as_ref(),
    };

    match use_case.execute(payload).await {
        Ok(grant) => {
            tracing::info!("session established.");
            let [token, role, email] = session_cookies(&grant);
            (
                AppendHeaders([
                    (header::SET_COOKIE, token),
                    (header::SET_COOKIE, role),
                    (header::SET_COOKIE, email),
                ]),
                Json(LoginReply {
                    success: true,
                    message: "Login successful".to_string(),
                    role: Some(grant.role),
                }),
            )
                .into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "login rejected.");
            Json(LoginReply {
                success: false,
                message: err.to_string(),
                role: None,
            })
            .into_response()
        }
    }
}

// Drop the session cookies and send the browser back to the login
// page. The backend has no revocation endpoint, so the cookies are the
// whole session.
#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout() -> impl IntoResponse {
    let [token, role, email] = clear_session_cookies();
    (
        AppendHeaders([
            (header::SET_COOKIE, token),
            (header::SET_COOKIE, role),
            (header::SET_COOKIE, email),
        ]),
        Redirect::to("/login"),
    )
}
