//! Defines the endpoint that exchanges a raw PIN for a bearer token.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{AuthMode, AuthState, pin_digest},
};

/// The login request body.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The raw PIN as typed by the user.
    #[serde(default)]
    pub pin: String,
}

/// The successful login response.
///
/// `token` is the PIN's digest; clients present it back verbatim in the
/// `X-Auth` header on every subsequent call. The server keeps no session
/// table, so there is nothing to invalidate on "log out" — clients simply
/// drop the token.
#[derive(Debug, Serialize)]
pub struct LogInResponse {
    /// Always `true`.
    pub ok: bool,
    /// The bearer token to present in `X-Auth`, or null in open mode.
    pub token: Option<String>,
    /// The program the credential is bound to, or null if unscoped.
    pub program: Option<String>,
    /// The credential mode: "none", "single", or "multi".
    pub mode: &'static str,
}

/// Handler for login requests via the POST method.
///
/// Hashes the submitted PIN and looks the digest up in the credential table.
///
/// # Errors
///
/// Answers 403 [Error::InvalidPin] when the PIN does not match any configured
/// credential. In open mode every login succeeds with a null token.
pub async fn post_log_in(
    State(state): State<AuthState>,
    Json(data): Json<LogInData>,
) -> Response {
    let mode = state.auth_mode.wire_name();

    match state.auth_mode.as_ref() {
        AuthMode::Open => Json(LogInResponse {
            ok: true,
            token: None,
            program: None,
            mode,
        })
        .into_response(),
        AuthMode::SinglePin { digest } => {
            if pin_digest(data.pin.trim()) != *digest {
                return Error::InvalidPin.into_response();
            }

            Json(LogInResponse {
                ok: true,
                token: Some(digest.clone()),
                program: None,
                mode,
            })
            .into_response()
        }
        AuthMode::MultiPin { programs } => {
            let digest = pin_digest(data.pin.trim());

            match programs.get(&digest) {
                Some(program) => Json(LogInResponse {
                    ok: true,
                    token: Some(digest),
                    program: Some(program.clone()),
                    mode,
                })
                .into_response(),
                None => Error::InvalidPin.into_response(),
            }
        }
    }
}
