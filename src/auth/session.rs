//! Resolves a presented bearer token into an authorization decision and an
//! optional mandatory program scope.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::auth::{AuthMode, AuthState, X_AUTH_HEADER};

/// The per-request authorization decision.
///
/// Derived from the immutable credential table on every call and never stored
/// server-side. When `program` is set, every read and write in the request is
/// restricted to entries of that program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionScope {
    /// Whether the caller may proceed.
    pub authorized: bool,
    /// The single program the caller is restricted to, if any.
    pub program: Option<String>,
}

impl SessionScope {
    /// A scope that may see and write every program.
    pub fn unrestricted() -> Self {
        Self {
            authorized: true,
            program: None,
        }
    }

    /// A scope restricted to a single program.
    pub fn for_program(program: &str) -> Self {
        Self {
            authorized: true,
            program: Some(program.to_owned()),
        }
    }

    fn denied() -> Self {
        Self {
            authorized: false,
            program: None,
        }
    }
}

/// Decide whether `token` grants access under `mode`.
///
/// Pure over the immutable credential table: [AuthMode::Open] ignores the
/// token entirely, [AuthMode::SinglePin] grants unscoped access on a digest
/// match, and [AuthMode::MultiPin] grants access scoped to the matched
/// program. An absent or empty token in any non-open mode is denied.
pub fn authenticate(mode: &AuthMode, token: Option<&str>) -> SessionScope {
    let token = match token.filter(|token| !token.is_empty()) {
        Some(token) => token,
        None if matches!(mode, AuthMode::Open) => return SessionScope::unrestricted(),
        None => return SessionScope::denied(),
    };

    match mode {
        AuthMode::Open => SessionScope::unrestricted(),
        AuthMode::SinglePin { digest } if token == digest.as_str() => SessionScope::unrestricted(),
        AuthMode::MultiPin { programs } => match programs.get(token) {
            Some(program) => SessionScope::for_program(program),
            None => SessionScope::denied(),
        },
        _ => SessionScope::denied(),
    }
}

/// What `/api/session` reports about the server's credential mode and the
/// caller's resolved scope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Whether `/api/ledger/*` calls need an `X-Auth` token.
    pub auth_required: bool,
    /// The credential mode: "none", "single", or "multi".
    pub mode: &'static str,
    /// The program the presented token is bound to, if any.
    pub program_scope: Option<String>,
}

/// Handler that reports the credential mode and the caller's program scope.
///
/// The `X-Auth` header is optional here: without one (or with one that does
/// not resolve) the scope is simply reported as null.
pub async fn get_session(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let token = headers
        .get(X_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());
    let scope = authenticate(&state.auth_mode, token);

    Json(SessionResponse {
        auth_required: state.auth_mode.requires_auth(),
        mode: state.auth_mode.wire_name(),
        program_scope: scope.program,
    })
}
