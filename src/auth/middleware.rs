//! Authentication middleware that validates the `X-Auth` bearer token and
//! threads the resolved scope into request handlers.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::{AuthMode, authenticate},
};

/// The header protected calls present their bearer token in.
pub const X_AUTH_HEADER: &str = "x-auth";

/// The state needed for the auth middleware and the session endpoints.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The immutable credential table built at startup.
    pub auth_mode: Arc<AuthMode>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            auth_mode: state.auth_mode.clone(),
        }
    }
}

/// Middleware function that checks the `X-Auth` header against the credential
/// table. Authorized requests run normally with the resolved [SessionScope]
/// inserted as a request extension; everything else answers 401.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(scope): Extension<SessionScope>` to receive the scope.
///
/// [SessionScope]: crate::auth::SessionScope
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(X_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    let scope = authenticate(&state.auth_mode, token);
    if !scope.authorized {
        return Error::AuthRequired.into_response();
    }

    request.extensions_mut().insert(scope);
    next.run(request).await
}

#[cfg(test)]
mod auth_guard_tests {
    use std::sync::Arc;

    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;

    use crate::auth::{AuthMode, AuthState, SessionScope, X_AUTH_HEADER, auth_guard, pin_digest};

    async fn scope_echo(Extension(scope): Extension<SessionScope>) -> String {
        scope.program.unwrap_or_else(|| "(unscoped)".to_owned())
    }

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    fn get_test_server(auth_mode: AuthMode) -> TestServer {
        let state = AuthState {
            auth_mode: Arc::new(auth_mode),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(scope_echo))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn open_mode_passes_requests_through_without_a_token() {
        let server = get_test_server(AuthMode::Open);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_ok();
        response.assert_text("(unscoped)");
    }

    #[tokio::test]
    async fn missing_token_answers_unauthorized() {
        let server = get_test_server(AuthMode::SinglePin {
            digest: pin_digest("hunter2"),
        });

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_unauthorized();
        response.assert_text_contains("auth required");
    }

    #[tokio::test]
    async fn invalid_token_answers_unauthorized() {
        let server = get_test_server(AuthMode::SinglePin {
            digest: pin_digest("hunter2"),
        });

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_header(X_AUTH_HEADER, "FOOBAR")
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn multi_pin_token_threads_its_program_scope_into_the_handler() {
        let mut programs = std::collections::HashMap::new();
        programs.insert(pin_digest("1111"), "Alpha".to_owned());
        let server = get_test_server(AuthMode::MultiPin { programs });

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_header(X_AUTH_HEADER, pin_digest("1111"))
            .await;

        response.assert_status_ok();
        response.assert_text("Alpha");
    }
}
