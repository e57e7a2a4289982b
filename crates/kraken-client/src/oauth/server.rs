//! Local callback server routes.
//!
//! `/auth` redirects the browser to the provider's authorize endpoint;
//! `/token` receives the code and completes the exchange.

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::CoordinatorInner;
use crate::KrakenError;

const SERVER_BANNER: &str = ":: TwitchApi Client Oauth Server ::";

pub(super) fn router(inner: Arc<CoordinatorInner>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/auth", get(handle_auth))
        .route("/token", get(handle_token))
        .layer(axum::middleware::from_fn(powered_by))
        .with_state(inner)
}

async fn powered_by(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    res.headers_mut().insert(
        "X-Powered-By",
        HeaderValue::from_static("TwitchApi Client Oauth Server"),
    );
    res
}

async fn root() -> &'static str {
    SERVER_BANNER
}

async fn healthz() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct AuthQuery {
    scope: Option<String>,
}

/// GET /auth — redirect the user to the provider's authorize page.
async fn handle_auth(
    State(inner): State<Arc<CoordinatorInner>>,
    Query(q): Query<AuthQuery>,
) -> Response {
    tracing::debug!("handling auth request");

    match inner.authorize_redirect(q.scope.as_deref()) {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    code: Option<String>,
    state: Option<String>,
}

/// GET /token — validate the CSRF state and exchange the code.
///
/// The token payload is embedded in the response body so the automation
/// driver (or a human) can read it out of the page.
async fn handle_token(
    State(inner): State<Arc<CoordinatorInner>>,
    Query(q): Query<TokenQuery>,
) -> Response {
    tracing::debug!("handling token request");

    let code = q.code.filter(|c| !c.is_empty());
    let state = q.state.filter(|s| !s.is_empty());

    let (code, state) = match (code, state) {
        (Some(code), Some(state)) if inner.take_state_if(&state) => (code, state),
        _ => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                KrakenError::StateMismatch.to_string(),
            )
                .into_response();
        }
    };

    match inner.exchange_code(&code, &state).await {
        Ok(credentials) => {
            let payload = serde_json::to_string(&credentials).unwrap_or_default();
            inner.store_credentials(credentials);
            tracing::debug!("token exchange complete");
            Html(format!("<twitch-data>{payload}</twitch-data>")).into_response()
        }
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}
