//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP front end plays the invoking platform: every request to
//! `/{service}` is normalized into an [`Event`], handed to that service's
//! handler, and the [`Reply`] is written back verbatim. Handler failures
//! surface as a generic 500, the way a serverless platform would report an
//! uncaught exception.

use std::collections::HashMap;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use tower_http::trace::TraceLayer;

use crate::event::{Event, Reply, STATUS_NOT_FOUND};
use crate::handlers::Service;
use crate::state::AppState;

const STATUS_INTERNAL_ERROR: u16 = 500;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/{service}", any(dispatch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `ANY /{service}`: run one handler invocation.
async fn dispatch(
    State(state): State<AppState>,
    Path(name): Path<String>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let Ok(service) = name.parse::<Service>() else {
        return into_response(Reply::error(STATUS_NOT_FOUND, "Unknown service"));
    };

    let event = to_event(&method, params, body);
    match service.invoke(&state.database_url, &event).await {
        Ok(reply) => into_response(reply),
        Err(e) => {
            if e.is_unique_violation() {
                tracing::warn!(%service, error = %e, "unique constraint rejected request");
            } else {
                tracing::error!(%service, error = %e, "handler failed");
            }
            into_response(Reply::error(STATUS_INTERNAL_ERROR, "Internal server error"))
        }
    }
}

/// Normalize an HTTP request into the handler event shape. Empty bodies and
/// empty query strings are reported as absent.
pub(crate) fn to_event(method: &Method, params: HashMap<String, String>, body: String) -> Event {
    Event {
        http_method: method.as_str().to_owned(),
        body: (!body.is_empty()).then_some(body),
        query_string_parameters: (!params.is_empty()).then_some(params),
    }
}

/// Write a handler reply back as an HTTP response.
pub(crate) fn into_response(reply: Reply) -> Response {
    let Reply { status_code, headers, body } = reply;
    let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = (status, Body::from(body)).into_response();
    let response_headers = response.headers_mut();
    for (name, value) in &headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                response_headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping invalid reply header"),
        }
    }
    response
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
