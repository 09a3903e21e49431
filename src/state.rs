//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! carries only the connection string: every invocation opens and closes its
//! own connection, so there is nothing else to share.

use std::sync::Arc;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub database_url: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(database_url: impl Into<Arc<str>>) -> Self {
        Self { database_url: database_url.into() }
    }
}
