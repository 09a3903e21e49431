//! Handler modules and the shared invocation lifecycle.
//!
//! ARCHITECTURE
//! ============
//! Each service (`auth`, `artworks`, `forum`, `interactions`) is a leaf
//! [`Handler`]: it decodes an [`Event`] into its own typed request, runs one
//! or two statements on the invocation's connection, and shapes a [`Reply`].
//! Handlers never call each other.
//!
//! LIFECYCLE
//! =========
//! [`invoke`] answers `OPTIONS` before touching the database. Otherwise it
//! opens exactly one connection, decodes, executes, and closes the connection
//! on every path. A bad request still opens and closes the connection; a
//! statement failure closes it and then propagates. Unwinding drops it.

pub mod artworks;
pub mod auth;
pub mod forum;
pub mod interactions;

use std::fmt;
use std::str::FromStr;

use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

use crate::db;
use crate::event::{Event, Method, Preflight, Reply};

// =============================================================================
// ERRORS
// =============================================================================

/// Failures that escape a handler. Everything else is a [`Reply`].
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("database connect failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("reply encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HandlerError {
    /// True when a statement hit a unique constraint not covered by `ON CONFLICT`.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

// =============================================================================
// HANDLER
// =============================================================================

/// One service's dispatch table.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    /// Typed request produced by [`Handler::decode`].
    type Request: Send;

    const NAME: &'static str;
    const PREFLIGHT: Preflight;

    /// Match method and action into a typed request, or produce the module's
    /// fallback reply for anything unmatched or malformed.
    ///
    /// # Errors
    ///
    /// Returns the reply to send back when the event does not map to an
    /// operation.
    fn decode(&self, event: &Event) -> Result<Self::Request, Reply>;

    /// Run the decoded request on the invocation's connection.
    async fn execute(&self, conn: &mut PgConnection, request: Self::Request) -> Result<Reply, HandlerError>;
}

/// Run one invocation of `handler` against a fresh connection.
///
/// # Errors
///
/// Returns an error if the connection cannot be opened or a statement fails.
pub async fn invoke<H: Handler>(handler: &H, database_url: &str, event: &Event) -> Result<Reply, HandlerError> {
    let method = event.method();
    if method == Method::Options {
        return Ok(Reply::preflight(&H::PREFLIGHT));
    }

    debug!(service = H::NAME, %method, "invocation started");
    let mut conn = db::connect(database_url)
        .await
        .map_err(HandlerError::Connect)?;

    let outcome = match handler.decode(event) {
        Ok(request) => handler.execute(&mut conn, request).await,
        Err(reply) => Ok(reply),
    };

    if let Err(e) = conn.close().await {
        warn!(service = H::NAME, error = %e, "connection close failed");
    }

    match &outcome {
        Ok(reply) => debug!(service = H::NAME, status = reply.status_code, "invocation finished"),
        Err(e) => warn!(service = H::NAME, error = %e, "invocation failed"),
    }
    outcome
}

// =============================================================================
// SERVICE REGISTRY
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("unknown service: {0}")]
pub struct UnknownService(pub String);

/// Addressable handler modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Artworks,
    Forum,
    Interactions,
}

impl Service {
    pub const ALL: [Service; 4] = [Self::Auth, Self::Artworks, Self::Forum, Self::Interactions];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => auth::AuthHandler::NAME,
            Self::Artworks => artworks::ArtworksHandler::NAME,
            Self::Forum => forum::ForumHandler::NAME,
            Self::Interactions => interactions::InteractionsHandler::NAME,
        }
    }

    /// Invoke this service's handler once.
    ///
    /// # Errors
    ///
    /// Propagates [`HandlerError`] from [`invoke`].
    pub async fn invoke(self, database_url: &str, event: &Event) -> Result<Reply, HandlerError> {
        match self {
            Self::Auth => invoke(&auth::AuthHandler, database_url, event).await,
            Self::Artworks => invoke(&artworks::ArtworksHandler, database_url, event).await,
            Self::Forum => invoke(&forum::ForumHandler, database_url, event).await,
            Self::Interactions => invoke(&interactions::InteractionsHandler, database_url, event).await,
        }
    }
}

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == raw)
            .ok_or_else(|| UnknownService(raw.to_owned()))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
