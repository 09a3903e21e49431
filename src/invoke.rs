//! One-shot invocation: the literal serverless contract on stdin/stdout.
//!
//! Reads a single event document, runs the selected handler once, and
//! prints the reply document. Logs go to stderr so stdout stays parseable.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::event::{Event, Reply};
use crate::handlers::{HandlerError, Service};

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid event document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Decode an event document and run it through `service`.
///
/// # Errors
///
/// Returns an error if the document is not an event or the handler fails.
pub async fn invoke_document(service: Service, database_url: &str, raw: &str) -> Result<Reply, InvokeError> {
    let event: Event = serde_json::from_str(raw)?;
    Ok(service.invoke(database_url, &event).await?)
}

/// Read the event from stdin and write the reply to stdout.
///
/// # Errors
///
/// Returns an error if stdin/stdout fail or [`invoke_document`] fails.
pub async fn run(service: Service, database_url: &str) -> Result<(), InvokeError> {
    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;

    let reply = invoke_document(service, database_url, &raw).await?;
    tracing::info!(%service, status = reply.status_code, "invocation complete");

    let mut out = serde_json::to_vec(&reply)?;
    out.push(b'\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&out).await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "invoke_test.rs"]
mod tests;
