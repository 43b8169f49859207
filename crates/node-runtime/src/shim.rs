//! # JSON-Lines Host Shim
//!
//! One `InvocationRequest` per input line, one `InvocationResponse` per
//! output line, in input order. Blank lines are skipped. A line that does
//! not parse still gets a failure response (nil `tx_id`) so the client
//! never waits on a missing reply.

use crate::container::NodeDispatcher;
use anyhow::{Context, Result};
use shared_types::{ErrorKind, InvocationRequest, InvocationResponse};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Totals for one serving session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeSummary {
    /// Requests dispatched.
    pub requests: u64,
    /// Dispatched requests that failed.
    pub failures: u64,
    /// Lines that were not valid requests.
    pub malformed: u64,
}

/// Why serving stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Input closed.
    EndOfInput,
    /// Shutdown future resolved.
    Shutdown,
}

/// Serve requests from `reader` until EOF or until `shutdown` resolves.
pub async fn serve<R, W, F>(
    dispatcher: &NodeDispatcher,
    reader: R,
    mut writer: W,
    shutdown: F,
) -> Result<(ServeSummary, StopReason)>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = reader.lines();
    let mut summary = ServeSummary::default();
    tokio::pin!(shutdown);

    let reason = loop {
        let line = tokio::select! {
            _ = &mut shutdown => break StopReason::Shutdown,
            line = lines.next_line() => line.context("Failed to read request line")?,
        };
        let Some(line) = line else {
            break StopReason::EndOfInput;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<InvocationRequest>(&line) {
            Ok(request) => {
                debug!(tx_id = %request.tx_id, function = %request.function, "Request received");
                summary.requests += 1;
                let response = dispatcher.handle(&request);
                if !response.ok {
                    summary.failures += 1;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "Malformed request line");
                summary.malformed += 1;
                InvocationResponse::failure(
                    Default::default(),
                    ErrorKind::InvalidArguments,
                    format!("malformed request: {}", e),
                )
            }
        };

        let mut encoded =
            serde_json::to_string(&response).context("Failed to encode response")?;
        encoded.push('\n');
        writer
            .write_all(encoded.as_bytes())
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
    };

    info!(
        requests = summary.requests,
        failures = summary.failures,
        malformed = summary.malformed,
        reason = ?reason,
        "Stopped serving"
    );
    Ok((summary, reason))
}
