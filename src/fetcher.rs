//! Single-page body streaming with pause support
//!
//! A fetcher streams one page's bytes into memory chunk by chunk, awaiting the
//! job's pause gate before every chunk read. Failures are page-local: the
//! caller absorbs them by dropping the page, never by failing the job.

use crate::error::PageError;
use crate::pause::PauseGate;
use futures::StreamExt;

/// Stream the full response body for a resolved page URL into memory.
///
/// The pause gate is consulted before each chunk read, so pausing a job takes
/// effect mid-download within one chunk's latency. The returned bytes are
/// private to the caller; this function performs no shared-state mutation.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    gate: &PauseGate,
    index: u32,
) -> Result<Vec<u8>, PageError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PageError::Transport {
            index,
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageError::Status {
            index,
            status: status.as_u16(),
        });
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    loop {
        gate.opened().await;
        match stream.next().await {
            Some(Ok(chunk)) => body.extend_from_slice(&chunk),
            Some(Err(e)) => {
                return Err(PageError::Transport {
                    index,
                    reason: e.to_string(),
                });
            }
            None => break,
        }
    }

    tracing::trace!(page = index, bytes = body.len(), "Page downloaded");
    Ok(body)
}
