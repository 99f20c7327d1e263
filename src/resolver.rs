//! Candidate URL construction and existence probing
//!
//! The remote host has shipped several directory layouts over time, so a
//! page's image may live at any of a small set of URLs derived from its name
//! token and index. Candidates are probed with HEAD requests strictly in
//! order; the order encodes a priority among the known layout conventions.

use crate::types::PageDescriptor;

/// Build the ordered candidate URLs for one page.
///
/// The third convention (name token with its first byte dropped, appended
/// directly to the book root) is only emitted when the token is long enough
/// and the cut lands on a character boundary.
pub fn candidate_urls(base_url: &str, source_id: &str, page: &PageDescriptor) -> Vec<String> {
    let mut candidates = vec![
        format!("{base_url}/{source_id}/files/large/{}", page.name),
        format!("{base_url}/{source_id}/files/page/{}.jpg", page.index + 1),
    ];

    if let Some(rest) = page.name.get(1..)
        && !rest.is_empty()
    {
        candidates.push(format!("{base_url}/{source_id}{rest}"));
    }

    candidates
}

/// Probe the candidates for one page and return the first URL that exists.
///
/// A transport error on one candidate is not fatal; it counts as "not found"
/// for that candidate and the next is tried. Returns `None` when every
/// candidate misses — the caller drops the page rather than failing the job.
pub async fn resolve(
    client: &reqwest::Client,
    base_url: &str,
    source_id: &str,
    page: &PageDescriptor,
) -> Option<String> {
    for url in candidate_urls(base_url, source_id, page) {
        match client.head(&url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(page = page.index, url = %url, "Resolved page URL");
                return Some(url);
            }
            Ok(response) => {
                tracing::trace!(
                    page = page.index,
                    url = %url,
                    status = response.status().as_u16(),
                    "Candidate miss"
                );
            }
            Err(e) => {
                tracing::trace!(page = page.index, url = %url, error = %e, "Candidate probe failed");
            }
        }
    }

    tracing::warn!(
        page = page.index,
        source_id,
        "No candidate URL resolved; page will be dropped"
    );
    None
}
