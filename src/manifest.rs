//! Manifest loading and parsing
//!
//! The remote host publishes one manifest resource per book at
//! `{base}/{source_id}/javascript/config.js`. The body is not strict JSON: it
//! is a script-variable assignment (`var htmlConfig = {...};`) wrapping a JSON
//! object. The loader strips the wrapper, parses the JSON tail, and produces
//! page descriptors in manifest order with positional indexes.

use crate::config::SourceConfig;
use crate::error::ManifestError;
use crate::types::PageDescriptor;
use serde::Deserialize;

/// Parsed book manifest: the blueprint for all downstream work
#[derive(Clone, Debug)]
pub struct Manifest {
    /// Raw (unsanitized) book title; may be empty
    pub title: String,
    /// Page descriptors in manifest order, indexes assigned positionally
    pub pages: Vec<PageDescriptor>,
}

#[derive(Deserialize)]
struct RawManifest {
    fliphtml5_pages: Vec<RawPage>,
    #[serde(default)]
    meta: RawMeta,
}

#[derive(Deserialize)]
struct RawPage {
    /// Name tokens; the first entry is the one used for URL construction
    #[serde(default)]
    n: Vec<String>,
}

#[derive(Deserialize, Default)]
struct RawMeta {
    #[serde(default)]
    title: String,
}

/// Fetch and parse the manifest for one book.
///
/// Transport failures map to [`ManifestError::Fetch`], non-success responses
/// to [`ManifestError::Status`], and payload problems to
/// [`ManifestError::Format`]. All three are job-fatal for the caller.
pub async fn load(
    client: &reqwest::Client,
    source: &SourceConfig,
    source_id: &str,
) -> Result<Manifest, ManifestError> {
    let url = format!("{}/{}/javascript/config.js", source.base_url, source_id);

    tracing::debug!(source_id, url = %url, "Fetching manifest");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ManifestError::Fetch {
            source_id: source_id.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ManifestError::Status {
            source_id: source_id.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| ManifestError::Fetch {
        source_id: source_id.to_string(),
        reason: e.to_string(),
    })?;

    parse(source_id, &body)
}

/// Parse a script-wrapped manifest body.
///
/// The body must contain an `= ` assignment delimiter; everything after it is
/// the JSON value, with an optional trailing semicolon.
pub fn parse(source_id: &str, body: &str) -> Result<Manifest, ManifestError> {
    let (_, tail) = body
        .split_once("= ")
        .ok_or_else(|| ManifestError::Format {
            source_id: source_id.to_string(),
            reason: "missing '= ' assignment delimiter".to_string(),
        })?;

    let json = tail.trim_end();
    let json = json.strip_suffix(';').unwrap_or(json);

    let raw: RawManifest =
        serde_json::from_str(json).map_err(|e| ManifestError::Format {
            source_id: source_id.to_string(),
            reason: format!("invalid JSON payload: {e}"),
        })?;

    // Index assignment is positional: first entry = index 0, regardless of any
    // ordering fields inside the payload.
    let pages = raw
        .fliphtml5_pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let name = page
                .n
                .into_iter()
                .next()
                .ok_or_else(|| ManifestError::Format {
                    source_id: source_id.to_string(),
                    reason: format!("page {i} has no name token"),
                })?;
            Ok(PageDescriptor {
                index: i as u32,
                name,
            })
        })
        .collect::<Result<Vec<_>, ManifestError>>()?;

    tracing::debug!(
        source_id,
        pages = pages.len(),
        title = %raw.meta.title,
        "Parsed manifest"
    );

    Ok(Manifest {
        title: raw.meta.title,
        pages,
    })
}
