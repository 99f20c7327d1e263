//! The background pipeline run for each job.
//!
//! One invocation of [`run`] drives a job from manifest load to stored
//! document. Cancellation is cooperative: every registry mutation doubles as
//! a liveness check, and a missing record makes the task abandon at the next
//! boundary instead of racing the caller.

use crate::config::ProcessingConfig;
use crate::error::{Error, PageError, Result};
use crate::normalizer::NormalizedPage;
use crate::pause::PauseGate;
use crate::types::{Event, JobId, PageDescriptor, Status};
use crate::{document, fetcher, manifest, normalizer, resolver};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::FlipbookDownloader;

fn cancelled(id: JobId) -> Error {
    Error::NotFound(format!("Job {id} cancelled"))
}

/// Run the full pipeline for one job. Returns the number of pages in the
/// assembled document.
pub(crate) async fn run(
    downloader: &FlipbookDownloader,
    id: JobId,
    source_id: &str,
    gate: PauseGate,
) -> Result<usize> {
    let registry = &downloader.registry;

    if !registry.update_status(id, Status::Downloading) {
        return Err(cancelled(id));
    }
    downloader.emit_event(Event::StatusChanged {
        id,
        status: Status::Downloading,
    });

    let manifest =
        manifest::load(&downloader.client, &downloader.config.source, source_id).await?;
    let total_pages = manifest.pages.len() as u32;
    let title = crate::utils::sanitize_title(&manifest.title);
    if !registry.set_manifest(id, &manifest.title, total_pages) {
        return Err(cancelled(id));
    }
    tracing::info!(
        job_id = id.get(),
        total_pages,
        title = %title,
        "Manifest loaded"
    );
    downloader.emit_event(Event::ManifestLoaded {
        id,
        total_pages,
        title,
    });

    let mut recovered = download_pages(downloader, id, source_id, &manifest.pages, &gate).await;
    // Counter mutations fail only when the record was removed mid-flight
    if registry.snapshot(id).is_none() {
        return Err(cancelled(id));
    }
    if recovered.is_empty() {
        return Err(Error::NoPagesRecovered { id });
    }
    // Page futures complete in arbitrary order; restore manifest order
    recovered.sort_by_key(|(index, _)| *index);

    if !registry.update_status(id, Status::Compressing) {
        return Err(cancelled(id));
    }
    downloader.emit_event(Event::StatusChanged {
        id,
        status: Status::Compressing,
    });
    let normalized = normalize_pages(recovered, downloader.config.processing.clone()).await?;

    if !registry.update_status(id, Status::CreatingDocument) {
        return Err(cancelled(id));
    }
    downloader.emit_event(Event::StatusChanged {
        id,
        status: Status::CreatingDocument,
    });
    let pages = normalized.len();
    let bytes = tokio::task::spawn_blocking(move || document::assemble(&normalized))
        .await
        .map_err(|e| Error::Other(format!("Assembly task panicked: {e}")))??;

    if !registry.store_result(id, bytes) {
        return Err(cancelled(id));
    }
    downloader.emit_event(Event::StatusChanged {
        id,
        status: Status::Done,
    });
    Ok(pages)
}

/// Fetch all pages concurrently, bounded by the configured pool size.
///
/// Unresolvable or failing pages are counted as skipped; everything else
/// lands in the returned vector as `(index, jpeg_or_source_bytes)` pairs in
/// completion order.
async fn download_pages(
    downloader: &FlipbookDownloader,
    id: JobId,
    source_id: &str,
    pages: &[PageDescriptor],
    gate: &PauseGate,
) -> Vec<(u32, Vec<u8>)> {
    let semaphore = Arc::new(Semaphore::new(downloader.config.source.max_concurrent_pages));
    let base_url = downloader.config.source.base_url.as_str();

    let tasks = pages.iter().map(|page| {
        let semaphore = semaphore.clone();
        let gate = gate.clone();
        async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return None;
            };
            download_one(downloader, id, source_id, base_url, page, &gate).await
        }
    });

    let mut recovered: Vec<(u32, Vec<u8>)> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .flatten()
        .collect();
    recovered.shrink_to_fit();
    recovered
}

async fn download_one(
    downloader: &FlipbookDownloader,
    id: JobId,
    source_id: &str,
    base_url: &str,
    page: &PageDescriptor,
    gate: &PauseGate,
) -> Option<(u32, Vec<u8>)> {
    let registry = &downloader.registry;

    match retrieve(downloader, source_id, base_url, page, gate).await {
        Ok(bytes) => {
            if !registry.increment_completed(id) {
                return None;
            }
            if let Some(view) = registry.snapshot(id) {
                downloader.emit_event(Event::PageCompleted {
                    id,
                    completed_pages: view.completed_pages,
                    total_pages: view.total_pages,
                });
            }
            Some((page.index, bytes))
        }
        Err(e) => {
            tracing::warn!(
                job_id = id.get(),
                page_index = page.index,
                error = %e,
                "Page dropped"
            );
            if registry.increment_skipped(id) {
                downloader.emit_event(Event::PageSkipped {
                    id,
                    index: page.index,
                });
            }
            None
        }
    }
}

/// Resolve and stream one page's bytes. Failures are page-local.
async fn retrieve(
    downloader: &FlipbookDownloader,
    source_id: &str,
    base_url: &str,
    page: &PageDescriptor,
    gate: &PauseGate,
) -> std::result::Result<Vec<u8>, PageError> {
    let url = resolver::resolve(&downloader.client, base_url, source_id, page)
        .await
        .ok_or(PageError::Unresolved { index: page.index })?;
    fetcher::fetch_page(&downloader.client, &url, gate, page.index).await
}

/// Re-encode the recovered pages on the blocking pool.
///
/// A page that downloaded but fails to decode is a job-fatal error rather
/// than a skip: by this point the page count is already published and a
/// silently missing page would corrupt the document order.
async fn normalize_pages(
    recovered: Vec<(u32, Vec<u8>)>,
    config: ProcessingConfig,
) -> Result<Vec<NormalizedPage>> {
    tokio::task::spawn_blocking(move || {
        recovered
            .into_iter()
            .map(|(index, raw)| normalizer::normalize(&raw, index, &config))
            .collect::<std::result::Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| Error::Other(format!("Normalization task panicked: {e}")))?
    .map_err(Error::from)
}
