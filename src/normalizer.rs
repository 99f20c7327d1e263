//! Page image normalization
//!
//! Every downloaded page is downsampled and recompressed into a uniform
//! low-weight representation before assembly: decode, scale both dimensions by
//! a fixed factor with Lanczos3 resampling, convert to RGB, re-encode as JPEG
//! at a fixed quality. Deterministic for a given input under a fixed config.

use crate::config::ProcessingConfig;
use crate::error::AssemblyError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

/// One normalized page, ready for document assembly
#[derive(Clone, Debug)]
pub struct NormalizedPage {
    /// Zero-based page index (document order)
    pub index: u32,
    /// JPEG-encoded page bytes
    pub bytes: Vec<u8>,
    /// Pixel width after scaling
    pub width: u32,
    /// Pixel height after scaling
    pub height: u32,
}

/// Normalize one page's raw bytes.
///
/// Fails with [`AssemblyError::ImageDecode`] when the input is not a decodable
/// image; that failure is job-fatal for the caller (a corrupt page aborts the
/// job rather than silently thinning the document).
pub fn normalize(
    raw: &[u8],
    index: u32,
    config: &ProcessingConfig,
) -> Result<NormalizedPage, AssemblyError> {
    let decoded = image::load_from_memory(raw).map_err(|e| AssemblyError::ImageDecode {
        index,
        reason: e.to_string(),
    })?;

    let width = ((decoded.width() as f32 * config.scale_factor) as u32).max(1);
    let height = ((decoded.height() as f32 * config.scale_factor) as u32).max(1);

    let resized = decoded.resize_exact(width, height, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, config.jpeg_quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| AssemblyError::Encode {
            index,
            reason: e.to_string(),
        })?;

    tracing::trace!(
        page = index,
        in_bytes = raw.len(),
        out_bytes = bytes.len(),
        width,
        height,
        "Normalized page"
    );

    Ok(NormalizedPage {
        index,
        bytes,
        width,
        height,
    })
}
