//! Output document assembly
//!
//! Concatenates the ordered, normalized page images into one PDF. Each JPEG is
//! embedded unrecompressed as a DCTDecode image XObject on its own page whose
//! MediaBox matches the image's pixel dimensions, so the document adds only
//! structural overhead on top of the JPEG bytes.

use crate::error::AssemblyError;
use crate::normalizer::NormalizedPage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// File extension of the assembled document
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// MIME type of the assembled document
pub const DOCUMENT_MIME: &str = "application/pdf";

/// Assemble the ordered page images into a single PDF.
///
/// The caller is responsible for ordering; pages are emitted positionally.
/// An empty slice is rejected (the orchestrator treats zero recovered pages as
/// a job failure before ever reaching assembly).
pub fn assemble(pages: &[NormalizedPage]) -> Result<Vec<u8>, AssemblyError> {
    if pages.is_empty() {
        return Err(AssemblyError::EmptyDocument);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => page.width as i64,
                "Height" => page.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            page.bytes.clone(),
        ));

        // Scale the unit image square up to the full page
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (page.width as i64).into(),
                        0.into(),
                        0.into(),
                        (page.height as i64).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|e| AssemblyError::Pdf {
            reason: e.to_string(),
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (page.width as i64).into(),
                (page.height as i64).into(),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(image_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| AssemblyError::Pdf {
        reason: e.to_string(),
    })?;

    tracing::debug!(pages = pages.len(), bytes = out.len(), "Assembled document");
    Ok(out)
}
