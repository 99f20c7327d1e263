//! Integration-style tests for the downloader, driven through a mock remote
//! host so the full manifest/probe/fetch pipeline is exercised.

mod control;

use crate::config::Config;
use crate::downloader::FlipbookDownloader;
use crate::types::{Event, JobId};
use image::{Rgb, RgbImage};
use std::io::Cursor;
use std::time::Duration;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a downloader pointed at the given mock server.
pub(crate) fn mock_downloader(server: &MockServer) -> FlipbookDownloader {
    let mut config = Config::default();
    config.source.base_url = server.uri();
    config.source.request_timeout_secs = 5;
    FlipbookDownloader::new(config).unwrap()
}

/// Script-wrapped manifest body for a source with the given page names.
pub(crate) fn manifest_body(title: &str, names: &[&str]) -> String {
    let pages: Vec<serde_json::Value> = names
        .iter()
        .map(|n| serde_json::json!({ "n": [n] }))
        .collect();
    let config = serde_json::json!({
        "fliphtml5_pages": pages,
        "meta": { "title": title },
    });
    format!("var htmlConfig = {config};")
}

/// Mount the manifest endpoint for a source.
pub(crate) async fn mount_manifest(server: &MockServer, source_id: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{source_id}/javascript/config.js")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// A small valid image to serve as page content.
pub(crate) fn page_image_bytes() -> Vec<u8> {
    colored_page_bytes([120, 40, 200])
}

/// A small solid-color page image.
pub(crate) fn colored_page_bytes(color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb(color));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Mount HEAD and GET for a page under the first candidate URL.
pub(crate) async fn mount_page(server: &MockServer, source_id: &str, name: &str) {
    let page_path = format!("/{source_id}/files/large/{name}");
    Mock::given(method("HEAD"))
        .and(path(page_path.clone()))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(page_image_bytes()))
        .mount(server)
        .await;
}

/// Mount HEAD and GET for a page serving a solid color, with the body held
/// back by the given delay.
pub(crate) async fn mount_colored_page(
    server: &MockServer,
    source_id: &str,
    name: &str,
    color: [u8; 3],
    delay: Duration,
) {
    let page_path = format!("/{source_id}/files/large/{name}");
    Mock::given(method("HEAD"))
        .and(path(page_path.clone()))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(colored_page_bytes(color))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Decode each embedded page image from a finished document and return its
/// centre pixel, in document page order.
pub(crate) fn pdf_page_colors(bytes: &[u8]) -> Vec<[u8; 3]> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let image_id = doc
                .get_object(page_id)
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"Resources")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"XObject")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"Im0")
                .unwrap()
                .as_reference()
                .unwrap();
            let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();
            let img = image::load_from_memory(&stream.content).unwrap().to_rgb8();
            img.get_pixel(img.width() / 2, img.height() / 2).0
        })
        .collect()
}

/// Index of the strongest channel. Solid-color pages keep their dominant
/// channel through the lossy re-encode.
pub(crate) fn dominant_channel(rgb: [u8; 3]) -> usize {
    (0..3).max_by_key(|&i| rgb[i]).unwrap()
}

/// Collect every event up to and including the job's terminal event.
pub(crate) async fn events_until_terminal(
    rx: &mut broadcast::Receiver<Event>,
    id: JobId,
) -> Vec<Event> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("timed out waiting for terminal event")
            .expect("event channel closed");
        let terminal = matches!(
            &event,
            Event::JobComplete { id: eid, .. } | Event::JobFailed { id: eid, .. } if *eid == id
        );
        seen.push(event);
        if terminal {
            return seen;
        }
    }
}

/// Receive events until the job reaches a terminal event or the timeout hits.
pub(crate) async fn wait_for_terminal(
    rx: &mut broadcast::Receiver<Event>,
    id: JobId,
) -> Event {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("timed out waiting for terminal event")
            .expect("event channel closed");
        match &event {
            Event::JobComplete { id: eid, .. } | Event::JobFailed { id: eid, .. }
                if *eid == id =>
            {
                return event;
            }
            _ => {}
        }
    }
}
