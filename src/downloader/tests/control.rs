//! Control surface tests (pause/resume/result/events).

use super::*;
use crate::error::Error;
use crate::types::JobId;
use wiremock::MockServer;

#[tokio::test]
async fn pause_of_unknown_job_is_not_found() {
    let server = MockServer::start().await;
    let downloader = mock_downloader(&server);

    assert!(matches!(
        downloader.set_paused(JobId::new(42), true).unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn result_of_unknown_job_is_not_found() {
    let server = MockServer::start().await;
    let downloader = mock_downloader(&server);

    assert!(matches!(
        downloader.fetch_result(JobId::new(42)).unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn start_emits_job_queued() {
    let server = MockServer::start().await;
    mount_manifest(&server, "abc", &manifest_body("T", &[])).await;

    let downloader = mock_downloader(&server);
    let mut events = downloader.subscribe();
    let id = downloader.start("abc").unwrap();

    let event = events.recv().await.unwrap();
    match event {
        Event::JobQueued { id: eid, source_id } => {
            assert_eq!(eid, id);
            assert_eq!(source_id, "abc");
        }
        other => panic!("expected JobQueued, got {other:?}"),
    }
}

#[tokio::test]
async fn pause_and_resume_emit_events() {
    let server = MockServer::start().await;
    mount_manifest(&server, "abc", &manifest_body("T", &[])).await;

    let downloader = mock_downloader(&server);
    let id = downloader.start("abc").unwrap();
    let mut events = downloader.subscribe();

    let view = downloader.set_paused(id, true).unwrap();
    assert!(view.paused);
    let view = downloader.set_paused(id, false).unwrap();
    assert!(!view.paused);

    let mut saw_paused = false;
    let mut saw_resumed = false;
    while let Ok(event) = events.try_recv() {
        match event {
            Event::JobPaused { id: eid } if eid == id => saw_paused = true,
            Event::JobResumed { id: eid } if eid == id => saw_resumed = true,
            _ => {}
        }
    }
    assert!(saw_paused);
    assert!(saw_resumed);
}

#[tokio::test]
async fn all_jobs_lists_every_started_job() {
    let server = MockServer::start().await;
    mount_manifest(&server, "aaa", &manifest_body("A", &[])).await;
    mount_manifest(&server, "bbb", &manifest_body("B", &[])).await;

    let downloader = mock_downloader(&server);
    let a = downloader.start("aaa").unwrap();
    let b = downloader.start("bbb").unwrap();

    let views = downloader.all_jobs();
    assert_eq!(views.len(), 2);
    let ids: Vec<JobId> = views.iter().map(|v| v.id).collect();
    assert!(ids.contains(&a));
    assert!(ids.contains(&b));
}
