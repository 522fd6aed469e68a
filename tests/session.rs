use futures::future::BoxFuture;
use futures::FutureExt;
use gallery_engine::navigation::{FixedClock, IgnoredIntent, NavigationState};
use gallery_engine::net::{AssetFetcher, FetchError, Response};
use gallery_engine::render::backends::null::NullBackend;
use gallery_engine::render::{share_backend, AssetStatus};
use gallery_engine::session::{GalleryEvent, GalleryHandle, GalleryMode, GallerySession, GalleryView};
use gallery_engine::{Exhibit, ExhibitId, Exhibits, GalleryConfig, GalleryError, Intent};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use url::Url;

const SETTLE: Duration = Duration::from_millis(1000);

/// Serves assets from memory, keyed by URL path.
#[derive(Default)]
struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, url: Url) -> BoxFuture<'static, Result<Response, FetchError>> {
        let found = self.assets.get(url.path()).cloned();
        async move {
            match found {
                Some(body) => Ok(Response::ok(url, body)),
                None => Err(FetchError::NotFound(url)),
            }
        }
        .boxed()
    }
}

fn png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn exhibits(n: u64) -> Exhibits {
    Exhibits::new(
        (1..=n)
            .map(|i| Exhibit::new(i, format!("Work {i}")).with_category(format!("Medium {i}")))
            .collect(),
    )
    .unwrap()
}

fn start_with(
    exhibits: Exhibits,
    fetcher: MemoryFetcher,
) -> (GalleryHandle, broadcast::Receiver<GalleryEvent>, JoinHandle<()>) {
    let config = GalleryConfig::builder()
        .settle_interval(SETTLE)
        .fallback_size(64)
        .event_capacity(512)
        .build()
        .unwrap();

    let session = GallerySession::new(config, exhibits, Arc::new(fetcher), share_backend(NullBackend::new()))
        .with_clock(FixedClock("12:34:56".into()));
    let events = session.subscribe();
    let (handle, join) = session.start();
    (handle, events, join)
}

fn start(n: u64) -> (GalleryHandle, broadcast::Receiver<GalleryEvent>, JoinHandle<()>) {
    start_with(exhibits(n), MemoryFetcher::default())
}

/// Everything broadcast so far. Call after a `view()` round trip so the session has caught up.
fn drain(events: &mut broadcast::Receiver<GalleryEvent>) -> Vec<GalleryEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = events.try_recv() {
        out.push(ev);
    }
    out
}

fn exhausted_count(events: &[GalleryEvent]) -> usize {
    events.iter().filter(|e| matches!(e, GalleryEvent::SequenceExhausted)).count()
}

async fn settle() {
    tokio::time::sleep(SETTLE + Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn walks_to_the_portal_and_exhausts_once() {
    let (gallery, mut events, _join) = start(3);

    for _ in 0..3 {
        gallery.advance().await.unwrap();
        gallery.advance().await.unwrap();
        assert_eq!(gallery.view().await.unwrap().mode, GalleryMode::Transitioning);
        settle().await;
    }

    let view = gallery.view().await.unwrap();
    assert_eq!(view.state, NavigationState::AtPortal);
    assert_eq!(view.position, 3);
    assert!(view.sequence_exhausted);
    assert_eq!(view.hud.position_label, "FINAL");
    assert_eq!(view.hud.medium, "—");
    assert!(view.current.is_none());
    let notice = view.portal_notice.unwrap();
    assert_eq!(notice.cta_label, "ENTER FULL PORTFOLIO");
    assert_eq!(notice.href, "/portfolio");

    // back and forth across the portal boundary
    gallery.retreat().await.unwrap();
    settle().await;
    assert_eq!(gallery.view().await.unwrap().state, NavigationState::AtDistance(2));
    gallery.advance().await.unwrap();
    gallery.advance().await.unwrap();
    settle().await;

    let view = gallery.view().await.unwrap();
    assert_eq!(view.state, NavigationState::AtPortal);
    assert!(view.sequence_exhausted);
    assert_eq!(exhausted_count(&drain(&mut events)), 1);
}

#[tokio::test(start_paused = true)]
async fn intents_during_a_move_are_reported_and_ignored() {
    let (gallery, mut events, _join) = start(3);

    gallery.advance().await.unwrap();
    gallery.advance().await.unwrap();
    gallery.advance().await.unwrap();
    gallery.retreat().await.unwrap();

    let view = gallery.view().await.unwrap();
    assert_eq!(view.state, NavigationState::Transitioning { from: 0, to: 1 });
    assert_eq!(view.position, 1);
    assert!(!view.hud.forward.enabled);
    assert!(!view.hud.backward.enabled);

    let ignored: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            GalleryEvent::IntentIgnored { intent, reason } => Some((intent, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        ignored,
        vec![
            (Intent::Advance, IgnoredIntent::Transitioning),
            (Intent::Retreat, IgnoredIntent::Transitioning)
        ]
    );

    settle().await;
    assert_eq!(gallery.view().await.unwrap().state, NavigationState::AtDistance(1));
}

#[tokio::test(start_paused = true)]
async fn keys_map_to_intents() {
    let (gallery, _events, _join) = start(2);

    gallery.key("w").await.unwrap();
    let view = gallery.view().await.unwrap();
    assert_eq!(view.state, NavigationState::Approached(0));
    let detail = view.detail.unwrap();
    assert_eq!(detail.heading, "ARTWORK #1");
    assert_eq!(detail.title, "WORK 1");
    assert_eq!(view.hud.forward.label, "NEXT");
    assert_eq!(view.hud.backward.label, "STEP BACK");
    assert_eq!(view.status.time, "12:34:56");
    assert_eq!(view.status.status, "SYSTEM ACTIVE");

    gallery.key("Enter").await.unwrap();
    assert_eq!(gallery.view().await.unwrap().state, NavigationState::Approached(0));

    gallery.key("S").await.unwrap();
    let view = gallery.view().await.unwrap();
    assert_eq!(view.state, NavigationState::AtDistance(0));
    assert!(view.detail.is_none());

    gallery.key("ArrowDown").await.unwrap();
    assert_eq!(gallery.view().await.unwrap().state, NavigationState::AtDistance(0));
}

#[tokio::test(start_paused = true)]
async fn camera_follows_the_visitor() {
    let (gallery, _events, _join) = start(2);

    let standard = gallery.view().await.unwrap().camera;
    gallery.advance().await.unwrap();
    let close = gallery.view().await.unwrap().camera;

    assert!(close.position.z < standard.position.z);
    assert!(close.orientation.pitch > 0.0);
    assert_eq!(standard.orientation.pitch, 0.0);

    gallery.advance().await.unwrap();
    settle().await;
    let next = gallery.view().await.unwrap().camera;
    assert_eq!(next.position.z, -8.0);
    assert_eq!(next.orientation.pitch, 0.0);
}

/// Polls the view until `count` exhibits have a committed visual.
async fn wait_for_assets(gallery: &GalleryHandle, count: usize) -> GalleryView {
    let mut view = gallery.view().await.unwrap();
    for _ in 0..100 {
        if view.assets.len() == count && view.assets.values().all(|s| *s != AssetStatus::Pending) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        view = gallery.view().await.unwrap();
    }
    view
}

#[tokio::test(start_paused = true)]
async fn every_exhibit_resolves_to_something_drawable() {
    let mut fetcher = MemoryFetcher::default();
    fetcher.assets.insert("/art/one.png".into(), png());
    fetcher.assets.insert("/art/broken.jpg".into(), b"not an image".to_vec());

    let exhibits = Exhibits::new(vec![
        Exhibit::new(1, "One").with_image("art/one.png"),
        Exhibit::new(2, "Broken").with_image("/art/broken.jpg"),
        Exhibit::new(3, "Missing").with_image("/art/missing.jpg"),
        Exhibit::new(4, "Bare"),
    ])
    .unwrap();
    let (gallery, mut events, _join) = start_with(exhibits, fetcher);

    // only the first exhibit and the one after it are resolved up front
    let view = wait_for_assets(&gallery, 2).await;
    assert_eq!(view.asset(ExhibitId(1)), Some(AssetStatus::Loaded));
    assert_eq!(view.asset(ExhibitId(2)), Some(AssetStatus::Fallback));
    assert_eq!(view.asset(ExhibitId(3)), None);

    // walking on pulls in the rest
    for _ in 0..2 {
        gallery.advance().await.unwrap();
        gallery.advance().await.unwrap();
        settle().await;
    }
    let view = wait_for_assets(&gallery, 4).await;
    assert_eq!(view.position, 2);
    assert_eq!(view.asset(ExhibitId(3)), Some(AssetStatus::Fallback));
    assert_eq!(view.asset(ExhibitId(4)), Some(AssetStatus::Fallback));

    let resolved = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, GalleryEvent::AssetResolved { .. }))
        .count();
    assert_eq!(resolved, 4);
}

#[tokio::test(start_paused = true)]
async fn re_resolving_keeps_the_committed_visual() {
    let mut fetcher = MemoryFetcher::default();
    fetcher.assets.insert("/art/one.png".into(), png());
    let exhibits = Exhibits::new(vec![Exhibit::new(1, "One").with_image("art/one.png")]).unwrap();
    let (gallery, mut events, _join) = start_with(exhibits, fetcher);

    assert_eq!(wait_for_assets(&gallery, 1).await.asset(ExhibitId(1)), Some(AssetStatus::Loaded));
    drain(&mut events);

    gallery.resolve(ExhibitId(1)).await.unwrap();
    assert_eq!(gallery.view().await.unwrap().asset(ExhibitId(1)), Some(AssetStatus::Loaded));

    let mut updates = Vec::new();
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        gallery.view().await.unwrap();
        updates.extend(drain(&mut events).into_iter().filter_map(|e| match e {
            GalleryEvent::AssetResolved { id, status } => Some((id, status)),
            _ => None,
        }));
        if !updates.is_empty() {
            break;
        }
    }
    assert_eq!(updates, vec![(ExhibitId(1), AssetStatus::Loaded)]);
}

#[tokio::test(start_paused = true)]
async fn dismissing_the_portal_keeps_exhaustion() {
    let (gallery, _events, _join) = start(1);

    gallery.advance().await.unwrap();
    gallery.advance().await.unwrap();
    settle().await;
    assert!(gallery.view().await.unwrap().portal_notice.is_some());

    gallery.dismiss_portal().await.unwrap();
    let view = gallery.view().await.unwrap();
    assert!(view.portal_notice.is_none());
    assert!(view.sequence_exhausted);
}

#[tokio::test(start_paused = true)]
async fn empty_sequence_starts_at_the_portal() {
    let (gallery, mut events, _join) = start_with(Exhibits::empty(), MemoryFetcher::default());

    gallery.advance().await.unwrap();
    gallery.retreat().await.unwrap();

    let view = gallery.view().await.unwrap();
    assert_eq!(view.state, NavigationState::AtPortal);
    assert!(view.sequence_exhausted);
    assert!(!view.hud.forward.enabled);
    assert!(!view.hud.backward.enabled);

    let events = drain(&mut events);
    assert!(matches!(events.first(), Some(GalleryEvent::SessionStarted)));
    assert_eq!(exhausted_count(&events), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_closes_the_session() {
    let (gallery, mut events, join) = start(2);

    gallery.advance().await.unwrap();
    gallery.advance().await.unwrap();
    gallery.shutdown().await.unwrap();
    join.await.unwrap();

    assert!(matches!(drain(&mut events).last(), Some(GalleryEvent::SessionClosed)));
    assert!(matches!(gallery.advance().await, Err(GalleryError::SessionClosed)));
    assert!(matches!(gallery.view().await, Err(GalleryError::SessionClosed)));
    assert!(gallery.is_closed());
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_closes_the_session() {
    let (gallery, mut events, join) = start(2);
    let other = gallery.clone();

    drop(gallery);
    other.advance().await.unwrap();
    drop(other);
    join.await.unwrap();

    assert!(matches!(drain(&mut events).last(), Some(GalleryEvent::SessionClosed)));
}
