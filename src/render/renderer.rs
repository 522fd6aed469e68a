//! Exhibit visual resolution.
//!
//! [`ExhibitRenderer`] turns an [`Exhibit`] into a [`Texture`] without ever leaving a frame
//! blank: it tries the declared image first and falls back to a synthesized placeholder on
//! any fetch, decode or timeout failure.
//!
//! Each call to [`resolve`](ExhibitRenderer::resolve) spawns one cancellable task on the
//! current Tokio runtime. Results come back through
//! [`next_completion`](ExhibitRenderer::next_completion) and are committed with
//! [`apply`](ExhibitRenderer::apply). Every resolution carries a generation number; a
//! completion whose generation is no longer current for its exhibit is discarded, so a
//! superseded fetch can never overwrite a newer result.

use crate::config::GalleryConfig;
use crate::errors::AssetRenderingError;
use crate::exhibit::{Exhibit, ExhibitId};
use crate::net::{asset_url, AssetFetcher, FetchError};
use crate::render::backend::{RgbaImage, SharedBackend};
use crate::render::fallback::synthesize_fallback;
use crate::render::texture::{AssetResolution, AssetStatus, Texture};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Why the declared image could not be used.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("exhibit declares no usable image path")]
    NoAsset,
    #[error("asset fetch timed out")]
    Timeout,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("cannot decode asset: {0}")]
    Decode(#[from] image::ImageError),
}

/// Outcome of one resolution task, tagged with the generation it was started for.
#[derive(Debug)]
pub struct Completion {
    id: ExhibitId,
    generation: u64,
    outcome: Result<Texture, AssetRenderingError>,
}

impl Completion {
    pub fn exhibit(&self) -> ExhibitId {
        self.id
    }
}

/// A committed change of one exhibit's resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AssetUpdate {
    pub id: ExhibitId,
    pub status: AssetStatus,
}

struct Slot {
    generation: u64,
    cancel: CancellationToken,
    /// Last committed resolution; stays visible while a newer generation runs.
    resolution: AssetResolution,
    in_flight: bool,
}

pub struct ExhibitRenderer {
    asset_root: Url,
    fallback_size: u32,
    fetch_timeout: Duration,
    fetcher: Arc<dyn AssetFetcher>,
    backend: SharedBackend,
    slots: HashMap<ExhibitId, Slot>,
    next_generation: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    /// Parent of every per-resolution token
    shutdown: CancellationToken,
}

impl std::fmt::Debug for ExhibitRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExhibitRenderer")
            .field("asset_root", &self.asset_root.as_str())
            .field("slots", &self.slots.len())
            .field("torn_down", &self.shutdown.is_cancelled())
            .finish()
    }
}

impl ExhibitRenderer {
    pub fn new(config: &GalleryConfig, fetcher: Arc<dyn AssetFetcher>, backend: SharedBackend) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            asset_root: config.asset_root.clone(),
            fallback_size: config.fallback_size,
            fetch_timeout: config.fetch_timeout,
            fetcher,
            backend,
            slots: HashMap::new(),
            next_generation: 0,
            completion_tx,
            completion_rx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Starts (or restarts) resolving `exhibit`. Any earlier resolution of the same exhibit is
    /// cancelled and its result will be ignored. A new slot reads
    /// [`Pending`](AssetStatus::Pending) until its resolution is applied; a slot that already
    /// committed a texture keeps showing it until the newer generation is applied.
    ///
    /// Must be called from within a Tokio runtime. Does nothing after [`teardown`](Self::teardown).
    pub fn resolve(&mut self, exhibit: &Exhibit) {
        if self.is_torn_down() {
            debug!("Renderer: ignoring resolve of {} after teardown", exhibit.id);
            return;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let cancel = self.shutdown.child_token();

        let resolution = match self.slots.remove(&exhibit.id) {
            Some(previous) => {
                previous.cancel.cancel();
                previous.resolution
            }
            None => AssetResolution::pending(),
        };
        self.slots.insert(
            exhibit.id,
            Slot { generation, cancel: cancel.clone(), resolution, in_flight: true },
        );

        let url = asset_url(&self.asset_root, exhibit.image_path.as_deref());
        let job = ResolveJob {
            exhibit: exhibit.clone(),
            url,
            fetcher: self.fetcher.clone(),
            backend: self.backend.clone(),
            fallback_size: self.fallback_size,
            fetch_timeout: self.fetch_timeout,
        };
        let tx = self.completion_tx.clone();
        let id = exhibit.id;

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Renderer: resolution {generation} of exhibit {id} cancelled");
                    return;
                }
                outcome = job.run() => outcome,
            };

            if !cancel.is_cancelled() {
                let _ = tx.send(Completion { id, generation, outcome });
            }
        });
    }

    /// Resolves every exhibit of a sequence, in order.
    pub fn resolve_all<'a>(&mut self, exhibits: impl IntoIterator<Item = &'a Exhibit>) {
        for exhibit in exhibits {
            self.resolve(exhibit);
        }
    }

    /// Waits for the next finished resolution. Cancel safe. Never yields after teardown.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.is_torn_down() {
            return None;
        }
        tokio::select! {
            _ = self.shutdown.cancelled() => None,
            completion = self.completion_rx.recv() => completion,
        }
    }

    /// Commits a finished resolution.
    ///
    /// Stale completions (superseded, or arriving after teardown) are dropped and yield
    /// `Ok(None)`. A fallback that could not be synthesized leaves the slot
    /// [`Failed`](AssetStatus::Failed) and is returned as the error.
    pub fn apply(&mut self, completion: Completion) -> Result<Option<AssetUpdate>, AssetRenderingError> {
        if self.is_torn_down() {
            return Ok(None);
        }

        let Some(slot) = self.slots.get_mut(&completion.id) else {
            return Ok(None);
        };
        if slot.generation != completion.generation {
            debug!(
                "Renderer: dropping stale resolution {} of exhibit {} (current {})",
                completion.generation, completion.id, slot.generation
            );
            return Ok(None);
        }

        slot.in_flight = false;
        match completion.outcome {
            Ok(texture) => {
                slot.resolution = AssetResolution::resolved(texture);
                Ok(Some(AssetUpdate { id: completion.id, status: slot.resolution.status() }))
            }
            Err(e) => {
                slot.resolution = AssetResolution::failed();
                Err(e)
            }
        }
    }

    /// Resolves one exhibit and waits until its own result is committed. Other completions
    /// arriving meanwhile are committed too; their rendering errors are logged.
    pub async fn resolve_now(&mut self, exhibit: &Exhibit) -> Result<AssetStatus, AssetRenderingError> {
        self.resolve(exhibit);
        let Some(wanted) = self.slots.get(&exhibit.id).map(|s| s.generation) else {
            return Ok(AssetStatus::Pending);
        };

        while let Some(completion) = self.next_completion().await {
            let ours = completion.id == exhibit.id && completion.generation == wanted;
            match self.apply(completion) {
                Ok(Some(update)) if ours => return Ok(update.status),
                Err(e) if ours => return Err(e),
                Err(e) => warn!("Renderer: {e}"),
                _ => {}
            }
        }

        Ok(AssetStatus::Pending)
    }

    pub fn resolution(&self, id: ExhibitId) -> Option<&AssetResolution> {
        self.slots.get(&id).map(|s| &s.resolution)
    }

    pub fn status(&self, id: ExhibitId) -> Option<AssetStatus> {
        self.resolution(id).map(AssetResolution::status)
    }

    /// Status of every exhibit that has been resolved at least once.
    pub fn statuses(&self) -> BTreeMap<ExhibitId, AssetStatus> {
        self.slots.iter().map(|(id, slot)| (*id, slot.resolution.status())).collect()
    }

    /// Whether `id` has ever been handed to [`resolve`](Self::resolve).
    pub fn is_tracked(&self, id: ExhibitId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of resolutions not yet committed.
    pub fn in_flight(&self) -> usize {
        self.slots.values().filter(|s| s.in_flight).count()
    }

    /// Cancels every in-flight resolution. Nothing is committed afterwards.
    pub fn teardown(&mut self) {
        if !self.is_torn_down() {
            debug!("Renderer: teardown with {} resolutions in flight", self.in_flight());
        }
        self.shutdown.cancel();
        self.completion_rx.close();
    }

    pub fn is_torn_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for ExhibitRenderer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Everything one resolution task needs, detached from the renderer.
struct ResolveJob {
    exhibit: Exhibit,
    url: Option<Url>,
    fetcher: Arc<dyn AssetFetcher>,
    backend: SharedBackend,
    fallback_size: u32,
    fetch_timeout: Duration,
}

impl ResolveJob {
    async fn run(self) -> Result<Texture, AssetRenderingError> {
        match self.load().await {
            Ok(image) => {
                debug!("Renderer: loaded image for {:?}", self.exhibit.title);
                Ok(Texture::Image(image))
            }
            Err(e) => {
                warn!("Renderer: image for {:?} unavailable ({e}), using fallback", self.exhibit.title);
                synthesize_fallback(&self.exhibit, self.fallback_size, &self.backend).map(Texture::Fallback)
            }
        }
    }

    async fn load(&self) -> Result<RgbaImage, LoadError> {
        let url = self.url.clone().ok_or(LoadError::NoAsset)?;
        debug!("Renderer: fetching {url} for {:?}", self.exhibit.title);

        let response = tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(url))
            .await
            .map_err(|_| LoadError::Timeout)??;

        debug!(
            "Renderer: decoding {} bytes ({})",
            response.body.len(),
            response.content_type().unwrap_or("unknown type")
        );
        decode_image(&response.body)
    }
}

/// Decodes encoded image bytes (PNG, JPEG, ...) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, LoadError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = decoded.dimensions();

    RgbaImage::from_raw(decoded.into_raw(), width, height, width * 4).ok_or_else(|| {
        LoadError::Decode(image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        )))
    })
}
