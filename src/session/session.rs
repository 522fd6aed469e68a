use crate::config::GalleryConfig;
use crate::errors::GalleryError;
use crate::exhibit::{ExhibitId, Exhibits};
use crate::input::Intent;
use crate::navigation::{Clock, GalleryController, Step, SystemClock};
use crate::net::{fetcher_for, AssetFetcher};
use crate::render::{AssetStatus, Completion, ExhibitRenderer, SharedBackend};
use crate::session::events::{GalleryCommand, GalleryEvent};
use crate::session::handle::GalleryHandle;
use crate::session::view::GalleryView;
use log::{debug, info, warn};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

/// Unique identifier of a gallery session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One visitor's walk through an exhibit sequence.
///
/// All state lives on a single task: commands, the settle timer and asset completions are
/// processed one at a time, so no two state changes ever interleave.
pub struct GallerySession {
    id: SessionId,
    controller: GalleryController,
    renderer: ExhibitRenderer,
    clock: Arc<dyn Clock>,
    portal_dismissed: bool,
    /// When the current move settles. `None` when nothing is moving.
    settle_at: Option<Instant>,
    cmd_tx: mpsc::Sender<GalleryCommand>,
    cmd_rx: mpsc::Receiver<GalleryCommand>,
    event_tx: broadcast::Sender<GalleryEvent>,
}

impl std::fmt::Debug for GallerySession {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GallerySession")
            .field("id", &self.id)
            .field("state", &self.controller.state())
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl GallerySession {
    pub fn new(
        config: GalleryConfig,
        exhibits: Exhibits,
        fetcher: Arc<dyn AssetFetcher>,
        backend: SharedBackend,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<GalleryCommand>(config.event_capacity);
        let (event_tx, _first_rx) = broadcast::channel::<GalleryEvent>(config.event_capacity);

        Self {
            id: SessionId::new(),
            renderer: ExhibitRenderer::new(&config, fetcher, backend),
            controller: GalleryController::new(exhibits, &config),
            clock: Arc::new(SystemClock),
            portal_dismissed: false,
            settle_at: None,
            cmd_tx,
            cmd_rx,
            event_tx,
        }
    }

    /// Creates a session fetching assets the way the configured asset root requires.
    pub fn from_config(config: GalleryConfig, exhibits: Exhibits, backend: SharedBackend) -> Result<Self, GalleryError> {
        let fetcher = fetcher_for(&config)?;
        Ok(Self::new(config, exhibits, fetcher, backend))
    }

    /// Replaces the clock read for the HUD timestamp.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Subscribes to events before the session is started.
    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.event_tx.subscribe()
    }

    /// Spawns the run loop on the current Tokio runtime.
    pub fn start(self) -> (GalleryHandle, JoinHandle<()>) {
        let handle = GalleryHandle::new(self.id, self.cmd_tx.clone(), self.event_tx.clone());
        let join_handle = tokio::spawn(self.run());

        (handle, join_handle)
    }

    /// Session run loop. Ends on shutdown, or once every handle has been dropped.
    pub async fn run(self) {
        let mut this = self.detach_sender();

        info!(
            "Gallery session {} started with {} exhibits",
            this.id,
            this.controller.exhibits().len()
        );
        this.emit(GalleryEvent::SessionStarted);
        this.resolve_nearby();

        if this.controller.sequence_exhausted() {
            this.emit(GalleryEvent::SequenceExhausted);
        }
        this.emit_state();

        loop {
            let settle_at = this.settle_at;

            tokio::select! {
                cmd = this.cmd_rx.recv() => match cmd {
                    Some(cmd) => {
                        if !this.handle_command(cmd) {
                            return;
                        }
                    }
                    None => {
                        debug!("Gallery session {}: all handles dropped", this.id);
                        break;
                    }
                },

                _ = async {
                    match settle_at {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => futures::future::pending().await,
                    }
                } => this.on_settle(),

                Some(completion) = this.renderer.next_completion() => this.on_completion(completion),
            }
        }

        this.teardown();
    }

    fn detach_sender(self) -> RunningSession {
        RunningSession {
            id: self.id,
            controller: self.controller,
            renderer: self.renderer,
            clock: self.clock,
            portal_dismissed: self.portal_dismissed,
            settle_at: self.settle_at,
            cmd_rx: self.cmd_rx,
            event_tx: self.event_tx,
        }
    }
}

/// The session as seen by its own run loop: same state, minus the command sender, so the
/// command channel closes when the last handle goes away.
struct RunningSession {
    id: SessionId,
    controller: GalleryController,
    renderer: ExhibitRenderer,
    clock: Arc<dyn Clock>,
    portal_dismissed: bool,
    settle_at: Option<Instant>,
    cmd_rx: mpsc::Receiver<GalleryCommand>,
    event_tx: broadcast::Sender<GalleryEvent>,
}

impl RunningSession {
    fn emit(&self, event: GalleryEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn view(&self) -> GalleryView {
        GalleryView::project(&self.controller, self.clock.as_ref(), self.portal_dismissed, self.renderer.statuses())
    }

    fn emit_state(&self) {
        self.emit(GalleryEvent::StateChanged(Box::new(self.view())));
    }

    /// Applies one command. Returns `false` once the session has shut down.
    fn handle_command(&mut self, cmd: GalleryCommand) -> bool {
        match cmd {
            GalleryCommand::Intent(intent) => self.on_intent(intent),
            GalleryCommand::Key(key) => match Intent::from_key(&key) {
                Some(intent) => self.on_intent(intent),
                None => debug!("Gallery session {}: key {key:?} has no binding", self.id),
            },
            GalleryCommand::DismissPortal => {
                if self.controller.portal_notice().is_some() && !self.portal_dismissed {
                    self.portal_dismissed = true;
                    self.emit_state();
                }
            }
            GalleryCommand::Resolve(id) => self.on_resolve(id),
            GalleryCommand::View { reply } => {
                let _ = reply.send(self.view());
            }
            GalleryCommand::Shutdown { reply } => {
                self.teardown();
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    fn on_intent(&mut self, intent: Intent) {
        match self.controller.apply(intent) {
            Step::Ignored(reason) => {
                self.emit(GalleryEvent::IntentIgnored { intent, reason });
            }
            Step::Moving { .. } => {
                self.settle_at = Some(Instant::now() + self.controller.settle_interval());
                self.resolve_nearby();
                self.emit_state();
            }
            Step::Approached(_) | Step::SteppedBack(_) => self.emit_state(),
        }
    }

    fn on_settle(&mut self) {
        self.settle_at = None;

        if let Some(settled) = self.controller.settle() {
            debug!("Gallery session {}: settled at {}", self.id, settled.position);
            if settled.exhausted_now {
                info!("Gallery session {}: sequence exhausted", self.id);
                self.emit(GalleryEvent::SequenceExhausted);
            }
            self.resolve_nearby();
            self.emit_state();
        }
    }

    /// Starts resolving the exhibit at the current position and the one after it, unless
    /// they were resolved before. During a move the current position is the destination.
    fn resolve_nearby(&mut self) {
        let position = self.controller.position();
        let exhibits = self.controller.exhibits();
        let nearby: Vec<_> = exhibits
            .iter()
            .skip(position)
            .take(2)
            .filter(|e| !self.renderer.is_tracked(e.id))
            .cloned()
            .collect();

        for exhibit in nearby {
            debug!("Gallery session {}: resolving exhibit {}", self.id, exhibit.id);
            self.renderer.resolve(&exhibit);
        }
    }

    fn on_resolve(&mut self, id: ExhibitId) {
        let exhibit = self.controller.exhibits().iter().find(|e| e.id == id).cloned();
        match exhibit {
            Some(exhibit) => self.renderer.resolve(&exhibit),
            None => debug!("Gallery session {}: no exhibit {id} to resolve", self.id),
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        match self.renderer.apply(completion) {
            Ok(Some(update)) => {
                self.emit(GalleryEvent::AssetResolved { id: update.id, status: update.status });
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Gallery session {}: {e}", self.id);
                self.emit(GalleryEvent::AssetRenderingFailed { id: e.exhibit, message: e.message.clone() });
                self.emit(GalleryEvent::AssetResolved { id: e.exhibit, status: AssetStatus::Failed });
            }
        }
    }

    fn teardown(&mut self) {
        if self.renderer.is_torn_down() {
            return;
        }
        self.renderer.teardown();
        self.settle_at = None;
        self.cmd_rx.close();
        info!("Gallery session {} closed", self.id);
        self.emit(GalleryEvent::SessionClosed);
    }
}
