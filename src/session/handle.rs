use crate::errors::GalleryError;
use crate::exhibit::ExhibitId;
use crate::input::Intent;
use crate::session::events::{GalleryCommand, GalleryEvent};
use crate::session::session::SessionId;
use crate::session::view::GalleryView;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Cloneable handle to a running [`GallerySession`](crate::session::GallerySession).
///
/// The session tears itself down once every handle has been dropped.
#[derive(Clone)]
pub struct GalleryHandle {
    id: SessionId,
    cmd_tx: mpsc::Sender<GalleryCommand>,
    event_tx: broadcast::Sender<GalleryEvent>,
}

impl std::fmt::Debug for GalleryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryHandle")
            .field("id", &self.id)
            .field("closed", &self.cmd_tx.is_closed())
            .finish()
    }
}

impl GalleryHandle {
    pub(crate) fn new(
        id: SessionId,
        cmd_tx: mpsc::Sender<GalleryCommand>,
        event_tx: broadcast::Sender<GalleryEvent>,
    ) -> Self {
        Self { id, cmd_tx, event_tx }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.event_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn send(&self, cmd: GalleryCommand) -> Result<(), GalleryError> {
        self.cmd_tx.send(cmd).await.map_err(|_| GalleryError::SessionClosed)
    }

    pub async fn intent(&self, intent: Intent) -> Result<(), GalleryError> {
        self.send(GalleryCommand::Intent(intent)).await
    }

    pub async fn advance(&self) -> Result<(), GalleryError> {
        self.intent(Intent::Advance).await
    }

    pub async fn retreat(&self) -> Result<(), GalleryError> {
        self.intent(Intent::Retreat).await
    }

    /// Forwards a key press. Keys without a navigation meaning are ignored by the session.
    pub async fn key(&self, key: impl Into<String>) -> Result<(), GalleryError> {
        self.send(GalleryCommand::Key(key.into())).await
    }

    pub async fn dismiss_portal(&self) -> Result<(), GalleryError> {
        self.send(GalleryCommand::DismissPortal).await
    }

    /// Restarts resolution of one exhibit's visual.
    pub async fn resolve(&self, id: ExhibitId) -> Result<(), GalleryError> {
        self.send(GalleryCommand::Resolve(id)).await
    }

    /// Current view, after every command sent before this call has been applied.
    pub async fn view(&self) -> Result<GalleryView, GalleryError> {
        let (tx, rx) = oneshot::channel();
        self.send(GalleryCommand::View { reply: tx }).await?;
        rx.await.map_err(|_| GalleryError::ChannelClosed)
    }

    /// Tears the session down and waits for it to finish.
    pub async fn shutdown(&self) -> Result<(), GalleryError> {
        let (tx, rx) = oneshot::channel();
        self.send(GalleryCommand::Shutdown { reply: tx }).await?;
        rx.await.map_err(|_| GalleryError::ChannelClosed)
    }
}
