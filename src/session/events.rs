//! Commands into a gallery session and events out of it.

use crate::exhibit::ExhibitId;
use crate::input::Intent;
use crate::navigation::IgnoredIntent;
use crate::render::AssetStatus;
use crate::session::view::GalleryView;
use tokio::sync::oneshot;

/// Commands sent from a [`GalleryHandle`](crate::session::GalleryHandle) to the session task.
#[derive(Debug)]
pub enum GalleryCommand {
    /// Navigation intent
    Intent(Intent),
    /// Raw key name, mapped through [`Intent::from_key`]. Unmapped keys are dropped.
    Key(String),
    /// Hides the portal notice. Exhaustion stays latched.
    DismissPortal,
    /// Re-resolves one exhibit's visual.
    Resolve(ExhibitId),
    /// Snapshot of the current view.
    View { reply: oneshot::Sender<GalleryView> },
    /// Tears the session down. Replies once nothing runs anymore.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Events broadcast by a running session.
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// The run loop is up.
    SessionStarted,
    /// Navigation state or an overlay changed.
    StateChanged(Box<GalleryView>),
    /// An intent did not apply. Informational only.
    IntentIgnored { intent: Intent, reason: IgnoredIntent },
    /// An exhibit's visual has been committed.
    AssetResolved { id: ExhibitId, status: AssetStatus },
    /// No placeholder could be produced for an exhibit.
    AssetRenderingFailed { id: ExhibitId, message: String },
    /// The visitor reached the portal for the first time. Sent once per session.
    SequenceExhausted,
    /// The session has been torn down.
    SessionClosed,
}
