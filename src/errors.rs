use crate::config::ConfigError;
use crate::exhibit::ExhibitId;
use crate::net::FetchError;

/// Raised when a fallback texture cannot be produced for an exhibit. This is an environment
/// defect (no usable drawing surface), not a content defect, and is the only rendering
/// failure that leaves the gallery.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot render fallback for exhibit {exhibit}: {message}")]
pub struct AssetRenderingError {
    /// Exhibit whose slot stays empty
    pub exhibit: ExhibitId,
    /// Backend diagnostic
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error(transparent)]
    AssetRendering(#[from] AssetRenderingError),

    #[error("Invalid exhibit sequence: {0}")]
    InvalidExhibits(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot set up asset fetching: {0}")]
    Fetch(#[from] FetchError),

    #[error("Gallery session has been closed")]
    SessionClosed,

    #[error("Command channel closed")]
    ChannelClosed,
}
