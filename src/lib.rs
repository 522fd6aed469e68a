pub mod carousel;
pub mod config;
pub mod errors;
pub mod exhibit;
pub mod input;
pub mod navigation;
pub mod net;
pub mod render;
pub mod session;

pub use config::{GalleryConfig, GalleryConfigBuilder};
pub use errors::{AssetRenderingError, GalleryError};
pub use exhibit::{Exhibit, ExhibitId, Exhibits};
pub use input::Intent;
pub use navigation::{GalleryController, NavigationState};
pub use session::{GalleryEvent, GalleryHandle, GallerySession, GalleryView};
