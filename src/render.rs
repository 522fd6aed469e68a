pub mod backend;

/// Rendering backends used to paint fallback textures.
pub mod backends {
    /// Software rasterizer
    pub mod cpu;
    pub mod null;
}

pub mod fallback;
pub mod renderer;
pub mod texture;

mod render_list;
pub use render_list::*;

pub use backend::{share_backend, RgbaImage, SharedBackend};
pub use renderer::{AssetUpdate, Completion, ExhibitRenderer};
pub use texture::{pending_color, AssetResolution, AssetStatus, Texture};
