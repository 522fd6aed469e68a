use crate::render::backend::RgbaImage;
use crate::render::fallback::{FallbackTexture, PLATE_COLOR};
use crate::render::Color;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Neutral colour painted into an exhibit frame while its asset is still resolving.
pub fn pending_color() -> Color {
    Color::from_rgb_hex(PLATE_COLOR)
}

/// Progress of resolving one exhibit's visual.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AssetStatus {
    /// Fetch in flight; draw [`pending_color`].
    Pending,
    /// The declared image was fetched and decoded.
    Loaded,
    /// The image could not be used; a placeholder was synthesized.
    Fallback,
    /// Not even a placeholder could be produced. The frame stays empty.
    Failed,
}

impl Display for AssetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::Pending => write!(f, "Pending"),
            AssetStatus::Loaded => write!(f, "Loaded"),
            AssetStatus::Fallback => write!(f, "Fallback"),
            AssetStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Resolved visual handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Texture {
    /// Decoded exhibit image.
    Image(RgbaImage),
    /// Synthesized placeholder.
    Fallback(FallbackTexture),
}

impl Texture {
    pub fn image(&self) -> &RgbaImage {
        match self {
            Texture::Image(image) => image,
            Texture::Fallback(fallback) => &fallback.image,
        }
    }

    /// Text embedded in a placeholder; `None` for real images.
    pub fn label(&self) -> Option<&str> {
        match self {
            Texture::Image(_) => None,
            Texture::Fallback(fallback) => Some(&fallback.label),
        }
    }
}

/// Per-exhibit resolution state. A texture is present exactly when the status is
/// [`Loaded`](AssetStatus::Loaded) or [`Fallback`](AssetStatus::Fallback).
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResolution {
    status: AssetStatus,
    texture: Option<Arc<Texture>>,
}

impl AssetResolution {
    pub fn pending() -> Self {
        Self { status: AssetStatus::Pending, texture: None }
    }

    pub fn failed() -> Self {
        Self { status: AssetStatus::Failed, texture: None }
    }

    pub fn resolved(texture: Texture) -> Self {
        let status = match texture {
            Texture::Image(_) => AssetStatus::Loaded,
            Texture::Fallback(_) => AssetStatus::Fallback,
        };
        Self { status, texture: Some(Arc::new(texture)) }
    }

    pub fn status(&self) -> AssetStatus {
        self.status
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }
}
