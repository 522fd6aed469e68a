use crate::render::backend::{ErasedSurface, RenderBackend, RgbaImage, SurfaceSize, MAX_SURFACE_EDGE};
use crate::render::RenderList;
use anyhow::{anyhow, Result};
use std::any::Any;

/// Null backend renderer that does not perform any rendering.
///
/// Snapshots are fully transparent. Useful for headless hosts that only care about the
/// fallback's render list and label.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    /// Creates a new instance of the null backend.
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for NullBackend {
    fn name(&self) -> &str {
        "NullBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface + Send>> {
        Ok(Box::new(NullSurface::new(size)?))
    }

    fn render(&mut self, _list: &RenderList, surface: &mut dyn ErasedSurface) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        s.frame_id = s.frame_id.wrapping_add(1);
        Ok(())
    }

    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        let stride = s
            .size
            .width
            .checked_mul(4)
            .ok_or_else(|| anyhow!("NullBackend surface too wide: {}", s.size.width))?;
        let len = (stride as usize)
            .checked_mul(s.size.height as usize)
            .ok_or_else(|| anyhow!("NullBackend surface too large: {}x{}", s.size.width, s.size.height))?;
        RgbaImage::from_raw(vec![0u8; len], s.size.width, s.size.height, stride)
            .ok_or_else(|| anyhow!("NullBackend snapshot buffer mismatch"))
    }
}

pub struct NullSurface {
    /// Size of the surface in pixels.
    pub size: SurfaceSize,
    /// Number of frames rendered onto this surface.
    frame_id: u64,
}

impl NullSurface {
    pub fn new(size: SurfaceSize) -> Result<Self> {
        if size.width > MAX_SURFACE_EDGE || size.height > MAX_SURFACE_EDGE {
            return Err(anyhow!(
                "surface {}x{} exceeds the {MAX_SURFACE_EDGE}px limit",
                size.width,
                size.height
            ));
        }
        Ok(Self { size, frame_id: 0 })
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }
}

impl ErasedSurface for NullSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn size(&self) -> SurfaceSize {
        self.size
    }
}
