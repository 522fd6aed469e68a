use crate::render::RenderList;
use std::any::Any;
use std::sync::{Arc, Mutex};

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Square surface of `edge` pixels.
    pub fn square(edge: u32) -> Self {
        Self { width: edge, height: edge }
    }
}

/// Largest surface edge any backend will allocate.
pub const MAX_SURFACE_EDGE: u32 = 8192;

/// Owned straight (non-premultiplied) RGBA8 pixels, used both for decoded exhibit images and rasterized fallbacks.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
}

impl RgbaImage {
    /// Wraps raw pixels. Returns `None` when the buffer is too small for the dimensions.
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32, stride: u32) -> Option<Self> {
        if pixels.len() < (height as usize) * (stride as usize) || stride < width * 4 {
            return None;
        }

        Some(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize) * (self.stride as usize) + (x as usize) * 4;
        let px = self.pixels.get(at..at + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encodes the image as PNG.
    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;

            let row = (self.width as usize) * 4;
            let mut packed = Vec::with_capacity(row * self.height as usize);
            for y in 0..self.height as usize {
                let start = y * self.stride as usize;
                packed.extend_from_slice(&self.pixels[start..start + row]);
            }
            writer.write_image_data(&packed)?;
        }
        Ok(out)
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// Type-erased surface so the renderer can hold it without generics.
pub trait ErasedSurface: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn size(&self) -> SurfaceSize;
}

/// Core backend interface used to rasterize render lists into textures.
pub trait RenderBackend {
    /// Human readable name of the backend.
    fn name(&self) -> &str;

    /// Create a new surface with the given size.
    fn create_surface(&self, size: SurfaceSize) -> anyhow::Result<Box<dyn ErasedSurface + Send>>;

    /// Paint the render list onto the given surface.
    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> anyhow::Result<()>;

    /// Read the surface back as RGBA8 pixels.
    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> anyhow::Result<RgbaImage>;
}

/// Backend shared between the renderer and its resolution tasks.
pub type SharedBackend = Arc<Mutex<Box<dyn RenderBackend + Send>>>;

/// Wraps a backend for sharing.
pub fn share_backend(backend: impl RenderBackend + Send + 'static) -> SharedBackend {
    Arc::new(Mutex::new(Box::new(backend)))
}
