use crate::render::backend::{ErasedSurface, RenderBackend, RgbaImage, SurfaceSize};
use crate::render::{Color, DisplayItem, RenderList};
use anyhow::{anyhow, Result};
use std::any::Any;

pub use crate::render::backend::MAX_SURFACE_EDGE;

/// Software rasterizer writing straight RGBA8 pixels.
///
/// Fills, stroked rectangles and lines are painted with source-over blending. Text runs have
/// no glyph rasterizer behind them and are skipped; the text stays available through the
/// render list itself.
#[derive(Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &str {
        "CpuBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface + Send>> {
        Ok(Box::new(CpuSurface::new(size)?))
    }

    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<CpuSurface>()
            .ok_or_else(|| anyhow!("CpuBackend used with non-Cpu surface"))?;

        for item in list.items.iter() {
            match item {
                DisplayItem::Clear { color } => s.clear(*color),
                DisplayItem::Rect { x, y, w, h, color } => {
                    s.fill_where(*x, *y, *x + *w, *y + *h, *color, |_, _| true);
                }
                DisplayItem::StrokeRect { x, y, w, h, line_width, color } => {
                    let half = line_width / 2.0;
                    let (ix0, iy0, ix1, iy1) = (x + half, y + half, x + w - half, y + h - half);
                    s.fill_where(x - half, y - half, x + w + half, y + h + half, *color, |px, py| {
                        !(px >= ix0 && px < ix1 && py >= iy0 && py < iy1)
                    });
                }
                DisplayItem::Line { x0, y0, x1, y1, line_width, color } => {
                    let half = line_width / 2.0;
                    let (sx, sy, ex, ey) = (*x0, *y0, *x1, *y1);
                    s.fill_where(
                        sx.min(ex) - half,
                        sy.min(ey) - half,
                        sx.max(ex) + half,
                        sy.max(ey) + half,
                        *color,
                        |px, py| segment_distance(px, py, sx, sy, ex, ey) <= half,
                    );
                }
                DisplayItem::TextRun { text, .. } => {
                    log::trace!("CpuBackend: skipping text run {text:?}");
                }
            }
        }

        s.frame_id = s.frame_id.wrapping_add(1);
        Ok(())
    }

    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<CpuSurface>()
            .ok_or_else(|| anyhow!("CpuBackend used with non-Cpu surface"))?;

        RgbaImage::from_raw(s.pixels.clone(), s.size.width, s.size.height, s.size.width * 4)
            .ok_or_else(|| anyhow!("CpuBackend snapshot buffer mismatch"))
    }
}

/// Distance from point `(px, py)` to the segment `(ax, ay)-(bx, by)`.
fn segment_distance(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

pub struct CpuSurface {
    size: SurfaceSize,
    pixels: Vec<u8>,
    frame_id: u64,
}

impl CpuSurface {
    fn new(size: SurfaceSize) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("cannot allocate an empty {}x{} surface", size.width, size.height));
        }
        if size.width > MAX_SURFACE_EDGE || size.height > MAX_SURFACE_EDGE {
            return Err(anyhow!(
                "surface {}x{} exceeds the {MAX_SURFACE_EDGE}px limit",
                size.width,
                size.height
            ));
        }

        Ok(Self {
            size,
            pixels: vec![0u8; (size.width as usize) * (size.height as usize) * 4],
            frame_id: 0,
        })
    }

    fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Blends `color` into every pixel whose centre lies in `[x0, x1) x [y0, y1)` and passes `keep`.
    fn fill_where(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color, keep: impl Fn(f32, f32) -> bool) {
        let (w, h) = (self.size.width as f32, self.size.height as f32);
        let col_start = (x0 - 0.5).ceil().clamp(0.0, w) as usize;
        let col_end = (x1 - 0.5).ceil().clamp(0.0, w) as usize;
        let row_start = (y0 - 0.5).ceil().clamp(0.0, h) as usize;
        let row_end = (y1 - 0.5).ceil().clamp(0.0, h) as usize;

        let src = color.to_rgba8();
        let width = self.size.width as usize;

        for row in row_start..row_end {
            for col in col_start..col_end {
                if !keep(col as f32 + 0.5, row as f32 + 0.5) {
                    continue;
                }
                let at = (row * width + col) * 4;
                blend_over(&mut self.pixels[at..at + 4], src);
            }
        }
    }
}

/// Source-over blend of straight RGBA8 `src` onto `dst`.
fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let da = dst[3] as u32;
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    for i in 0..3 {
        let c = (src[i] as u32 * sa + dst[i] as u32 * da * (255 - sa) / 255) / out_a;
        dst[i] = c.min(255) as u8;
    }
    dst[3] = out_a as u8;
}

impl ErasedSurface for CpuSurface {
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
