//! Deterministic placeholder artwork for exhibits whose image cannot be loaded.
//!
//! The placeholder is a dark plate with a cyan border, a circuit pattern in each corner and
//! the exhibit title in the middle. It depends on the title and the canvas size only, so
//! the same title always produces the same texture.

use crate::errors::AssetRenderingError;
use crate::exhibit::Exhibit;
use crate::render::backend::{RgbaImage, SharedBackend, SurfaceSize};
use crate::render::{Color, DisplayItem, RenderList, TextAlign};

/// Background of the plate. Also used as the neutral colour for pending slots.
pub const PLATE_COLOR: u32 = 0x001133;
const TITLE_COLOR: u32 = 0x00aaff;
const BORDER_COLOR: u32 = 0x00ffff;
const PATTERN_COLOR: u32 = 0x0088aa;

const TITLE_SIZE: f32 = 30.0;
const BORDER_WIDTH: f32 = 10.0;
const BORDER_INSET: f32 = 10.0;
const PATTERN_WIDTH: f32 = 3.0;
const PATTERN_LINES: usize = 5;
const PATTERN_STEP: f32 = 30.0;

/// Describes the placeholder for `title` on a square canvas of `size` pixels.
pub fn fallback_render_list(title: &str, size: u32) -> RenderList {
    let s = size as f32;
    let mut list = RenderList::new();

    list.add_command(DisplayItem::Clear { color: Color::from_rgb_hex(PLATE_COLOR) });

    list.add_command(DisplayItem::TextRun {
        x: s / 2.0,
        y: s / 2.0,
        text: title.to_string(),
        size: TITLE_SIZE,
        family: "monospace".to_string(),
        align: TextAlign::Center,
        color: Color::from_rgb_hex(TITLE_COLOR),
    });

    list.add_command(DisplayItem::StrokeRect {
        x: BORDER_INSET,
        y: BORDER_INSET,
        w: s - 2.0 * BORDER_INSET,
        h: s - 2.0 * BORDER_INSET,
        line_width: BORDER_WIDTH,
        color: Color::from_rgb_hex(BORDER_COLOR),
    });

    let pattern = Color::from_rgb_hex(PATTERN_COLOR);
    for i in 0..PATTERN_LINES {
        let offset = i as f32 * PATTERN_STEP;
        let corners = [
            // top left
            (0.0, offset, offset, 0.0),
            // top right
            (s, offset, s - offset, 0.0),
            // bottom left
            (offset, s, 0.0, s - offset),
            // bottom right
            (s - offset, s, s, s - offset),
        ];
        for (x0, y0, x1, y1) in corners {
            list.add_command(DisplayItem::Line { x0, y0, x1, y1, line_width: PATTERN_WIDTH, color: pattern });
        }
    }

    list
}

/// Synthesized placeholder texture.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackTexture {
    /// Text embedded in the plate; always the exhibit's title.
    pub label: String,
    /// Drawing commands the pixels were produced from.
    pub render_list: RenderList,
    pub image: RgbaImage,
}

/// Paints the placeholder for `exhibit` through `backend`.
///
/// Fails only when the backend cannot provide or paint a surface.
pub fn synthesize_fallback(
    exhibit: &Exhibit,
    size: u32,
    backend: &SharedBackend,
) -> Result<FallbackTexture, AssetRenderingError> {
    let fail = |message: String| AssetRenderingError { exhibit: exhibit.id, message };

    log::debug!("Generating fallback texture for: {}", exhibit.title);
    let render_list = fallback_render_list(&exhibit.title, size);

    let mut backend = backend
        .lock()
        .map_err(|_| fail("render backend lock poisoned".to_string()))?;

    let mut surface = backend
        .create_surface(SurfaceSize::square(size))
        .map_err(|e| fail(format!("{}: {e}", backend.name())))?;
    backend
        .render(&render_list, surface.as_mut())
        .map_err(|e| fail(format!("{}: {e}", backend.name())))?;
    let image = backend
        .snapshot(surface.as_mut())
        .map_err(|e| fail(format!("{}: {e}", backend.name())))?;

    Ok(FallbackTexture {
        label: exhibit.title.clone(),
        render_list,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{share_backend, ErasedSurface, RenderBackend};
    use crate::render::backends::cpu::CpuBackend;

    struct BrokenBackend;

    impl RenderBackend for BrokenBackend {
        fn name(&self) -> &str {
            "BrokenBackend"
        }
        fn create_surface(&self, _size: SurfaceSize) -> anyhow::Result<Box<dyn ErasedSurface + Send>> {
            Err(anyhow::anyhow!("no drawing surface available"))
        }
        fn render(&mut self, _list: &RenderList, _surface: &mut dyn ErasedSurface) -> anyhow::Result<()> {
            unreachable!()
        }
        fn snapshot(&mut self, _surface: &mut dyn ErasedSurface) -> anyhow::Result<RgbaImage> {
            unreachable!()
        }
    }

    #[test]
    fn list_layout_matches_plate_design() {
        let list = fallback_render_list("Metaplane", 512);
        assert_eq!(list.texts(), vec!["Metaplane"]);
        // clear + title + border + 5 x 4 pattern lines
        assert_eq!(list.items.len(), 3 + 20);
        assert!(matches!(
            list.items[1],
            DisplayItem::TextRun { x, y, align: TextAlign::Center, .. } if x == 256.0 && y == 256.0
        ));
    }

    #[test]
    fn same_title_same_texture() {
        let backend = share_backend(CpuBackend::new());
        let exhibit = Exhibit::new(1, "Homecoming");
        let a = synthesize_fallback(&exhibit, 128, &backend).unwrap();
        let b = synthesize_fallback(&Exhibit::new(99, "Homecoming"), 128, &backend).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.label, "Homecoming");
    }

    #[test]
    fn plate_pixels_are_painted() {
        let backend = share_backend(CpuBackend::new());
        let tex = synthesize_fallback(&Exhibit::new(1, "X"), 512, &backend).unwrap();
        // border band
        assert_eq!(tex.image.pixel(10, 256), Some([0x00, 0xff, 0xff, 0xff]));
        // plate background away from text and pattern
        assert_eq!(tex.image.pixel(100, 400), Some([0x00, 0x11, 0x33, 0xff]));
    }

    #[test]
    fn backend_failure_is_an_asset_rendering_error() {
        let backend = share_backend(BrokenBackend);
        let err = synthesize_fallback(&Exhibit::new(5, "Lost"), 512, &backend).unwrap_err();
        assert_eq!(err.exhibit.0, 5);
        assert!(err.message.contains("no drawing surface"));
    }
}
