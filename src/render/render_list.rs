//! Render list and display items.
//!
//! This module defines a lightweight, immediate-style render list
//! consisting of [`DisplayItem`] commands. Fallback textures are described
//! as a render list first and only then rasterized by a
//! [`RenderBackend`](crate::render::backend::RenderBackend), so the
//! description itself can be compared and inspected without touching pixels.
//!
//! # Example
//!
//! ```rust
//! use gallery_engine::render::{Color, DisplayItem, RenderList};
//!
//! let mut list = RenderList::new();
//!
//! // Clear background
//! list.add_command(DisplayItem::Clear { color: Color::from_u8(0, 0, 0, 255) });
//!
//! // Draw a white rectangle
//! list.add_command(DisplayItem::Rect {
//!     x: 10.0,
//!     y: 20.0,
//!     w: 100.0,
//!     h: 50.0,
//!     color: Color::from_u8(255, 255, 255, 255),
//! });
//! assert_eq!(list.items.len(), 2);
//! ```

/// RGBA color used for drawing commands.
///
/// Channels are represented as `f32` in the range `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel (opacity)
    pub a: f32,
}

impl Color {
    /// Creates a new color from `f32` channel values in the range `0.0 ..= 1.0`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Creates an opaque color from a `0xRRGGBB` value.
    pub fn from_rgb_hex(hex: u32) -> Color {
        Color {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Channels as `u8` values (0–255), in RGBA order.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Horizontal anchoring of a text run relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

/// A single display item representing a drawing command.
///
/// These commands are appended to a [`RenderList`] and later processed
/// by the render backend.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    /// Clear the entire surface with the given color.
    Clear {
        /// The color to clear the surface with.
        color: Color,
    },

    /// Draw a filled rectangle at `(x, y)` with width `w` and height `h`.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },

    /// Stroke the outline of a rectangle. The stroke is centred on the outline.
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        line_width: f32,
        color: Color,
    },

    /// Stroke a straight line from `(x0, y0)` to `(x1, y1)`.
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        line_width: f32,
        color: Color,
    },

    /// Draw a text run anchored at `(x, y)` with font size `size`.
    TextRun {
        x: f32,
        y: f32,
        /// The text to render.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Font family name, e.g. `monospace`.
        family: String,
        align: TextAlign,
        color: Color,
    },
}

/// A list of display items to be rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderList {
    /// Sequence of drawing commands to execute.
    pub items: Vec<DisplayItem>,
}

impl RenderList {
    /// Creates a new, empty render list.
    pub fn new() -> Self {
        RenderList { items: Vec::new() }
    }

    /// Adds a new display item (drawing command) to the list.
    pub fn add_command(&mut self, command: DisplayItem) {
        self.items.push(command);
    }

    /// Clears all display items from the list.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// All text carried by the list, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                DisplayItem::TextRun { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_round_trip_to_bytes() {
        assert_eq!(Color::from_rgb_hex(0x00aaff).to_rgba8(), [0x00, 0xaa, 0xff, 0xff]);
        assert_eq!(Color::from_u8(1, 2, 3, 4).to_rgba8(), [1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(Color::new(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn texts_collects_runs_in_order() {
        let mut list = RenderList::new();
        list.add_command(DisplayItem::Clear { color: Color::from_rgb_hex(0) });
        for t in ["one", "two"] {
            list.add_command(DisplayItem::TextRun {
                x: 0.0,
                y: 0.0,
                text: t.into(),
                size: 12.0,
                family: "monospace".into(),
                align: TextAlign::Start,
                color: Color::from_rgb_hex(0xffffff),
            });
        }
        assert_eq!(list.texts(), vec!["one", "two"]);

        list.clear();
        assert!(list.items.is_empty());
    }
}
