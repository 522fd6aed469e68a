//! Horizontally scrolling strip of featured works.
//!
//! One fixed-width card per exhibit, followed by a call-to-action card linking to the full
//! portfolio. Scrolling snaps so that a card's centre lines up with the viewport centre.

use crate::exhibit::{Exhibit, Exhibits};

pub const CARD_WIDTH: f32 = 350.0;
pub const CARD_GAP: f32 = 32.0;
pub const LEADING_PADDING: f32 = 16.0;

pub const CTA_TITLE: &str = "Discover More Artwork";
pub const CTA_BODY: &str = "Explore the complete collection in the portfolio section.";
pub const CTA_LABEL: &str = "View Full Portfolio";

/// A card in the strip.
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselCard<'a> {
    Work(&'a Exhibit),
    CallToAction { href: &'a str },
}

impl CarouselCard<'_> {
    /// Link followed when the card is activated.
    pub fn href(&self) -> String {
        match self {
            CarouselCard::Work(exhibit) => format!("/portfolio/{}", exhibit.id),
            CarouselCard::CallToAction { href } => href.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Carousel {
    exhibits: Exhibits,
    /// Visible width in pixels.
    width: u32,
    portfolio_href: String,
    scroll: f32,
}

impl Carousel {
    pub fn new(exhibits: Exhibits, width: u32, portfolio_href: impl Into<String>) -> Self {
        Self {
            exhibits,
            width,
            portfolio_href: portfolio_href.into(),
            scroll: 0.0,
        }
    }

    /// Number of cards, call to action included.
    pub fn len(&self) -> usize {
        self.exhibits.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn card(&self, index: usize) -> Option<CarouselCard<'_>> {
        match index.cmp(&self.exhibits.len()) {
            std::cmp::Ordering::Less => Some(CarouselCard::Work(&self.exhibits[index])),
            std::cmp::Ordering::Equal => Some(CarouselCard::CallToAction { href: &self.portfolio_href }),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = CarouselCard<'_>> {
        (0..self.len()).filter_map(|i| self.card(i))
    }

    pub fn content_width(&self) -> f32 {
        let n = self.len() as f32;
        LEADING_PADDING + n * CARD_WIDTH + (n - 1.0) * CARD_GAP
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_width() - self.width as f32).max(0.0)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Scrolls to `offset`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll = if offset.is_finite() { offset.clamp(0.0, self.max_scroll()) } else { 0.0 };
    }

    /// Scroll progress in `0.0..=1.0`; `0.0` when the strip fits the viewport.
    pub fn progress(&self) -> f32 {
        let max = self.max_scroll();
        if max == 0.0 {
            0.0
        } else {
            self.scroll / max
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Changes the visible width, keeping the scroll offset in range.
    pub fn resize(&mut self, width: u32) {
        self.width = width;
        self.scroll_to(self.scroll);
    }

    fn card_centre(index: usize) -> f32 {
        LEADING_PADDING + index as f32 * (CARD_WIDTH + CARD_GAP) + CARD_WIDTH / 2.0
    }

    /// Card whose centre is nearest the viewport centre.
    pub fn snap_index(&self) -> usize {
        let centre = self.scroll + self.width as f32 / 2.0;
        (0..self.len())
            .min_by(|a, b| {
                let da = (Self::card_centre(*a) - centre).abs();
                let db = (Self::card_centre(*b) - centre).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0)
    }

    /// Scroll offset that centres card `index`, clamped to the scrollable range.
    pub fn snap_offset(&self, index: usize) -> f32 {
        let index = index.min(self.len() - 1);
        (Self::card_centre(index) - self.width as f32 / 2.0).clamp(0.0, self.max_scroll())
    }

    /// Snaps to the nearest card.
    pub fn snap(&mut self) -> usize {
        let index = self.snap_index();
        self.scroll = self.snap_offset(index);
        index
    }

    /// Snaps to the card after the current one.
    pub fn next(&mut self) -> usize {
        let index = (self.snap_index() + 1).min(self.len() - 1);
        self.scroll = self.snap_offset(index);
        index
    }

    /// Snaps to the card before the current one.
    pub fn prev(&mut self) -> usize {
        let index = self.snap_index().saturating_sub(1);
        self.scroll = self.snap_offset(index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn works(n: u64) -> Exhibits {
        Exhibits::new((1..=n).map(|i| Exhibit::new(i, format!("Work {i}"))).collect()).unwrap()
    }

    fn carousel(n: u64, width: u32) -> Carousel {
        Carousel::new(works(n), width, "/portfolio")
    }

    #[test]
    fn geometry() {
        let c = carousel(3, 800);
        // 16 + 4 * 350 + 3 * 32
        assert_eq!(c.content_width(), 1512.0);
        assert_eq!(c.max_scroll(), 712.0);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn cards_end_with_call_to_action() {
        let c = carousel(2, 800);
        assert_eq!(c.card(0).unwrap().href(), "/portfolio/1");
        assert_eq!(c.card(2), Some(CarouselCard::CallToAction { href: "/portfolio" }));
        assert_eq!(c.card(3), None);
        assert_eq!(c.cards().count(), 3);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut c = carousel(3, 800);
        c.scroll_to(-50.0);
        assert_eq!(c.scroll(), 0.0);
        c.scroll_to(10_000.0);
        assert_eq!(c.scroll(), 712.0);
        assert_eq!(c.progress(), 1.0);
        c.scroll_to(f32::NAN);
        assert_eq!(c.scroll(), 0.0);
    }

    #[test]
    fn no_progress_when_everything_fits() {
        let mut c = carousel(0, 800);
        assert_eq!(c.max_scroll(), 0.0);
        c.scroll_to(100.0);
        assert_eq!(c.progress(), 0.0);
        assert_eq!(c.next(), 0);
    }

    #[test]
    fn next_and_prev_snap_card_by_card() {
        let mut c = carousel(5, 400);
        assert_eq!(c.snap_index(), 0);
        assert_eq!(c.next(), 1);
        // centre of card 1 is 16 + 382 + 175 = 573
        assert_eq!(c.scroll(), 373.0);
        assert_eq!(c.next(), 2);
        assert_eq!(c.prev(), 1);
        assert_eq!(c.prev(), 0);
        assert_eq!(c.prev(), 0);
        assert_eq!(c.scroll(), 0.0);

        for _ in 0..10 {
            c.next();
        }
        assert_eq!(c.snap_index(), 5);
        assert_eq!(c.scroll(), c.max_scroll());
    }

    #[test]
    fn resize_keeps_scroll_in_range() {
        let mut c = carousel(3, 800);
        c.scroll_to(700.0);
        c.resize(1600);
        assert_eq!(c.width(), 1600);
        assert_eq!(c.scroll(), 0.0);

        c.resize(400);
        c.scroll_to(10_000.0);
        assert_eq!(c.scroll(), c.max_scroll());
    }
}
