/// Abstract 2D drawing surface plus the pixel ↔ cell mapping.
///
/// Scenes are written against `Canvas` in logical playfield pixels.
/// The terminal renderer is one implementation; tests use a recorder.
///
/// `Viewport` maps the logical playfield onto a `cols x rows` character
/// grid (stretching to fill) and back, so mouse cells become pixels.

use crate::domain::character::Rgb;
use crate::domain::physics::{Playfield, Point, Rect};
use super::asset::Sprite;

/// Text size classes. Terminal text is one row tall; the large tiers
/// are letter-spaced so they still stand out.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FontTier {
    Small,
    Normal,
    Title,
    Huge,
}

impl FontTier {
    pub fn is_spaced(self) -> bool {
        matches!(self, FontTier::Title | FontTier::Huge)
    }
}

/// Text as it will be laid out for `tier`.
pub fn layout_text(text: &str, tier: FontTier) -> String {
    if !tier.is_spaced() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() * 2);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 { out.push(' '); }
        out.push(ch);
    }
    out
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RectStyle {
    /// Corner rounding in pixels; 0 = square.
    pub radius: f32,
    /// `Some(weight)` draws only the outline.
    pub border: Option<u32>,
}

impl RectStyle {
    pub fn rounded(radius: f32) -> Self {
        RectStyle { radius, border: None }
    }

    pub fn outline(weight: u32, radius: f32) -> Self {
        RectStyle { radius, border: Some(weight) }
    }
}

pub trait Canvas {
    fn fill(&mut self, color: Rgb);
    fn rect(&mut self, rect: Rect, color: Rgb, style: RectStyle);
    /// `border: Some(weight)` draws only the ring.
    fn circle(&mut self, center: Point, radius: f32, color: Rgb, border: Option<u32>);
    fn image(&mut self, sprite: &Sprite, pos: Point);
    fn text(&mut self, text: &str, tier: FontTier, color: Rgb, pos: Point);
    /// Width and height `text` would occupy, in pixels.
    fn measure(&self, text: &str, tier: FontTier) -> (f32, f32);
}

// ══════════════════════════════════════════════════════════════
// Viewport
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub cols: usize,
    pub rows: usize,
    field: Playfield,
}

impl Viewport {
    /// Zero dimensions are bumped to 1 so the scale is always finite.
    pub fn new(cols: usize, rows: usize, field: Playfield) -> Self {
        Viewport { cols: cols.max(1), rows: rows.max(1), field }
    }

    pub fn px_per_col(&self) -> f32 {
        self.field.width / self.cols as f32
    }

    pub fn px_per_row(&self) -> f32 {
        self.field.height / self.rows as f32
    }

    /// Cell containing `p` (may be outside the grid).
    pub fn to_cell(&self, p: Point) -> (i32, i32) {
        (
            (p.x / self.px_per_col()).floor() as i32,
            (p.y / self.px_per_row()).floor() as i32,
        )
    }

    /// Pixel at the centre of a cell.
    pub fn to_point(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f32 + 0.5) * self.px_per_col(),
            (row as f32 + 0.5) * self.px_per_row(),
        )
    }

    /// Grid cells whose centres fall inside `rect`, clipped to the grid,
    /// as half-open `(col0, row0, col1, row1)`. Any non-empty rect gets
    /// at least the cell under its centre.
    pub fn cells_in(&self, rect: &Rect) -> Option<(usize, usize, usize, usize)> {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return None;
        }
        let (pc, pr) = (self.px_per_col(), self.px_per_row());
        let mut c0 = (rect.left() / pc - 0.5).ceil() as i64;
        let mut c1 = (rect.right() / pc - 0.5).ceil() as i64;
        let mut r0 = (rect.top() / pr - 0.5).ceil() as i64;
        let mut r1 = (rect.bottom() / pr - 0.5).ceil() as i64;
        if c1 <= c0 {
            c0 = (rect.center().x / pc).floor() as i64;
            c1 = c0 + 1;
        }
        if r1 <= r0 {
            r0 = (rect.center().y / pr).floor() as i64;
            r1 = r0 + 1;
        }
        let c0 = c0.clamp(0, self.cols as i64) as usize;
        let c1 = c1.clamp(0, self.cols as i64) as usize;
        let r0 = r0.clamp(0, self.rows as i64) as usize;
        let r1 = r1.clamp(0, self.rows as i64) as usize;
        if c0 >= c1 || r0 >= r1 {
            None
        } else {
            Some((c0, r0, c1, r1))
        }
    }
}
