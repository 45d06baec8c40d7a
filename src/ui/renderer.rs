/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. The scene draws into the `front` buffer through `TermCanvas`
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The logical playfield is stretched over the whole terminal; the
/// `Viewport` does the pixel ↔ cell conversion in both directions.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::character::Rgb;
use crate::domain::physics::{Playfield, Point, Rect};
use crate::sim::game::{GameLoop, Phase};
use super::asset::{AssetProvider, Sprite};
use super::canvas::{layout_text, Canvas, FontTier, RectStyle, Viewport};
use super::scene;

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background used for the terminal clear, so gaps between
    /// rows match the cells on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Change the background, keep glyph and foreground.
    fn paint(&mut self, x: usize, y: usize, bg: Color) {
        let cell = self.get(x, y);
        self.set(x, y, Cell { ch: ' ', fg: cell.fg, bg });
    }

    /// Put a glyph over whatever background is already there.
    fn stamp(&mut self, x: usize, y: usize, ch: char, fg: Color) {
        let cell = self.get(x, y);
        self.set(x, y, Cell { ch, fg, bg: cell.bg });
    }
}

// ══════════════════════════════════════════════════════════════
// TermCanvas: Canvas over a FrameBuffer
// ══════════════════════════════════════════════════════════════

struct TermCanvas<'a> {
    buf: &'a mut FrameBuffer,
    view: Viewport,
}

/// Box-drawing sets: [h, v, tl, tr, bl, br]
const LIGHT: [char; 6] = ['─', '│', '┌', '┐', '└', '┘'];
const ROUND: [char; 6] = ['─', '│', '╭', '╮', '╰', '╯'];
const HEAVY: [char; 6] = ['═', '║', '╔', '╗', '╚', '╝'];

/// Border weights at or above this use the double-line set.
const HEAVY_WEIGHT: u32 = 3;

impl TermCanvas<'_> {
    fn outline(&mut self, cells: (usize, usize, usize, usize), color: Color, set: &[char; 6]) {
        let (c0, r0, c1, r1) = cells;
        let (last_c, last_r) = (c1 - 1, r1 - 1);
        for row in r0..r1 {
            for col in c0..c1 {
                let edge_h = row == r0 || row == last_r;
                let edge_v = col == c0 || col == last_c;
                let ch = match (edge_h, edge_v) {
                    (false, false) => continue,
                    _ if r0 == last_r => set[0],
                    _ if c0 == last_c => set[1],
                    (true, true) => match (row == r0, col == c0) {
                        (true, true) => set[2],
                        (true, false) => set[3],
                        (false, true) => set[4],
                        (false, false) => set[5],
                    },
                    (true, false) => set[0],
                    (false, true) => set[1],
                };
                self.buf.stamp(col, row, ch, color);
            }
        }
    }
}

impl Canvas for TermCanvas<'_> {
    fn fill(&mut self, c: Rgb) {
        self.buf.cells.fill(Cell { ch: ' ', fg: Color::White, bg: color(c) });
    }

    fn rect(&mut self, rect: Rect, c: Rgb, style: RectStyle) {
        let Some(cells) = self.view.cells_in(&rect) else { return };
        let (c0, r0, c1, r1) = cells;

        if let Some(weight) = style.border {
            let set = if weight >= HEAVY_WEIGHT {
                &HEAVY
            } else if style.radius > 0.0 {
                &ROUND
            } else {
                &LIGHT
            };
            self.outline(cells, color(c), set);
            return;
        }

        // Rounded fills drop their corner cells once there is room to show it
        let round = style.radius > 0.0 && c1 - c0 >= 4 && r1 - r0 >= 3;
        for row in r0..r1 {
            for col in c0..c1 {
                let corner = (row == r0 || row == r1 - 1) && (col == c0 || col == c1 - 1);
                if round && corner {
                    continue;
                }
                self.buf.paint(col, row, color(c));
            }
        }
    }

    fn circle(&mut self, center: Point, radius: f32, c: Rgb, border: Option<u32>) {
        let bbox = Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
        let Some((c0, r0, c1, r1)) = self.view.cells_in(&bbox) else { return };
        let (pc, pr) = (self.view.px_per_col(), self.view.px_per_row());

        for row in r0..r1 {
            let inside: Vec<usize> = (c0..c1)
                .filter(|&col| {
                    let p = self.view.to_point(col as u16, row as u16);
                    let (dx, dy) = (p.x - center.x, p.y - center.y);
                    // A cell is in if any part of it could touch the disc
                    let dx = (dx.abs() - pc / 2.0).max(0.0);
                    let dy = (dy.abs() - pr / 2.0).max(0.0);
                    dx * dx + dy * dy <= radius * radius
                })
                .collect();
            let (Some(&first), Some(&last)) = (inside.first(), inside.last()) else { continue };

            match border {
                None => {
                    for &col in &inside {
                        self.buf.paint(col, row, color(c));
                    }
                }
                Some(0) => {}
                Some(_) if first == last => self.buf.stamp(first, row, 'o', color(c)),
                Some(_) => {
                    self.buf.stamp(first, row, '(', color(c));
                    self.buf.stamp(last, row, ')', color(c));
                }
            }
        }
    }

    fn image(&mut self, sprite: &Sprite, pos: Point) {
        let (w, h) = sprite.size;
        let Some((c0, r0, c1, r1)) = self.view.cells_in(&Rect::new(pos.x, pos.y, w, h)) else { return };
        for row in r0..r1 {
            for col in c0..c1 {
                let p = self.view.to_point(col as u16, row as u16);
                if let Some(ch) = sprite.sample((p.x - pos.x) / w, (p.y - pos.y) / h) {
                    self.buf.stamp(col, row, ch, color(Rgb::BLACK));
                }
            }
        }
    }

    fn text(&mut self, text: &str, tier: FontTier, c: Rgb, pos: Point) {
        let row = (pos.y / self.view.px_per_row()).round();
        if row < 0.0 {
            return;
        }
        let start = (pos.x / self.view.px_per_col()).round() as i64;
        for (i, ch) in layout_text(text, tier).chars().enumerate() {
            let col = start + i as i64;
            if col >= 0 {
                self.buf.stamp(col as usize, row as usize, ch, color(c));
            }
        }
    }

    fn measure(&self, text: &str, tier: FontTier) -> (f32, f32) {
        let cols = layout_text(text, tier).chars().count() as f32;
        (cols * self.view.px_per_col(), self.view.px_per_row())
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    field: Playfield,
    last_phase: Option<Phase>,
    /// Keyboard enhancement flags were pushed and must be popped.
    enhanced: bool,
}

impl Renderer {
    pub fn new(field: Playfield) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            field,
            last_phase: None,
            enhanced: false,
        }
    }

    /// Enter raw mode and the alternate screen, capture the mouse.
    /// Returns whether the terminal will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced = true;
        }
        log::debug!("keyboard release events: {}", self.enhanced);

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(self.enhanced)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.enhanced = false;
        }
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Current pixel ↔ cell mapping, as of the last resize check.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.term_w, self.term_h, self.field)
    }

    pub fn render(&mut self, game: &GameLoop, assets: &mut AssetProvider) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            log::debug!("terminal resized to {tw}x{th}");
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        let phase = game.phase();
        if self.last_phase != Some(phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(phase);
        }

        // Build front buffer
        self.front.clear();
        let view = self.viewport();
        let mut canvas = TermCanvas { buf: &mut self.front, view };
        scene::compose(&mut canvas, game, assets);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal's own default and leave line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
