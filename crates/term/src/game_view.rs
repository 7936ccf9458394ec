//! GameView: maps a [`Game`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Game, GameStatus};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Point};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Number of upcoming kinds listed in the side panel
const PREVIEW_LEN: usize = 3;

/// Widest accepted grid cell, in terminal columns
pub const MAX_CELL_W: u16 = 8;

/// Terminal layout for one game
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell compensates for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    /// `cell_w` is clamped to `1..=MAX_CELL_W`.
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, MAX_CELL_W),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, game: &Game, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let grid = game.grid();
        let cols = grid.width() as u16;
        let rows = grid.height() as u16;
        let frame_w = cols.saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = rows.saturating_add(2);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let empty = CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        for y in 0..rows {
            for x in 0..cols {
                self.fill_cell(fb, start_x, start_y, x, y, '·', empty);
            }
        }
        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        for (p, kind) in grid.cells() {
            self.draw_piece_cell(fb, start_x, start_y, p, kind);
        }

        if let Some(piece) = game.active() {
            if let Some(ghost) = game.ghost() {
                let style = CellStyle::new(Rgb::new(140, 140, 140), PLAYFIELD_BG).dim();
                for p in ghost {
                    self.fill_cell(fb, start_x, start_y, p.x as u16, p.y as u16, '░', style);
                }
            }
            for p in piece.coordinates() {
                self.draw_piece_cell(fb, start_x, start_y, p, piece.kind());
            }
        }

        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        self.draw_side_panel(fb, game, viewport, panel_x, start_y);

        let overlay = match game.status() {
            GameStatus::Idle => Some("PRESS R"),
            GameStatus::Paused => Some("PAUSED"),
            GameStatus::Ended => Some("GAME OVER"),
            GameStatus::Running => None,
        };
        if let Some(text) = overlay {
            let text_w = text.chars().count() as u16;
            let x = start_x + frame_w.saturating_sub(text_w) / 2;
            let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
            fb.put_str(x, start_y + frame_h / 2, text, style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &Game, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_piece_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, p: Point, kind: PieceKind) {
        if p.x < 0 || p.y < 0 {
            return;
        }
        let style = CellStyle::new(kind_color(kind), PLAYFIELD_BG).bold();
        self.fill_cell(fb, start_x, start_y, p.x as u16, p.y as u16, '█', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x
            .saturating_add(1)
            .saturating_add(cell_x.saturating_mul(self.cell_w));
        let py = start_y.saturating_add(1).saturating_add(cell_y);
        fb.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, game: &Game, viewport: Viewport, x: u16, y: u16) {
        if x.saturating_add(8) > viewport.width {
            return;
        }
        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.put_str(x, y, "LEVEL", label);
        fb.put_u32(x, y + 1, game.level(), value);
        fb.put_str(x, y + 3, "LINES", label);
        fb.put_u32(x, y + 4, game.lines(), value);
        fb.put_str(x, y + 6, "NEXT", label);
        for (i, kind) in game.upcoming().take(PREVIEW_LEN).enumerate() {
            let style = CellStyle::new(kind_color(kind), PANEL_BG);
            fb.put_str(x, y + 7 + i as u16, kind_letter(kind), style);
        }

        let below = y + 8 + PREVIEW_LEN as u16;
        fb.put_str(x, below, "SCORE", label);
        fb.put_u32(x, below + 1, game.score(), value);
        fb.put_str(x, below + 3, "TIME", label);
        fb.put_str(x, below + 4, &format_play_time(game.play_time_ms()), value);
    }
}

/// `m:ss` from milliseconds
fn format_play_time(ms: u32) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn kind_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}

fn kind_letter(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::I => "I",
        PieceKind::O => "O",
        PieceKind::J => "J",
        PieceKind::L => "L",
        PieceKind::S => "S",
        PieceKind::T => "T",
        PieceKind::Z => "Z",
    }
}
