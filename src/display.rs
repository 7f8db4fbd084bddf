//! Rendering layer: all terminal output lives here.
//!
//! The game works in logical window pixels (800 x 600). `PlayArea` maps that
//! window onto whatever part of the terminal is inside the border, and maps
//! mouse clicks back. No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use lane_dodger::constants::{LANE_COUNT, LANE_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use lane_dodger::entities::{Body, GameStatus, Sprite};
use lane_dodger::game::{quit_button, retry_button, Game};
use lane_dodger::geometry::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_LANE: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_BEST: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_GAME_OVER: Color = Color::Red;
const C_RETRY: Color = Color::Green;
const C_QUIT: Color = Color::Red;

const MIN_COLS: u16 = 20;
const MIN_ROWS: u16 = 10;

fn sprite_style(sprite: Sprite) -> (char, Color) {
    match sprite {
        Sprite::Player => ('█', C_PLAYER),
        Sprite::Car(1) => ('▓', Color::Red),
        Sprite::Car(2) => ('▓', Color::Yellow),
        Sprite::Car(3) => ('▓', Color::Green),
        Sprite::Car(_) => ('▓', Color::Magenta),
    }
}

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// The terminal cells inside the border that show the game window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayArea {
    pub left: u16,
    pub top: u16,
    pub cols: u16,
    pub rows: u16,
    term_cols: u16,
    term_rows: u16,
}

impl PlayArea {
    /// Layout: HUD on row 0, border rows 1 and h-2, hint on row h-1.
    pub fn new(term_cols: u16, term_rows: u16) -> Self {
        Self {
            left: 1,
            top: 2,
            cols: term_cols.saturating_sub(2).max(1),
            rows: term_rows.saturating_sub(4).max(1),
            term_cols,
            term_rows,
        }
    }

    fn too_small(&self) -> bool {
        self.term_cols < MIN_COLS || self.term_rows < MIN_ROWS
    }

    fn col_of(&self, x: i32) -> i64 {
        i64::from(self.left) + i64::from(x) * i64::from(self.cols) / i64::from(WINDOW_WIDTH)
    }

    fn row_of(&self, y: i32) -> i64 {
        i64::from(self.top) + i64::from(y) * i64::from(self.rows) / i64::from(WINDOW_HEIGHT)
    }

    /// Visible cell range `(col0, col1, row0, row1)` (end-exclusive) covered
    /// by `rect`, or `None` if it is entirely off-screen.
    fn cells_of(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = self.col_of(rect.x);
        let c1 = self.col_of(rect.right()).max(c0 + 1);
        let r0 = self.row_of(rect.y);
        let r1 = self.row_of(rect.bottom()).max(r0 + 1);

        let min_c = i64::from(self.left);
        let max_c = min_c + i64::from(self.cols);
        let min_r = i64::from(self.top);
        let max_r = min_r + i64::from(self.rows);

        let (c0, c1) = (c0.max(min_c), c1.min(max_c));
        let (r0, r1) = (r0.max(min_r), r1.min(max_r));
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some((c0 as u16, c1 as u16, r0 as u16, r1 as u16))
    }

    /// Logical window point at the centre of a terminal cell.
    pub fn to_logical(&self, col: u16, row: u16) -> (i32, i32) {
        let dc = i64::from(col) - i64::from(self.left);
        let dr = i64::from(row) - i64::from(self.top);
        let x = (dc * 2 + 1) * i64::from(WINDOW_WIDTH) / (2 * i64::from(self.cols));
        let y = (dr * 2 + 1) * i64::from(WINDOW_HEIGHT) / (2 * i64::from(self.rows));
        (x as i32, y as i32)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    area: &PlayArea,
    best_score: u32,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if area.too_small() {
        out.queue(cursor::MoveTo(0, 0))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print("Terminal too small"))?;
        out.queue(style::ResetColor)?;
        return out.flush();
    }

    draw_border(out, area)?;
    draw_lanes(out, area)?;
    draw_hud(out, area, game.score(), best_score)?;

    for obstacle in game.obstacles() {
        draw_body(out, area, obstacle.rect(), obstacle.body().sprite())?;
    }
    let player = game.player();
    draw_body(out, area, player.rect(), player.body().sprite())?;

    draw_controls_hint(out, area)?;

    if *game.status() == GameStatus::GameOver {
        draw_game_over(out, area, game.score(), best_score)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, area.term_rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & lanes ────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, area: &PlayArea) -> std::io::Result<()> {
    let w = area.term_cols as usize;
    let h = area.term_rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(area.term_cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_lanes<W: Write>(out: &mut W, area: &PlayArea) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LANE))?;
    for lane in 1..LANE_COUNT as i32 {
        let col = area.col_of(lane * LANE_WIDTH) as u16;
        for row in area.top..area.top + area.rows {
            // Dashed divider
            if row % 2 == 0 {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("┆"))?;
            }
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    area: &PlayArea,
    score: u32,
    best_score: u32,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", score)))?;

    let best = format!("Best:{:>7}", best_score);
    let bx = area.term_cols.saturating_sub(best.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BEST))?;
    out.queue(Print(best))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_body<W: Write>(
    out: &mut W,
    area: &PlayArea,
    rect: Rect,
    sprite: Sprite,
) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = area.cells_of(rect) else {
        return Ok(());
    };
    let (glyph, color) = sprite_style(sprite);
    let line: String = std::iter::repeat(glyph).take((c1 - c0) as usize).collect();

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, area: &PlayArea) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, area.term_rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Change lane   ESC / Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    area: &PlayArea,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let cx = area.left + area.cols / 2;
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_button<W: Write>(
    out: &mut W,
    area: &PlayArea,
    rect: Rect,
    label: &str,
    color: Color,
) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = area.cells_of(rect) else {
        return Ok(());
    };
    let width = (c1 - c0) as usize;
    let fill = "░".repeat(width);

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&fill))?;
    }
    let label_row = r0 + (r1 - r0) / 2;
    print_centered(out, area, label_row, &format!(" {} ", label), Color::White)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    area: &PlayArea,
    score: u32,
    best_score: u32,
) -> std::io::Result<()> {
    let title_row = area.row_of(WINDOW_HEIGHT / 3).max(i64::from(area.top)) as u16;
    print_centered(out, area, title_row, "╔════════════════════╗", C_GAME_OVER)?;
    print_centered(out, area, title_row + 1, "║    GAME  OVER      ║", C_GAME_OVER)?;
    print_centered(out, area, title_row + 2, "╚════════════════════╝", C_GAME_OVER)?;

    let score_line = if score >= best_score && score > 0 {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Final Score: {:>6}", score)
    };
    print_centered(out, area, title_row + 3, &score_line, C_HUD_SCORE)?;

    draw_button(out, area, retry_button(), "RETRY (R)", C_RETRY)?;
    draw_button(out, area, quit_button(), "QUIT (ESC)", C_QUIT)?;
    Ok(())
}
