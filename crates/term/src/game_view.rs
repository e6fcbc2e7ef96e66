//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{SessionPhase, SessionSnapshot, TileView};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::popups::PopupLayer;
use crate::types::{Direction, EndReason, GridPos, PixelPos, SessionResult, CELL_PX, GRID_SIZE};

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

/// Score submission state shown in the side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitView {
    Off,
    Pending,
    Sent,
    Failed,
}

impl SubmitView {
    fn label(&self) -> &'static str {
        match self {
            SubmitView::Off => "OFF",
            SubmitView::Pending => "...",
            SubmitView::Sent => "SENT",
            SubmitView::Failed => "FAILED",
        }
    }
}

/// End-of-session details owned by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    /// 1-based position in the record table
    pub rank: Option<usize>,
    pub submit: SubmitView,
}

/// Per-frame inputs that are not part of the session
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameExtras<'a> {
    pub cursor: Option<GridPos>,
    pub popups: Option<&'a PopupLayer>,
    pub status: Option<&'a StatusView>,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);

/// A lightweight terminal renderer for the board and its side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 4x2 keeps cells roughly square with typical glyph aspect ratios.
        Self {
            cell_w: 4,
            cell_h: 2,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Outer size of the framed board in terminal cells
    pub fn frame_size(&self) -> (u16, u16) {
        (
            GRID_SIZE as u16 * self.cell_w + 2,
            GRID_SIZE as u16 * self.cell_h + 2,
        )
    }

    /// Top-left of the framed board within `viewport`
    pub fn frame_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size();
        (
            viewport.width.saturating_sub(frame_w) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    /// Terminal position of a pixel coordinate, relative to the board interior
    pub fn pixel_to_term(&self, pixel: PixelPos) -> (u16, u16) {
        let x = (pixel.x / CELL_PX * self.cell_w as f32).round().max(0.0);
        let y = (pixel.y / CELL_PX * self.cell_h as f32).round().max(0.0);
        (x as u16, y as u16)
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with(snap, &FrameExtras::default(), viewport, fb);
    }

    pub fn render_into_with(
        &self,
        snap: &SessionSnapshot,
        extras: &FrameExtras<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let (start_x, start_y) = self.frame_origin(viewport);
        let (ix, iy) = (start_x + 1, start_y + 1);

        fb.fill_rect(
            ix,
            iy,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        fb.draw_box(
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK),
        );

        // Empty-cell dots first so tiles in flight cover them.
        let dot = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if snap.grid[row as usize][col as usize] == 0 {
                    let (x, y) = self.pixel_to_term(GridPos::new(row as i8, col as i8).to_pixel());
                    fb.put_char(ix + x + self.cell_w / 2, iy + y + (self.cell_h - 1) / 2, '·', dot);
                }
            }
        }

        // Resting tiles, then sliders on top.
        for tile in snap.tiles.iter().filter(|t| !t.moving) {
            self.draw_tile(fb, ix, iy, tile);
        }
        for tile in snap.tiles.iter().filter(|t| t.moving) {
            self.draw_tile(fb, ix, iy, tile);
        }

        let arrow = CellStyle::new(Rgb::new(250, 220, 90), BOARD_BG).bold();
        for marker in &snap.markers {
            let (x, y) = self.pixel_to_term(marker.anchor.to_pixel());
            fb.put_char(
                ix + x + self.cell_w / 2,
                iy + y + (self.cell_h - 1) / 2,
                arrow_glyph(marker.direction),
                arrow,
            );
        }

        if let Some(cursor) = extras.cursor.filter(|c| c.in_bounds()) {
            self.draw_cursor(fb, ix, iy, cursor);
        }

        if let Some(popups) = extras.popups {
            self.draw_popups(fb, ix, iy, popups);
        }

        self.draw_side_panel(fb, snap, extras.status, viewport, start_x + frame_w + 2, start_y);

        match snap.phase {
            SessionPhase::Initializing => {
                self.draw_overlay(fb, start_x, start_y, frame_w, frame_h, "READY", None)
            }
            SessionPhase::Ended(reason) => {
                let result = SessionResult::from_final(snap.score, snap.remaining_secs);
                let text = match reason {
                    EndReason::Cleared => "CLEARED!",
                    EndReason::TimeExpired => "TIME UP",
                };
                self.draw_overlay(fb, start_x, start_y, frame_w, frame_h, text, Some(result));
            }
            SessionPhase::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, ix: u16, iy: u16, tile: &TileView) {
        let (x, y) = self.pixel_to_term(tile.pixel);
        let mut style = CellStyle::new(Rgb::BLACK, number_color(tile.number)).bold();
        if tile.selected {
            style = CellStyle::new(number_color(tile.number), Rgb::WHITE).bold();
        }
        fb.fill_rect(ix + x, iy + y, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(
            ix + x + self.cell_w / 2,
            iy + y + (self.cell_h - 1) / 2,
            char::from(b'0' + tile.number),
            style,
        );
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, ix: u16, iy: u16, cursor: GridPos) {
        let (x, y) = self.pixel_to_term(cursor.to_pixel());
        let row = iy + y + (self.cell_h - 1) / 2;
        let style = CellStyle::new(Rgb::WHITE, BOARD_BG).bold();
        let keep_bg = |fb: &FrameBuffer, cx: u16| {
            let bg = fb.get(cx, row).map(|c| c.style.bg).unwrap_or(BOARD_BG);
            CellStyle { bg, ..style }
        };
        let (left, right) = (ix + x, ix + x + self.cell_w - 1);
        let left_style = keep_bg(fb, left);
        let right_style = keep_bg(fb, right);
        fb.put_char(left, row, '[', left_style);
        fb.put_char(right, row, ']', right_style);
    }

    fn draw_popups(&self, fb: &mut FrameBuffer, ix: u16, iy: u16, popups: &PopupLayer) {
        for popup in popups.iter() {
            let (x, y) = self.pixel_to_term(popup.pos.to_pixel());
            let t = popups.progress(popup);
            let rise = (t * self.cell_h as f32).round() as u16;
            let base = if popup.points >= 0 {
                Rgb::new(120, 240, 120)
            } else {
                Rgb::new(240, 110, 110)
            };
            let style = CellStyle::new(base.mix(BOARD_BG, t * 0.7), BOARD_BG).bold();
            let py = (iy + y).saturating_sub(rise).max(iy);
            let sign = if popup.points >= 0 { '+' } else { '-' };
            fb.put_char(ix + x, py, sign, style);
            fb.put_u32(ix + x + 1, py, popup.points.unsigned_abs(), style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        status: Option<&StatusView>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::BLACK).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "TIME", label);
        let secs = snap.remaining_secs;
        let mut x = panel_x + fb.put_u32(panel_x, y + 1, secs / 60, value);
        x += fb.put_str(x, y + 1, ":", value);
        if secs % 60 < 10 {
            x += fb.put_str(x, y + 1, "0", value);
        }
        fb.put_u32(x, y + 1, secs % 60, value);
        y += 3;

        fb.put_str(panel_x, y, "SPAWN", label);
        let bar = CellStyle::new(Rgb::new(90, 200, 230), Rgb::BLACK);
        fb.put_bar(panel_x, y + 1, 10, snap.spawn_bar, bar);
        y += 3;

        fb.put_str(panel_x, y, "STATE", label);
        fb.put_str(panel_x, y + 1, snap.phase.as_str(), value);
        y += 3;

        if let Some(st) = status {
            fb.put_str(panel_x, y, "RANK", label);
            match st.rank {
                Some(rank) => {
                    fb.put_char(panel_x, y + 1, '#', value);
                    fb.put_u32(panel_x + 1, y + 1, rank as u32, value);
                }
                None => {
                    fb.put_str(panel_x, y + 1, "-", value);
                }
            }
            y += 3;
            fb.put_str(panel_x, y, "SUBMIT", label);
            fb.put_str(panel_x, y + 1, st.submit.label(), value);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
        result: Option<SessionResult>,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let style = CellStyle::new(Rgb::WHITE, Rgb::BLACK).bold();
        fb.put_str_centered(start_x, mid_y, frame_w, text, style);

        if let Some(result) = result {
            let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
            let width = 6 + digits(result.total);
            let x = start_x + frame_w.saturating_sub(width) / 2;
            let n = fb.put_str(x, mid_y + 1, "TOTAL ", value);
            fb.put_u32(x + n, mid_y + 1, result.total, value);
        }
    }
}

fn digits(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

fn arrow_glyph(dir: Direction) -> char {
    match dir {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Left => '◀',
        Direction::Right => '▶',
    }
}

/// Tile background for each number
pub fn number_color(number: u8) -> Rgb {
    match number {
        1 => Rgb::new(230, 90, 90),
        2 => Rgb::new(240, 160, 70),
        3 => Rgb::new(240, 220, 90),
        4 => Rgb::new(130, 210, 100),
        5 => Rgb::new(80, 200, 200),
        6 => Rgb::new(90, 140, 230),
        7 => Rgb::new(170, 110, 230),
        8 => Rgb::new(230, 110, 200),
        _ => Rgb::new(180, 180, 180),
    }
}
