//! SeatGrid component — the hall seat map.
//!
//! Renders the screen marker, row labels, and one glyph per seat, with a
//! center aisle splitting each row. The grid is centered in the pane and every
//! cell position is computed by the same helpers the mouse hit-test uses, so
//! a click always lands on the seat it drew.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};

use marquee_core::booking::SeatState;
use marquee_core::layout::{HallLayout, SeatIndex};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_BADGE_FULL, C_MUTED, C_NUMBER_HINT, C_SCREEN, C_SEAT_FREE, C_SEAT_OCCUPIED,
        C_SEAT_SELECTED, C_SECONDARY, C_SELECTION_BG,
    },
    widgets::pane_chrome::{pane_chrome_borders, Badge},
};

/// Width of the row-label gutter ("A ").
const LABEL_W: u16 = 2;
/// Width of one seat cell: glyph + padding.
const CELL_W: u16 = 3;
/// Extra gap splitting each row into two blocks.
const AISLE_W: u16 = 2;
/// Rows rendered above the first seat row (screen marker + spacer).
const HEADER_ROWS: u16 = 2;

/// X offset of a seat cell from the grid origin (gutter included).
fn cell_x(layout: &HallLayout, col: u8) -> u16 {
    let aisle = if aisle_after(layout).is_some_and(|a| col >= a) {
        AISLE_W
    } else {
        0
    };
    LABEL_W + col as u16 * CELL_W + aisle
}

/// First column of the right seat block, if the row is wide enough to split.
fn aisle_after(layout: &HallLayout) -> Option<u8> {
    (layout.seats_per_row >= 4).then_some(layout.seats_per_row / 2)
}

fn grid_width(layout: &HallLayout) -> u16 {
    cell_x(layout, layout.seats_per_row - 1) + CELL_W
}

/// Top-left corner of the centered grid within `inner`.
fn grid_origin(layout: &HallLayout, inner: Rect) -> (u16, u16) {
    let x0 = inner.x + inner.width.saturating_sub(grid_width(layout)) / 2;
    (x0, inner.y + HEADER_ROWS)
}

/// Map an absolute (col, row) terminal position to the seat drawn there.
fn seat_hit(layout: &HallLayout, inner: Rect, col: u16, row: u16) -> Option<SeatIndex> {
    if col >= inner.x + inner.width || row >= inner.y + inner.height {
        return None;
    }
    let (x0, y0) = grid_origin(layout, inner);
    if row < y0 || col < x0 {
        return None;
    }
    let grid_row = row - y0;
    if grid_row >= layout.rows as u16 {
        return None;
    }
    let rel = col - x0;
    for c in 0..layout.seats_per_row {
        let cx = cell_x(layout, c);
        if rel >= cx && rel < cx + CELL_W {
            return layout.seat_at(grid_row as u8, c);
        }
    }
    None
}

pub struct SeatGrid {
    /// Seat the keyboard cursor is on (1-based, always within the grid).
    pub cursor: SeatIndex,
    pub borders: Borders,
}

impl SeatGrid {
    pub fn new() -> Self {
        Self {
            cursor: 1,
            borders: Borders::ALL,
        }
    }

    fn move_cursor(&mut self, layout: &HallLayout, d_row: i16, d_col: i16) {
        let Some((row, col)) = layout.position(self.cursor) else {
            self.cursor = 1;
            return;
        };
        let new_row = (row as i16 + d_row).clamp(0, layout.rows as i16 - 1) as u8;
        let new_col = (col as i16 + d_col).clamp(0, layout.seats_per_row as i16 - 1) as u8;
        if let Some(seat) = layout.seat_at(new_row, new_col) {
            self.cursor = seat;
        }
    }

    fn seat_glyph(state: SeatState) -> (&'static str, ratatui::style::Color) {
        match state {
            SeatState::Available => ("□", C_SEAT_FREE),
            SeatState::Selected => ("■", C_SEAT_SELECTED),
            SeatState::Occupied => ("✗", C_SEAT_OCCUPIED),
        }
    }
}

impl Component for SeatGrid {
    fn id(&self) -> ComponentId {
        ComponentId::SeatGrid
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let layout = state.view.layout;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(&layout, -1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(&layout, 1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(&layout, 0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(&layout, 0, 1),
            KeyCode::Home => self.move_cursor(&layout, 0, -(layout.seats_per_row as i16)),
            KeyCode::End => self.move_cursor(&layout, 0, layout.seats_per_row as i16),
            KeyCode::Char('g') => self.cursor = 1,
            KeyCode::Char('G') => self.cursor = layout.total(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return vec![Action::ToggleSeat(self.cursor)];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        if !matches!(
            event.kind,
            MouseEventKind::Down(ratatui::crossterm::event::MouseButton::Left)
        ) {
            return vec![];
        }
        // Full borders on this pane; shrink to the drawable interior.
        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };
        if let Some(seat) = seat_hit(&state.view.layout, inner, event.column, event.row) {
            self.cursor = seat;
            return vec![Action::ToggleSeat(seat)];
        }
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let layout = state.view.layout;
        let full = state.current_showtime_info().is_some_and(|s| s.full);
        let badge = full.then_some(Badge {
            text: "FULL",
            color: C_BADGE_FULL,
        });

        let block = pane_chrome_borders("seats", Some('2'), focused, badge, self.borders);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.view.seats.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no showtime scheduled",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let (x0, y0) = grid_origin(&layout, inner);
        let gw = grid_width(&layout).min(inner.width);
        let seats_w = gw.saturating_sub(LABEL_W) as usize;

        // Screen marker across the seat columns.
        if inner.height > 0 && seats_w >= 8 {
            let text = " screen ";
            let fill = seats_w.saturating_sub(text.len());
            let marker = format!(
                "{}{}{}",
                "▁".repeat(fill / 2),
                text,
                "▁".repeat(fill - fill / 2)
            );
            frame.render_widget(
                Paragraph::new(Span::styled(marker, Style::default().fg(C_SCREEN))),
                Rect {
                    x: x0 + LABEL_W,
                    y: inner.y,
                    width: seats_w as u16,
                    height: 1,
                },
            );
        }

        // Seat rows.
        for row in 0..layout.rows {
            let y = y0 + row as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let mut spans: Vec<Span> = vec![Span::styled(
                format!("{} ", layout.row_label(row)),
                Style::default().fg(C_NUMBER_HINT),
            )];
            for col in 0..layout.seats_per_row {
                if aisle_after(&layout) == Some(col) && col > 0 {
                    spans.push(Span::raw(" ".repeat(AISLE_W as usize)));
                }
                let seat = match layout.seat_at(row, col) {
                    Some(s) => s,
                    None => continue,
                };
                let seat_state = state
                    .view
                    .seat_state(seat)
                    .unwrap_or(SeatState::Available);
                let (glyph, color) = Self::seat_glyph(seat_state);
                let mut style = Style::default().fg(color);
                if focused && seat == self.cursor {
                    style = style.bg(C_SELECTION_BG).add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(glyph, style));
                spans.push(Span::raw("  "));
            }
            frame.render_widget(
                Paragraph::new(Line::from(spans)),
                Rect {
                    x: x0,
                    y,
                    width: gw,
                    height: 1,
                },
            );
        }

        // Status line: cursor seat + availability counts.
        let status_y = y0 + layout.rows as u16 + 1;
        if status_y < inner.y + inner.height {
            let cursor_state = state.view.seat_state(self.cursor);
            let state_word = match cursor_state {
                Some(SeatState::Available) => "free",
                Some(SeatState::Selected) => "chosen",
                Some(SeatState::Occupied) => "taken",
                None => "?",
            };
            let free = state.current_showtime_info().map(|s| s.free).unwrap_or(0);
            let status = format!(
                "{} {}  ·  {} free  ·  {} chosen",
                layout.seat_label(self.cursor),
                state_word,
                free,
                state.view.summary.count
            );
            frame.render_widget(
                Paragraph::new(Span::styled(status, Style::default().fg(C_SECONDARY))).centered(),
                Rect {
                    x: inner.x,
                    y: status_y,
                    width: inner.width,
                    height: 1,
                },
            );
        }

        // Legend pinned to the last row of the pane.
        let legend_y = inner.y + inner.height.saturating_sub(1);
        if legend_y > status_y {
            let legend = Line::from(vec![
                Span::styled("□ ", Style::default().fg(C_SEAT_FREE)),
                Span::styled("free   ", Style::default().fg(C_MUTED)),
                Span::styled("■ ", Style::default().fg(C_SEAT_SELECTED)),
                Span::styled("chosen   ", Style::default().fg(C_MUTED)),
                Span::styled("✗ ", Style::default().fg(C_SEAT_OCCUPIED)),
                Span::styled("taken", Style::default().fg(C_MUTED)),
            ]);
            frame.render_widget(
                Paragraph::new(legend).centered(),
                Rect {
                    x: inner.x,
                    y: legend_y,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall() -> HallLayout {
        HallLayout::new(4, 8)
    }

    #[test]
    fn test_grid_width_includes_gutter_and_aisle() {
        // 2 gutter + 8 cells * 3 + 2 aisle = 28
        assert_eq!(grid_width(&hall()), 28);
        // Narrow row (< 4 seats) gets no aisle: 2 + 3 * 3 = 11
        assert_eq!(grid_width(&HallLayout::new(2, 3)), 11);
    }

    #[test]
    fn test_hit_round_trips_every_seat() {
        let layout = hall();
        let inner = Rect::new(0, 0, 40, 12);
        let (x0, y0) = grid_origin(&layout, inner);
        for seat in 1..=layout.total() {
            let (row, col) = layout.position(seat).unwrap();
            let x = x0 + cell_x(&layout, col);
            let y = y0 + row as u16;
            assert_eq!(seat_hit(&layout, inner, x, y), Some(seat));
            // Padding to the right of the glyph still belongs to the cell.
            assert_eq!(seat_hit(&layout, inner, x + CELL_W - 1, y), Some(seat));
        }
    }

    #[test]
    fn test_hit_misses_gutter_aisle_and_margins() {
        let layout = hall();
        let inner = Rect::new(0, 0, 40, 12);
        let (x0, y0) = grid_origin(&layout, inner);

        // Row-label gutter.
        assert_eq!(seat_hit(&layout, inner, x0, y0), None);
        // Aisle gap between columns 3 and 4.
        let gap_x = x0 + LABEL_W + 4 * CELL_W;
        assert_eq!(seat_hit(&layout, inner, gap_x, y0), None);
        // Above the grid (screen marker) and below the last row.
        assert_eq!(seat_hit(&layout, inner, x0 + LABEL_W, y0 - 1), None);
        assert_eq!(
            seat_hit(&layout, inner, x0 + LABEL_W, y0 + layout.rows as u16),
            None
        );
        // Outside the pane entirely.
        assert_eq!(seat_hit(&layout, inner, 100, y0), None);
    }

    #[test]
    fn test_cursor_clamps_at_edges() {
        let layout = hall();
        let mut grid = SeatGrid::new();
        grid.move_cursor(&layout, -1, -1);
        assert_eq!(grid.cursor, 1);
        grid.cursor = layout.total();
        grid.move_cursor(&layout, 1, 1);
        assert_eq!(grid.cursor, layout.total());
    }

    #[test]
    fn test_cursor_moves_row_major() {
        let layout = hall();
        let mut grid = SeatGrid::new();
        grid.move_cursor(&layout, 0, 1);
        assert_eq!(grid.cursor, 2);
        grid.move_cursor(&layout, 1, 0);
        assert_eq!(grid.cursor, 10);
        grid.move_cursor(&layout, 0, layout.seats_per_row as i16);
        assert_eq!(grid.cursor, 16); // End of row B
    }
}
