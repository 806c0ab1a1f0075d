//! Header component — two-row strip with the app name and current selection.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use marquee_core::catalog::format_cents;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_PRICE, C_PRIMARY, C_SECONDARY},
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

/// Truncate to `max` columns, appending "…" when cut.
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        if out.width() + 2 > max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::MovieList
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let max_title = area.width.saturating_sub(24) as usize;
        let mut top = vec![Span::styled(
            " marquee ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )];
        if let Some(movie) = state.current_movie() {
            top.push(Span::styled("· ", Style::default().fg(C_MUTED)));
            top.push(Span::styled(
                truncate_to_width(&movie.title, max_title),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ));
            top.push(Span::raw("  "));
            top.push(Span::styled(
                format!("{} per seat", format_cents(movie.price_cents)),
                Style::default().fg(C_PRICE),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(top)),
            Rect { height: 1, ..area },
        );

        if area.height < 2 {
            return;
        }
        let mut bottom: Vec<Span> = Vec::new();
        match state.current_showtime_info() {
            Some(show) => {
                bottom.push(Span::styled(
                    format!(" {} ", show.starts_at.format("%H:%M")),
                    Style::default().fg(C_SECONDARY),
                ));
                bottom.push(Span::styled(
                    format!("· {} free ", show.free),
                    Style::default().fg(C_MUTED),
                ));
                let summary = &state.view.summary;
                if summary.bookable {
                    bottom.push(Span::styled(
                        format!(
                            "· {} seat{} · {}",
                            summary.count,
                            if summary.count == 1 { "" } else { "s" },
                            summary.total_display()
                        ),
                        Style::default().fg(C_PRIMARY),
                    ));
                }
            }
            None => {
                bottom.push(Span::styled(
                    " no showtime scheduled",
                    Style::default().fg(C_MUTED),
                ));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(bottom)),
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a longer title", 8), "a longe…");
        assert!(truncate_to_width("a longer title", 8).width() <= 8);
    }
}
