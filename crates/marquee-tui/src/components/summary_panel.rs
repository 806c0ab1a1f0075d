//! SummaryPanel component — live price summary + the book control.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_BOOKABLE, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::pane_chrome_borders,
};

pub struct SummaryPanel {
    pub borders: Borders,
}

impl SummaryPanel {
    pub fn new() -> Self {
        Self {
            borders: Borders::ALL,
        }
    }
}

fn row<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{:<7}", label), Style::default().fg(C_MUTED)),
        value,
    ])
}

impl Component for SummaryPanel {
    fn id(&self) -> ComponentId {
        ComponentId::SummaryPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let _ = state;
        match key.code {
            KeyCode::Enter => vec![Action::Book],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        // A click on the panel books when bookable, mirroring the original
        // widget's book button.
        if matches!(
            event.kind,
            MouseEventKind::Down(ratatui::crossterm::event::MouseButton::Left)
        ) && state.view.summary.bookable
        {
            return vec![Action::Book];
        }
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome_borders("booking", Some('4'), focused, None, self.borders);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let summary = &state.view.summary;
        let layout = state.view.layout;

        let seats_value = if summary.seats.is_empty() {
            Span::styled("none", Style::default().fg(C_MUTED))
        } else {
            let labels: Vec<String> = summary
                .seats
                .iter()
                .map(|&s| layout.seat_label(s))
                .collect();
            Span::styled(labels.join(" "), Style::default().fg(C_PRIMARY))
        };

        let mut lines = vec![
            row("seats", seats_value),
            row(
                "count",
                Span::styled(summary.count.to_string(), Style::default().fg(C_PRIMARY)),
            ),
            row(
                "total",
                Span::styled(
                    summary.total_display(),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ),
            ),
            Line::from(""),
        ];

        if summary.bookable {
            lines.push(Line::from(Span::styled(
                " b to book",
                Style::default().fg(C_BOOKABLE).add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                " pick seats to book",
                Style::default().fg(C_SECONDARY),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
