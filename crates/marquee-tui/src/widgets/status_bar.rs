//! Status bar — bottom line with input mode, bookable indicator, and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_BOOKABLE, C_MODE_FILTER, C_MODE_NORMAL, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
        }
    }
}

/// Draw the keybindings footer bar (one row). The dot lights up green when the
/// current selection is bookable.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, bookable: bool) {
    let mut left_spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default()
            .fg(mode.color())
            .add_modifier(Modifier::BOLD),
    )];

    if mode == InputMode::Normal {
        let dot = if bookable { C_BOOKABLE } else { C_MUTED };
        left_spans.push(Span::styled(
            "●",
            Style::default().fg(dot).add_modifier(Modifier::BOLD),
        ));
        left_spans.push(Span::raw(" "));
    }

    let keys = match mode {
        InputMode::Normal => {
            " ↑↓/jk move  Enter select/toggle  b book  x clear  Tab/1-4 panes  / filter  s sort  y copy  K keys  L logs  ? help  q quit"
        }
        InputMode::Filter => " type to filter  Up/Down move  Enter keep  Esc clear+close  Tab next pane",
    };

    left_spans.push(Span::raw(" "));
    left_spans.push(Span::styled(keys, Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(left_spans)), area);
}
