//! ShowtimeList component — screenings of the current movie.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use marquee_core::booking::ShowtimeInfo;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_BADGE_FULL, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{pane_chrome::pane_chrome_borders, scrollable_list::ScrollableList},
};

pub struct ShowtimeList {
    pub list: ScrollableList<ShowtimeInfo>,
    list_state: ListState,
    /// Which borders to draw (for shared-border layouts).
    pub borders: Borders,
}

impl ShowtimeList {
    pub fn new() -> Self {
        Self {
            // Showtimes are few; no filter here.
            list: ScrollableList::new(|_: &ShowtimeInfo, _: &str| true),
            list_state: ListState::default(),
            borders: Borders::ALL,
        }
    }

    /// Update items from the snapshot; cursor follows the current showtime.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.view.showtimes.clone());
        if let Some(current) = state.view.current_showtime {
            if let Some(pos) = self
                .list
                .items
                .iter()
                .position(|s| s.id == current)
            {
                self.list.set_selected_by_original(pos);
            }
        }
    }

    fn select_action(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(show) => vec![Action::SelectShowtime(show.id)],
            None => vec![],
        }
    }

    fn render_item<'a>(
        &self,
        show: &'a ShowtimeInfo,
        is_selected: bool,
        state: &AppState,
    ) -> ListItem<'a> {
        let is_current = state.view.current_showtime == Some(show.id);

        let (icon, icon_color) = if is_current {
            ("●", C_ACCENT)
        } else {
            (" ", C_MUTED)
        };

        let time_style = if is_current || is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let availability = if show.full {
            Span::styled("FULL", Style::default().fg(C_BADGE_FULL).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(
                format!("{} free", show.free),
                Style::default().fg(C_SECONDARY),
            )
        };

        let spans = vec![
            Span::styled(icon, Style::default().fg(icon_color)),
            Span::raw(" "),
            Span::styled(show.starts_at.format("%H:%M").to_string(), time_style),
            Span::styled("  ", Style::default()),
            availability,
        ];

        let item_bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };

        ListItem::new(Line::from(spans)).style(item_bg)
    }
}

impl Component for ShowtimeList {
    fn id(&self) -> ComponentId {
        ComponentId::ShowtimeList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => return self.select_action(),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize; // +1 for border
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(ratatui::crossterm::event::MouseButton::Left) => {
                if self.list.handle_click(rel_row) {
                    // Single click switches showtime straight away.
                    return self.select_action();
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome_borders("showtimes", Some('3'), focused, None, self.borders);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.items.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no showtimes scheduled",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let content_h = inner.height as usize;
        self.list.ensure_visible(content_h);
        let items_with_idx: Vec<(usize, ShowtimeInfo)> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .map(|(i, s)| (i, s.clone()))
            .collect();
        let sel_in_view = self.list.selected_in_view(content_h);

        let items: Vec<ListItem> = items_with_idx
            .iter()
            .enumerate()
            .map(|(view_row, (_orig, show))| {
                self.render_item(show, view_row == sel_in_view, state)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(list, inner, &mut self.list_state);
    }
}
