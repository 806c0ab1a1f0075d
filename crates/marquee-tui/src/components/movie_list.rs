//! MovieList component — left pane listing the catalog.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Instant;

use marquee_core::catalog::{format_cents, Movie};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_PRICE, C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_TAG},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::pane_chrome_borders,
        scrollable_list::ScrollableList,
    },
};

/// Sort order for the movie list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    Title,
    Price,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Title,
            Self::Title => Self::Price,
            Self::Price => Self::Default,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Default => Self::Price,
            Self::Title => Self::Default,
            Self::Price => Self::Title,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Title => "title",
            Self::Price => "price",
        }
    }
}

pub struct MovieList {
    pub list: ScrollableList<Movie>,
    pub filter_input: FilterInput,
    pub sort_order: SortOrder,
    list_state: ListState,
    /// Which borders to draw (for shared-border layouts).
    pub borders: Borders,
    /// Track last click (row index, time) for double-click detection.
    last_click: Option<(usize, Instant)>,
}

impl MovieList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(|movie: &Movie, q: &str| movie_matches(movie, q)),
            filter_input: FilterInput::new("title, tags, synopsis…"),
            sort_order: SortOrder::Default,
            list_state: ListState::default(),
            borders: Borders::ALL,
            last_click: None,
        }
    }

    /// Update items from the snapshot and re-apply sort + filter.
    pub fn sync(&mut self, state: &AppState) {
        let keep = self.list.selected_original_index();
        self.list.set_items(state.view.movies.clone());
        self.apply_sort();
        if let Some(idx) = keep {
            self.list.set_selected_by_original(idx);
        }
    }

    fn apply_sort(&mut self) {
        match self.sort_order {
            SortOrder::Default => {
                // restore catalog order
                self.list.rebuild_filter();
            }
            SortOrder::Title => {
                self.list
                    .sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            }
            SortOrder::Price => {
                self.list.sort_by(|a, b| {
                    a.price_cents
                        .cmp(&b.price_cents)
                        .then(a.title.to_lowercase().cmp(&b.title.to_lowercase()))
                });
            }
        }
    }

    fn select_action(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(movie) => vec![Action::SelectMovie(movie.id)],
            None => vec![],
        }
    }

    fn render_item<'a>(&self, movie: &'a Movie, is_selected: bool, state: &AppState) -> ListItem<'a> {
        let is_current = state.view.current_movie == Some(movie.id);
        let filtering = self.filter_input.is_active() || !self.list.filter.is_empty();

        let (icon, icon_color) = if is_current {
            ("●", C_ACCENT)
        } else {
            (" ", C_MUTED)
        };

        let title_color = if is_current {
            C_PRIMARY
        } else if is_selected {
            C_PRIMARY
        } else {
            C_SECONDARY
        };
        let title_style = if is_current || is_selected {
            Style::default().fg(title_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(title_color)
        };

        let item_bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };

        let mut spans: Vec<Span> = vec![
            Span::styled(icon, Style::default().fg(icon_color)),
            Span::raw(" "),
            Span::styled(movie.title.clone(), title_style),
            Span::raw("  "),
            Span::styled(format_cents(movie.price_cents), Style::default().fg(C_PRICE)),
        ];

        // Tags shown only on the selected row while filtering
        if filtering && is_selected && !movie.tags.is_empty() {
            spans.push(Span::raw("  "));
            for (i, tag) in movie.tags.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" · ", Style::default().fg(C_MUTED)));
                }
                spans.push(Span::styled(tag.clone(), Style::default().fg(C_TAG)));
            }
        }

        ListItem::new(Line::from(spans)).style(item_bg)
    }
}

fn movie_matches(movie: &Movie, q: &str) -> bool {
    if q.trim().is_empty() {
        return true;
    }
    let q = q.to_lowercase();
    let text = format!(
        "{} {} {}",
        movie.title.to_lowercase(),
        movie.tags.join(" ").to_lowercase(),
        movie.synopsis.to_lowercase()
    );
    q.split_whitespace().all(|term| text.contains(term))
}

impl Component for MovieList {
    fn id(&self) -> ComponentId {
        ComponentId::MovieList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        // Filter mode input
        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => {
                    self.list.set_filter(&q);
                    vec![]
                }
                FilterAction::Confirmed => vec![Action::CloseFilter],
                FilterAction::Cancelled => {
                    self.list.set_filter("");
                    vec![Action::CloseFilter]
                }
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter | KeyCode::Char(' ') => return self.select_action(),

            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }

            KeyCode::Char('s') => {
                self.sort_order = self.sort_order.next();
                self.apply_sort();
            }
            KeyCode::Char('S') => {
                self.sort_order = self.sort_order.prev();
                self.apply_sort();
            }

            _ => {}
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize; // +1 for border
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.list.select_up(1);
            }
            MouseEventKind::ScrollDown => {
                self.list.select_down(1);
            }
            MouseEventKind::Down(ratatui::crossterm::event::MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(row, t)| row == rel_row && t.elapsed().as_millis() < 400)
                    .unwrap_or(false);

                if self.list.handle_click(rel_row) {
                    if is_double {
                        // Double-click selects the movie (like the change event
                        // on the original dropdown).
                        self.last_click = None;
                        return self.select_action();
                    }
                    self.last_click = Some((rel_row, now));
                } else {
                    self.last_click = Some((rel_row, now));
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::CloseFilter => {
                // Keep the query so the narrowed list stays; Esc-Esc clears it.
                self.filter_input.deactivate();
            }
            Action::FocusPane(id) if *id != ComponentId::MovieList => {
                self.filter_input.deactivate();
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let title = match self.sort_order {
            SortOrder::Default => "movies".to_string(),
            other => format!("movies · {}", other.label()),
        };
        let block = pane_chrome_borders(&title, Some('1'), focused, None, self.borders);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.view.movies.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  empty catalog",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        if self.list.is_empty() && !self.list.filter.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no movies match filter",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let content_h = inner.height as usize;
        self.list.ensure_visible(content_h);
        let items_with_idx: Vec<(usize, Movie)> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .map(|(i, m)| (i, m.clone()))
            .collect();
        let sel_in_view = self.list.selected_in_view(content_h);

        let items: Vec<ListItem> = items_with_idx
            .iter()
            .enumerate()
            .map(|(view_row, (_orig_idx, movie))| {
                let is_selected = view_row == sel_in_view;
                self.render_item(movie, is_selected, state)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(list, inner, &mut self.list_state);

        // Filter input bar drawn at bottom of inner area if active
        if self.filter_input.is_active() {
            let filter_area = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.filter_input.draw(frame, filter_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, tags: &[&str]) -> Movie {
        Movie {
            id: 1,
            title: title.to_string(),
            price_cents: 1000,
            synopsis: "a night screening".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_movie_matches_all_terms() {
        let m = movie("Signal and Noise", &["sci-fi", "thriller"]);
        assert!(movie_matches(&m, "signal"));
        assert!(movie_matches(&m, "sci-fi noise"));
        assert!(movie_matches(&m, "night"));
        assert!(!movie_matches(&m, "western"));
        assert!(movie_matches(&m, "  "));
    }

    #[test]
    fn test_sort_order_cycles() {
        let mut s = SortOrder::Default;
        for _ in 0..3 {
            s = s.next();
        }
        assert_eq!(s, SortOrder::Default);
        assert_eq!(SortOrder::Title.prev(), SortOrder::Default);
        assert_eq!(SortOrder::Default.label(), "default");
    }
}
