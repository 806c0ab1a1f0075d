//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns the `BookingSession` plus all components and `AppState`
//!   (shared read-only data for components).
//! - A blocking task reads terminal events into a `tokio::mpsc` channel.
//! - The event loop draws each frame, then awaits the next event.
//! - Components return `Vec<Action>`; App dispatches each Action into the
//!   session and replaces the snapshot, so the whole UI re-renders from
//!   fresh state.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Borders,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use marquee_core::booking::BookingSession;
use marquee_core::catalog::format_cents;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        header::Header, help_overlay::HelpOverlay, log_panel::LogPanel, movie_list::MovieList,
        seat_grid::SeatGrid, showtime_list::ShowtimeList, summary_panel::SummaryPanel,
    },
    focus::FocusRing,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

/// Cap on the in-app log buffer shown in the log panel.
const LOG_CAP: usize = 200;

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Stores the last-drawn layout rects for each focusable pane.
/// Used by `handle_mouse` to do hit-testing without recomputing the layout.
#[derive(Default, Clone)]
struct PaneAreas {
    movie_list: Rect,
    seat_grid: Rect,
    showtime_list: Rect,
    summary_panel: Rect,
    log_panel: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    /// The booking view-model. Only `apply_action` touches it.
    session: BookingSession,

    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    movie_list: MovieList,
    seat_grid: SeatGrid,
    showtime_list: ShowtimeList,
    summary_panel: SummaryPanel,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,

    // ── UI chrome ─────────────────────────────────────────────────────────────
    focus: FocusRing,
    show_help: bool,
    show_keys_bar: bool,
    show_log_panel: bool,

    /// Whether to quit on next iteration.
    should_quit: bool,

    /// Last-drawn layout rects — used for mouse hit-testing.
    pane_areas: PaneAreas,

    /// Toast notification manager.
    toast: ToastManager,
}

impl App {
    pub fn new(session: BookingSession, show_keys_bar: bool) -> Self {
        let state = AppState {
            view: session.snapshot(),
            input_mode: InputMode::Normal,
            logs: Vec::new(),
        };

        let mut app = Self {
            session,
            state,
            header: Header::new(),
            movie_list: MovieList::new(),
            seat_grid: SeatGrid::new(),
            showtime_list: ShowtimeList::new(),
            summary_panel: SummaryPanel::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            // Ring order matches the pane number keys 1-4.
            focus: FocusRing::new(vec![
                ComponentId::MovieList,
                ComponentId::SeatGrid,
                ComponentId::ShowtimeList,
                ComponentId::SummaryPanel,
            ]),
            show_help: false,
            show_keys_bar,
            show_log_panel: false,
            should_quit: false,
            pane_areas: PaneAreas::default(),
            toast: ToastManager::new(),
        };

        app.movie_list.sync(&app.state);
        app.showtime_list.sync(&app.state);
        app
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<Event>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // Toast expiry check
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        self.push_log("marquee started".to_string());

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(ev) = rx.recv() => {
                    needs_redraw = self.handle_event(ev);
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Event handling ────────────────────────────────────────────────────────

    /// Returns `true` if the event requires a redraw.
    fn handle_event(&mut self, ev: Event) -> bool {
        match ev {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                let actions = self.handle_key(key);
                for a in actions {
                    self.dispatch(a);
                }
            }
            Event::Mouse(mouse) => {
                let actions = self.handle_mouse(mouse);
                for a in actions {
                    self.dispatch(a);
                }
            }
            Event::Resize(w, h) => {
                self.dispatch(Action::Resize(w, h));
            }
            _ => {}
        }
        true
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Global keys — always active regardless of focus/mode
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                if self.state.input_mode == InputMode::Normal && !self.show_help {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            _ => {}
        }

        // Help overlay: any key closes it
        if self.show_help {
            return vec![Action::ToggleHelp];
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('L') => return vec![Action::ToggleLogs],
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                _ => {}
            }
        }

        // Tab / Shift-Tab always cycle focus (in filter mode, close filter first)
        match key.code {
            KeyCode::Tab => {
                if self.state.input_mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusNext];
                }
                return vec![Action::FocusNext];
            }
            KeyCode::BackTab => {
                if self.state.input_mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusPrev];
                }
                return vec![Action::FocusPrev];
            }
            _ => {}
        }

        // Global booking keys (Normal mode only)
        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('b') => return vec![Action::Book],
                KeyCode::Char('x') => return vec![Action::ClearSelection],
                KeyCode::Char('y') => {
                    if let Some(line) = self.state.booking_line() {
                        return vec![Action::CopyToClipboard(line)];
                    }
                    return vec![];
                }
                KeyCode::Char('1') => {
                    self.focus.set_by_position(0);
                    return vec![];
                }
                KeyCode::Char('2') => {
                    self.focus.set_by_position(1);
                    return vec![];
                }
                KeyCode::Char('3') => {
                    self.focus.set_by_position(2);
                    return vec![];
                }
                KeyCode::Char('4') => {
                    self.focus.set_by_position(3);
                    return vec![];
                }
                _ => {}
            }
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::MovieList) => self.movie_list.handle_key(key, s),
            Some(ComponentId::SeatGrid) => self.seat_grid.handle_key(key, s),
            Some(ComponentId::ShowtimeList) => self.showtime_list.handle_key(key, s),
            Some(ComponentId::SummaryPanel) => self.summary_panel.handle_key(key, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.show_help {
            return vec![];
        }

        let col = event.column;
        let row = event.row;

        // Helper: check if (col, row) is inside a Rect
        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;

        // Determine which pane was clicked and dispatch to it.
        // Also return a FocusPane action so focus follows the click.
        macro_rules! click_pane {
            ($id:expr, $component:expr, $area:expr) => {{
                let mut actions = $component.handle_mouse(event, $area, s);
                if self.focus.current() != Some($id) {
                    actions.insert(0, Action::FocusPane($id));
                }
                return actions;
            }};
        }

        if hit(areas.movie_list, col, row) {
            click_pane!(ComponentId::MovieList, self.movie_list, areas.movie_list);
        }
        if hit(areas.seat_grid, col, row) {
            click_pane!(ComponentId::SeatGrid, self.seat_grid, areas.seat_grid);
        }
        if hit(areas.showtime_list, col, row) {
            click_pane!(
                ComponentId::ShowtimeList,
                self.showtime_list,
                areas.showtime_list
            );
        }
        if hit(areas.summary_panel, col, row) {
            click_pane!(
                ComponentId::SummaryPanel,
                self.summary_panel,
                areas.summary_panel
            );
        }
        if hit(areas.log_panel, col, row) {
            return self.log_panel.handle_mouse(event, areas.log_panel, s);
        }

        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast to all components first so they can react to shared
        // actions (e.g. filter close), then apply at the app level.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.movie_list.on_action(&action, s));
            out.extend(self.seat_grid.on_action(&action, s));
            out.extend(self.showtime_list.on_action(&action, s));
            out.extend(self.summary_panel.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Dispatch any secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Resize(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Booking ───────────────────────────────────────────────────────
            Action::SelectMovie(id) => {
                self.session.select_movie(id);
                self.refresh_view();
                let title = self.state.current_movie().map(|m| m.title.clone());
                if let Some(title) = title {
                    self.push_log(format!("movie: {}", title));
                }
            }
            Action::SelectShowtime(id) => {
                self.session.select_showtime(id);
                self.refresh_view();
                let starts_at = self.state.current_showtime_info().map(|s| s.starts_at);
                if let Some(starts_at) = starts_at {
                    self.push_log(format!("showtime: {}", starts_at.format("%H:%M")));
                }
            }
            Action::ToggleSeat(seat) => {
                self.session.toggle_seat(seat);
                self.refresh_view();
            }
            Action::ClearSelection => {
                self.session.clear_selection();
                self.refresh_view();
            }
            Action::Book => match self.session.book() {
                Some(booking) => {
                    let msg = format!(
                        "booked {} seat{} · {}",
                        booking.seats.len(),
                        if booking.seats.len() == 1 { "" } else { "s" },
                        format_cents(booking.total_cents)
                    );
                    self.refresh_view();
                    self.toast.success(msg.clone());
                    self.push_log(msg);
                }
                // Empty selection: defined as a silent no-op.
                None => trace!("book with empty selection ignored"),
            },

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
                // Clicking away from the movie list while its filter is open
                // drops back to normal mode.
                if self.state.input_mode == InputMode::Filter && id != ComponentId::MovieList {
                    self.state.input_mode = InputMode::Normal;
                }
            }

            // ── Filter ────────────────────────────────────────────────────────
            Action::OpenFilter => {
                self.state.input_mode = InputMode::Filter;
            }
            Action::CloseFilter => {
                self.state.input_mode = InputMode::Normal;
            }

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleLogs => {
                self.show_log_panel = !self.show_log_panel;
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            Action::ToggleKeys => {
                self.show_keys_bar = !self.show_keys_bar;
            }
            Action::CopyToClipboard(text) => {
                self.copy_to_clipboard(&text);
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Resize(w, h) => {
                trace!("resize to {}x{}", w, h);
            }
        }
    }

    /// Pull a fresh snapshot out of the session and re-sync the list
    /// components that mirror it.
    fn refresh_view(&mut self) {
        self.state.view = self.session.snapshot();
        self.movie_list.sync(&self.state);
        self.showtime_list.sync(&self.state);
    }

    fn push_log(&mut self, msg: String) {
        let line = format!("{} {}", chrono::Local::now().format("%H:%M:%S"), msg);
        self.state.logs.push(line);
        if self.state.logs.len() > LOG_CAP {
            let drop_n = self.state.logs.len() - LOG_CAP;
            self.state.logs.drain(..drop_n);
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string())) {
            Ok(()) => self.toast.info("copied to clipboard"),
            Err(e) => self.toast.error(format!("clipboard error: {}", e)),
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use ratatui::widgets::Block;
        let area = frame.area();

        // Fill the entire terminal with the base background colour so that
        // any unstyled cells (gaps between panes) appear black rather than
        // whatever the terminal default is.
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | body | (log) | (statusbar) ────────────────
        let header_h = 2u16;
        let status_h = if self.show_keys_bar { 1u16 } else { 0 };
        let log_h = if self.show_log_panel { 8u16 } else { 0 };

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_h),
                Constraint::Min(0),
                Constraint::Length(log_h),
                Constraint::Length(status_h),
            ])
            .split(area);

        let header_area = outer[0];
        let body_area = outer[1];
        let log_area = outer[2];
        let status_area = outer[3];

        // ── Header ────────────────────────────────────────────────────────────
        self.header.draw(frame, header_area, false, &self.state);

        // ── Status bar ────────────────────────────────────────────────────────
        if self.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                status_area,
                self.state.input_mode,
                self.state.view.summary.bookable,
            );
        }

        // ── Log panel ─────────────────────────────────────────────────────────
        if self.show_log_panel {
            let log_focused = self.focus.current() == Some(ComponentId::LogPanel);
            // Omit top border: the body above has its own bottom edge
            self.log_panel.borders = Borders::LEFT | Borders::BOTTOM | Borders::RIGHT;
            self.log_panel.draw(frame, log_area, log_focused, &self.state);
            self.pane_areas.log_panel = log_area;
        } else {
            self.pane_areas.log_panel = Rect::default();
        }

        // ── Body: movies | seats | showtimes + booking ────────────────────────
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(28),
                Constraint::Percentage(46),
                Constraint::Percentage(26),
            ])
            .split(body_area);

        let movies_focused = self.focus.is_focused(ComponentId::MovieList);
        // Left pane: omit right border — the seat pane's left border is the divider
        self.movie_list.borders = Borders::TOP | Borders::LEFT | Borders::BOTTOM;
        self.movie_list.draw(frame, cols[0], movies_focused, &self.state);
        self.pane_areas.movie_list = cols[0];

        let seats_focused = self.focus.is_focused(ComponentId::SeatGrid);
        self.seat_grid.borders = Borders::ALL;
        self.seat_grid.draw(frame, cols[1], seats_focused, &self.state);
        self.pane_areas.seat_grid = cols[1];

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(cols[2]);

        let shows_focused = self.focus.is_focused(ComponentId::ShowtimeList);
        self.showtime_list.borders = Borders::TOP | Borders::RIGHT;
        self.showtime_list.draw(frame, rows[0], shows_focused, &self.state);
        self.pane_areas.showtime_list = rows[0];

        let summary_focused = self.focus.is_focused(ComponentId::SummaryPanel);
        self.summary_panel.borders = Borders::TOP | Borders::RIGHT | Borders::BOTTOM;
        self.summary_panel
            .draw(frame, rows[1], summary_focused, &self.state);
        self.pane_areas.summary_panel = rows[1];

        // ── Help overlay (on top of everything) ──────────────────────────────
        if self.show_help {
            self.help_overlay.draw(frame, area, false, &self.state);
        }

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}
