//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for the latest view-model snapshot, but never mutate
//! it. The App event-loop is the only thing that writes to AppState.

use marquee_core::booking::{ShowtimeInfo, Snapshot};
use marquee_core::catalog::Movie;

use crate::widgets::status_bar::InputMode;

/// The full shared state of the application.
/// Components read this; only the App event-loop writes to it.
pub struct AppState {
    /// Latest view-model snapshot, replaced wholesale after every dispatch.
    /// The whole UI re-renders from this (plus component-local view state).
    pub view: Snapshot,

    /// Current input mode (normal navigation vs. filter typing).
    pub input_mode: InputMode,

    /// Recent log lines shown in the log panel (newest last).
    pub logs: Vec<String>,
}

impl AppState {
    /// Convenience: the currently selected movie.
    pub fn current_movie(&self) -> Option<&Movie> {
        self.view.current_movie_ref()
    }

    /// Convenience: the current showtime's row from the snapshot.
    pub fn current_showtime_info(&self) -> Option<&ShowtimeInfo> {
        let id = self.view.current_showtime?;
        self.view.showtimes.iter().find(|s| s.id == id)
    }

    /// One-line description of the pending booking, used for clipboard copy.
    /// Example: "The Paper Moon 20:30 · seats B4 B5 · $17.00"
    pub fn booking_line(&self) -> Option<String> {
        let movie = self.current_movie()?;
        let show = self.current_showtime_info()?;
        let summary = &self.view.summary;
        if summary.seats.is_empty() {
            return None;
        }
        let labels: Vec<String> = summary
            .seats
            .iter()
            .map(|&s| self.view.layout.seat_label(s))
            .collect();
        Some(format!(
            "{} {} · seats {} · {}",
            movie.title,
            show.starts_at.format("%H:%M"),
            labels.join(" "),
            summary.total_display(),
        ))
    }
}
