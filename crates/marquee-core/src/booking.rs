//! The booking view-model: selection state machine + derived render snapshot.
//!
//! Design principles:
//! - The session owns the catalog and hall layout; nothing is global.
//! - Operations are total: invalid input is a no-op, never an error.
//! - Renderers consume `Snapshot` values and re-render fully from each one;
//!   they never reach into the session.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use tracing::debug;

use crate::catalog::{format_cents, Catalog, CatalogError, Movie};
use crate::layout::{HallLayout, SeatIndex};

/// Render state of a single seat in the current showtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Available,
    Selected,
    Occupied,
}

/// Live price summary for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    /// Selected seat indices in ascending order.
    pub seats: Vec<SeatIndex>,
    pub count: usize,
    pub total_cents: u32,
    pub bookable: bool,
}

impl Summary {
    pub fn total_display(&self) -> String {
        format_cents(self.total_cents)
    }
}

/// Receipt returned by a successful `book()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub showtime_id: u32,
    pub seats: Vec<SeatIndex>,
    pub total_cents: u32,
}

/// One showtime row as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowtimeInfo {
    pub id: u32,
    pub starts_at: NaiveTime,
    pub free: u16,
    pub full: bool,
}

/// Full render-ready state of the session. `rev` is a monotonically
/// increasing counter bumped on every state change; renderers can use it to
/// skip redundant work.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rev: u64,
    pub layout: HallLayout,
    pub movies: Vec<Movie>,
    pub current_movie: Option<u32>,
    /// Showtimes of the current movie, ordered by start time.
    pub showtimes: Vec<ShowtimeInfo>,
    pub current_showtime: Option<u32>,
    /// Per-seat state, indexed by seat index - 1. Empty when no showtime is
    /// current.
    pub seats: Vec<SeatState>,
    pub summary: Summary,
}

impl Snapshot {
    pub fn movie(&self, id: u32) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Convenience: the currently selected movie, if any.
    pub fn current_movie_ref(&self) -> Option<&Movie> {
        self.current_movie.and_then(|id| self.movie(id))
    }

    pub fn seat_state(&self, seat: SeatIndex) -> Option<SeatState> {
        self.seats.get(seat.checked_sub(1)? as usize).copied()
    }
}

/// The Booking View-Model of the widget. Single-threaded and synchronous:
/// each operation runs to completion before the next event is processed.
pub struct BookingSession {
    catalog: Catalog,
    layout: HallLayout,
    current_showtime: Option<u32>,
    selected: BTreeSet<SeatIndex>,
    rev: u64,
}

impl BookingSession {
    /// Validates the catalog against the layout, then opens on the first
    /// movie's first showtime (the widget's initial render state).
    pub fn new(catalog: Catalog, layout: HallLayout) -> Result<Self, CatalogError> {
        catalog.validate(&layout)?;
        let current_showtime = catalog
            .movies
            .first()
            .and_then(|m| catalog.first_showtime_for(m.id));
        Ok(Self {
            catalog,
            layout,
            current_showtime,
            selected: BTreeSet::new(),
            rev: 1,
        })
    }

    pub fn layout(&self) -> &HallLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn current_showtime_id(&self) -> Option<u32> {
        self.current_showtime
    }

    /// The current movie is always derived from the current showtime, so the
    /// two can never disagree.
    pub fn current_movie(&self) -> Option<&Movie> {
        let show = self.catalog.showtime(self.current_showtime?)?;
        self.catalog.movie(show.movie_id)
    }

    /// Pick a movie: its first showtime becomes current and the selection is
    /// cleared. Unknown ids are ignored.
    pub fn select_movie(&mut self, movie_id: u32) {
        if self.catalog.movie(movie_id).is_none() {
            debug!("select_movie: unknown movie {}", movie_id);
            return;
        }
        self.current_showtime = self.catalog.first_showtime_for(movie_id);
        self.selected.clear();
        self.rev += 1;
    }

    /// Switch to a showtime and clear the selection. Unknown ids are ignored.
    pub fn select_showtime(&mut self, showtime_id: u32) {
        if self.catalog.showtime(showtime_id).is_none() {
            debug!("select_showtime: unknown showtime {}", showtime_id);
            return;
        }
        self.current_showtime = Some(showtime_id);
        self.selected.clear();
        self.rev += 1;
    }

    /// Flip a seat in or out of the selection. No-op when there is no current
    /// showtime, the index is outside the grid, or the seat is occupied.
    pub fn toggle_seat(&mut self, seat: SeatIndex) {
        let Some(show) = self.current_showtime.and_then(|id| self.catalog.showtime(id)) else {
            return;
        };
        if !self.layout.contains(seat) || show.occupied.contains(&seat) {
            return;
        }
        if !self.selected.remove(&seat) {
            self.selected.insert(seat);
        }
        self.rev += 1;
    }

    /// Drop every selected seat (same result as toggling each one off).
    pub fn clear_selection(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.selected.clear();
        self.rev += 1;
    }

    pub fn summary(&self) -> Summary {
        let count = self.selected.len();
        let price = self.current_movie().map(|m| m.price_cents).unwrap_or(0);
        Summary {
            seats: self.selected.iter().copied().collect(),
            count,
            total_cents: price * count as u32,
            bookable: count > 0,
        }
    }

    /// Commit the selection: every selected seat moves into the current
    /// showtime's occupied set and the selection empties. Returns the receipt,
    /// or `None` (silently, per the widget contract) when nothing is selected.
    pub fn book(&mut self) -> Option<Booking> {
        if self.selected.is_empty() {
            return None;
        }
        let summary = self.summary();
        let showtime_id = self.current_showtime?;
        let show = self.catalog.showtime_mut(showtime_id)?;
        show.occupied.extend(self.selected.iter().copied());
        self.selected.clear();
        self.rev += 1;
        debug!(
            "booked {} seat(s) for showtime {}: {:?}",
            summary.count, showtime_id, summary.seats
        );
        Some(Booking {
            showtime_id,
            seats: summary.seats,
            total_cents: summary.total_cents,
        })
    }

    /// Per-seat render state for the current showtime. Empty when no showtime
    /// is current (the grid has nothing to show).
    pub fn seat_states(&self) -> Vec<SeatState> {
        let Some(show) = self.current_showtime.and_then(|id| self.catalog.showtime(id)) else {
            return Vec::new();
        };
        (1..=self.layout.total())
            .map(|seat| {
                if show.occupied.contains(&seat) {
                    SeatState::Occupied
                } else if self.selected.contains(&seat) {
                    SeatState::Selected
                } else {
                    SeatState::Available
                }
            })
            .collect()
    }

    /// Build the render-ready snapshot the UI consumes.
    pub fn snapshot(&self) -> Snapshot {
        let current_movie = self.current_movie().map(|m| m.id);
        let showtimes = current_movie
            .map(|id| {
                self.catalog
                    .showtimes_for(id)
                    .into_iter()
                    .map(|s| ShowtimeInfo {
                        id: s.id,
                        starts_at: s.starts_at,
                        free: s.free_seats(&self.layout),
                        full: s.is_full(&self.layout),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Snapshot {
            rev: self.rev,
            layout: self.layout,
            movies: self.catalog.movies.clone(),
            current_movie,
            showtimes,
            current_showtime: self.current_showtime,
            seats: self.seat_states(),
            summary: self.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> BookingSession {
        BookingSession::new(Catalog::demo(), HallLayout::default()).unwrap()
    }

    #[test]
    fn test_opens_on_first_movie_first_showtime() {
        let s = session();
        assert_eq!(s.current_movie().map(|m| m.id), Some(1));
        assert_eq!(s.current_showtime_id(), Some(1));
        assert!(s.summary().seats.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_prior_state() {
        let mut s = session();
        let before = s.summary();
        s.toggle_seat(3);
        assert_eq!(s.summary().seats, vec![3]);
        s.toggle_seat(3);
        assert_eq!(s.summary(), before);
    }

    #[test]
    fn test_toggle_occupied_is_noop() {
        let mut s = session();
        // Seat 5 is pre-occupied in demo showtime 1.
        let rev = s.rev();
        s.toggle_seat(5);
        assert_eq!(s.rev(), rev);
        assert!(s.summary().seats.is_empty());
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut s = session();
        let rev = s.rev();
        s.toggle_seat(0);
        s.toggle_seat(33);
        assert_eq!(s.rev(), rev);
        assert!(s.summary().seats.is_empty());
    }

    #[test]
    fn test_total_price_tracks_count_and_movie_price() {
        let mut s = session();
        s.toggle_seat(1);
        s.toggle_seat(2);
        s.toggle_seat(7);
        let summary = s.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_cents, 3 * 1000);

        // Switching movie re-prices from zero selection.
        s.select_movie(3);
        assert_eq!(s.summary().total_cents, 0);
        s.toggle_seat(1);
        assert_eq!(s.summary().total_cents, 1200);
    }

    #[test]
    fn test_worked_example() {
        // Spec example: price $10.00, select seats {3, 7}.
        let mut s = session();
        s.toggle_seat(3);
        s.toggle_seat(7);
        let summary = s.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_cents, 2000);
        assert_eq!(summary.total_display(), "$20.00");
        assert!(summary.bookable);

        let booking = s.book().unwrap();
        assert_eq!(booking.seats, vec![3, 7]);
        assert_eq!(booking.total_cents, 2000);

        let occupied = &s.catalog().showtime(1).unwrap().occupied;
        assert!(occupied.contains(&3) && occupied.contains(&7));
        assert!(s.summary().seats.is_empty());
        assert!(!s.summary().bookable);
    }

    #[test]
    fn test_book_empty_selection_changes_nothing() {
        let mut s = session();
        let rev = s.rev();
        let occupied_before = s.catalog().showtime(1).unwrap().occupied.clone();
        assert_eq!(s.book(), None);
        assert_eq!(s.rev(), rev);
        assert_eq!(s.catalog().showtime(1).unwrap().occupied, occupied_before);
    }

    #[test]
    fn test_booked_seats_become_occupied_for_reselection() {
        let mut s = session();
        s.toggle_seat(10);
        s.book().unwrap();
        // The seat is occupied now, so toggling it again is a no-op.
        s.toggle_seat(10);
        assert!(s.summary().seats.is_empty());
        assert_eq!(s.snapshot().seat_state(10), Some(SeatState::Occupied));
    }

    #[test]
    fn test_changing_movie_clears_selection() {
        let mut s = session();
        s.toggle_seat(1);
        s.select_movie(2);
        assert!(s.summary().seats.is_empty());
        assert_eq!(s.current_showtime_id(), Some(4));
        assert_eq!(s.current_movie().map(|m| m.id), Some(2));
    }

    #[test]
    fn test_changing_showtime_clears_selection() {
        let mut s = session();
        s.toggle_seat(1);
        s.select_showtime(2);
        assert!(s.summary().seats.is_empty());
        assert_eq!(s.current_showtime_id(), Some(2));
    }

    #[test]
    fn test_reselecting_current_movie_still_clears() {
        let mut s = session();
        s.select_showtime(2);
        s.toggle_seat(1);
        s.select_movie(1);
        assert!(s.summary().seats.is_empty());
        // Back on the movie's first showtime.
        assert_eq!(s.current_showtime_id(), Some(1));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut s = session();
        s.toggle_seat(1);
        let rev = s.rev();
        s.select_movie(999);
        s.select_showtime(999);
        assert_eq!(s.rev(), rev);
        assert_eq!(s.summary().seats, vec![1]);
        assert_eq!(s.current_showtime_id(), Some(1));
    }

    #[test]
    fn test_movie_without_showtimes() {
        let mut catalog = Catalog::demo();
        catalog.movies.push(Movie {
            id: 9,
            title: "Unscheduled".to_string(),
            price_cents: 500,
            ..Movie::default()
        });
        let mut s = BookingSession::new(catalog, HallLayout::default()).unwrap();
        s.select_movie(9);
        assert_eq!(s.current_showtime_id(), None);
        assert_eq!(s.current_movie(), None);

        // With no current showtime every seat op is a no-op.
        let rev = s.rev();
        s.toggle_seat(1);
        assert_eq!(s.rev(), rev);
        assert_eq!(s.book(), None);
        assert!(s.snapshot().seats.is_empty());
    }

    #[test]
    fn test_clear_selection() {
        let mut s = session();
        s.toggle_seat(1);
        s.toggle_seat(2);
        s.clear_selection();
        assert!(s.summary().seats.is_empty());
        // Clearing an already-empty selection does not bump rev.
        let rev = s.rev();
        s.clear_selection();
        assert_eq!(s.rev(), rev);
    }

    #[test]
    fn test_selection_disjoint_from_occupied_invariant() {
        let mut s = session();
        for seat in 1..=32 {
            s.toggle_seat(seat);
        }
        let snapshot = s.snapshot();
        let show = s.catalog().showtime(1).unwrap();
        for seat in snapshot.summary.seats {
            assert!(!show.occupied.contains(&seat));
        }
        // 32 seats minus 4 pre-occupied.
        assert_eq!(snapshot.summary.count, 28);
    }

    #[test]
    fn test_snapshot_showtime_rows() {
        let s = session();
        let snapshot = s.snapshot();
        assert_eq!(snapshot.showtimes.len(), 3);
        assert_eq!(snapshot.showtimes[0].id, 1);
        assert_eq!(snapshot.showtimes[0].free, 28);
        assert!(!snapshot.showtimes[0].full);

        let mut s2 = session();
        s2.select_movie(3);
        let snap2 = s2.snapshot();
        let sold_out = snap2.showtimes.iter().find(|i| i.id == 7).unwrap();
        assert!(sold_out.full);
        assert_eq!(sold_out.free, 0);
    }

    #[test]
    fn test_rev_increases_on_changes_only() {
        let mut s = session();
        let r0 = s.rev();
        s.toggle_seat(1);
        let r1 = s.rev();
        assert!(r1 > r0);
        s.toggle_seat(5); // occupied: no-op
        assert_eq!(s.rev(), r1);
        s.select_showtime(2);
        assert!(s.rev() > r1);
    }
}
