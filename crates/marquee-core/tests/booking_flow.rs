//! End-to-end session flow over the demo catalog: browse, pick, book, and
//! verify the occupancy write-back, the way the widget drives it.

use marquee_core::booking::{BookingSession, SeatState};
use marquee_core::catalog::{parse_catalog_from_toml_str, Catalog};
use marquee_core::layout::HallLayout;

#[test]
fn full_booking_session() {
    let layout = HallLayout::default();
    let mut session = BookingSession::new(Catalog::demo(), layout).unwrap();

    // Initial render: first movie, first showtime, empty selection.
    let snap = session.snapshot();
    assert_eq!(snap.current_movie, Some(1));
    assert_eq!(snap.current_showtime, Some(1));
    assert_eq!(snap.seats.len(), 32);
    assert!(!snap.summary.bookable);

    // Browse to another movie, then to its later showtime.
    session.select_movie(2);
    session.select_showtime(5);
    let snap = session.snapshot();
    assert_eq!(snap.current_movie, Some(2));
    assert_eq!(snap.current_showtime, Some(5));

    // Pick two free seats next to each other on the back row.
    session.toggle_seat(27);
    session.toggle_seat(28);
    let snap = session.snapshot();
    assert_eq!(snap.summary.seats, vec![27, 28]);
    assert_eq!(snap.summary.total_cents, 2 * 850);
    assert_eq!(snap.seat_state(27), Some(SeatState::Selected));

    // Change of heart on one of them.
    session.toggle_seat(28);
    assert_eq!(session.snapshot().summary.count, 1);
    session.toggle_seat(28);

    // Book and verify the write-back.
    let booking = session.book().expect("non-empty selection books");
    assert_eq!(booking.showtime_id, 5);
    assert_eq!(booking.seats, vec![27, 28]);
    assert_eq!(booking.total_cents, 1700);

    let snap = session.snapshot();
    assert_eq!(snap.seat_state(27), Some(SeatState::Occupied));
    assert_eq!(snap.seat_state(28), Some(SeatState::Occupied));
    assert!(snap.summary.seats.is_empty());

    // The free count seen in the showtime list dropped by two.
    let row = snap.showtimes.iter().find(|i| i.id == 5).unwrap();
    assert_eq!(row.free, 32 - 2 - 2); // two pre-occupied, two just booked

    // A second book with nothing selected is a silent no-op.
    assert!(session.book().is_none());
    assert_eq!(session.snapshot().rev, snap.rev);
}

#[test]
fn seeded_catalog_file_drives_a_session() {
    // The seed file written on first run must parse back into a working
    // session: same path the app takes, minus the filesystem.
    let toml = Catalog::demo().to_toml_string().unwrap();
    let catalog = parse_catalog_from_toml_str(&toml).unwrap();
    let mut session = BookingSession::new(catalog, HallLayout::default()).unwrap();

    session.select_movie(3);
    // Showtime 7 is sold out in the demo data; every toggle there no-ops.
    session.select_showtime(7);
    for seat in 1..=32 {
        session.toggle_seat(seat);
    }
    assert!(session.book().is_none());

    // Its earlier screening still has room.
    session.select_showtime(6);
    session.toggle_seat(1);
    assert!(session.book().is_some());
}
