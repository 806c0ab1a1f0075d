//! Action enum — all user-initiated intents and internal events.

use marquee_core::layout::SeatIndex;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    MovieList,
    ShowtimeList,
    SeatGrid,
    SummaryPanel,
    LogPanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Booking ──────────────────────────────────────────────────────────────
    SelectMovie(u32),
    SelectShowtime(u32),
    ToggleSeat(SeatIndex),
    ClearSelection,
    Book,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Filter ───────────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLogs,
    ToggleHelp,
    ToggleKeys,
    CopyToClipboard(String), // text to copy

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
