use serde::{Deserialize, Serialize};

/// 1-based row-major position in the hall grid.
pub type SeatIndex = u16;

/// Fixed seat grid geometry: `rows` × `seats_per_row`, producing a
/// deterministic 1..N seat index ordering (row-major, 1-based).
///
/// Seat 1 is the front-left seat ("A1"); indices run left to right along a
/// row, then continue on the next row back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallLayout {
    pub rows: u8,
    pub seats_per_row: u8,
}

impl HallLayout {
    /// Both dimensions are clamped to at least 1 so the grid is never empty.
    pub fn new(rows: u8, seats_per_row: u8) -> Self {
        Self {
            rows: rows.max(1),
            seats_per_row: seats_per_row.max(1),
        }
    }

    pub fn total(&self) -> u16 {
        self.rows as u16 * self.seats_per_row as u16
    }

    pub fn contains(&self, seat: SeatIndex) -> bool {
        seat >= 1 && seat <= self.total()
    }

    /// Seat index for a 0-based (row, col) position.
    pub fn seat_at(&self, row: u8, col: u8) -> Option<SeatIndex> {
        if row >= self.rows || col >= self.seats_per_row {
            return None;
        }
        Some(row as u16 * self.seats_per_row as u16 + col as u16 + 1)
    }

    /// 0-based (row, col) position of a seat index.
    pub fn position(&self, seat: SeatIndex) -> Option<(u8, u8)> {
        if !self.contains(seat) {
            return None;
        }
        let zero_based = seat - 1;
        let row = (zero_based / self.seats_per_row as u16) as u8;
        let col = (zero_based % self.seats_per_row as u16) as u8;
        Some((row, col))
    }

    /// Row letter: row 0 = 'A'. Rows past 'Z' wrap; halls that large are not
    /// a concern for a u8-dimension grid.
    pub fn row_label(&self, row: u8) -> char {
        (b'A' + row % 26) as char
    }

    /// Human seat label like "A1" or "C7" (column is 1-based in the label).
    pub fn seat_label(&self, seat: SeatIndex) -> String {
        match self.position(seat) {
            Some((row, col)) => format!("{}{}", self.row_label(row), col + 1),
            None => format!("#{}", seat),
        }
    }
}

impl Default for HallLayout {
    fn default() -> Self {
        Self::new(4, 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_indexing() {
        let hall = HallLayout::new(4, 8);
        assert_eq!(hall.total(), 32);
        assert_eq!(hall.seat_at(0, 0), Some(1));
        assert_eq!(hall.seat_at(0, 7), Some(8));
        assert_eq!(hall.seat_at(1, 0), Some(9));
        assert_eq!(hall.seat_at(3, 7), Some(32));
        assert_eq!(hall.seat_at(4, 0), None);
        assert_eq!(hall.seat_at(0, 8), None);
    }

    #[test]
    fn test_position_round_trip() {
        let hall = HallLayout::new(4, 8);
        for seat in 1..=hall.total() {
            let (row, col) = hall.position(seat).unwrap();
            assert_eq!(hall.seat_at(row, col), Some(seat));
        }
        assert_eq!(hall.position(0), None);
        assert_eq!(hall.position(33), None);
    }

    #[test]
    fn test_seat_labels() {
        let hall = HallLayout::new(4, 8);
        assert_eq!(hall.seat_label(1), "A1");
        assert_eq!(hall.seat_label(8), "A8");
        assert_eq!(hall.seat_label(9), "B1");
        assert_eq!(hall.seat_label(32), "D8");
        assert_eq!(hall.seat_label(99), "#99");
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let hall = HallLayout::new(0, 0);
        assert_eq!(hall.total(), 1);
        assert!(hall.contains(1));
    }
}
