use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Row letters of the auditorium, front to back.
pub const ROWS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
pub const SEATS_PER_ROW: u8 = 12;
pub const TOTAL_SEATS: usize = ROWS.len() * SEATS_PER_ROW as usize;

/// A seat in the fixed 10 x 12 grid, written as row letter plus column, e.g. `C7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatCode {
    row: u8,
    number: u8,
}

impl SeatCode {
    pub fn new(row: char, number: u8) -> Option<Self> {
        let row = ROWS.iter().position(|r| *r == row)? as u8;
        if !(1..=SEATS_PER_ROW).contains(&number) {
            return None;
        }
        Some(Self { row, number })
    }

    pub fn row(&self) -> char {
        ROWS[self.row as usize]
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Every seat of the grid in row-major order.
    pub fn all() -> impl Iterator<Item = SeatCode> {
        (0..ROWS.len() as u8).flat_map(|row| {
            (1..=SEATS_PER_ROW).map(move |number| SeatCode { row, number })
        })
    }
}

impl fmt::Display for SeatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row(), self.number)
    }
}

impl FromStr for SeatCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::BadRequest(format!("Invalid seat code: {}", s));

        let mut chars = s.chars();
        let row = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) || digits.starts_with('0') {
            return Err(invalid());
        }
        let number: u8 = digits.parse().map_err(|_| invalid())?;

        SeatCode::new(row, number).ok_or_else(invalid)
    }
}

impl TryFrom<String> for SeatCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatCode> for String {
    fn from(seat: SeatCode) -> Self {
        seat.to_string()
    }
}

/// Seats shown as taken for one wizard session.
///
/// Occupancy is derived from the showtime's available-seat count only: the
/// identities are drawn at random on every generation and nothing ties them
/// to earlier bookings or to other sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatMap {
    occupied: BTreeSet<SeatCode>,
}

impl SeatMap {
    /// Number of seats that must appear taken, clamped to the grid.
    pub fn occupied_count(available_seats: i32) -> usize {
        (TOTAL_SEATS as i64 - available_seats as i64).clamp(0, TOTAL_SEATS as i64) as usize
    }

    pub fn generate(available_seats: i32) -> Self {
        Self::generate_with(available_seats, &mut rand::thread_rng())
    }

    /// Uniform sample without replacement of `occupied_count` seats.
    pub fn generate_with<R: Rng + ?Sized>(available_seats: i32, rng: &mut R) -> Self {
        let seats: Vec<SeatCode> = SeatCode::all().collect();
        let occupied = seats
            .choose_multiple(rng, Self::occupied_count(available_seats))
            .copied()
            .collect();

        Self { occupied }
    }

    pub fn from_occupied(occupied: impl IntoIterator<Item = SeatCode>) -> Self {
        Self {
            occupied: occupied.into_iter().collect(),
        }
    }

    pub fn is_occupied(&self, seat: SeatCode) -> bool {
        self.occupied.contains(&seat)
    }

    pub fn occupied(&self) -> impl Iterator<Item = SeatCode> + '_ {
        self.occupied.iter().copied()
    }

    pub fn occupied_len(&self) -> usize {
        self.occupied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seat_code_round_trips_through_text() {
        let seat: SeatCode = "J12".parse().unwrap();
        assert_eq!(seat.row(), 'J');
        assert_eq!(seat.number(), 12);
        assert_eq!(seat.to_string(), "J12");
    }

    #[test]
    fn test_seat_code_rejects_outside_grid() {
        for code in ["", "A", "A0", "A13", "K1", "a1", "A01", "A1x", "1A"] {
            assert!(code.parse::<SeatCode>().is_err(), "{code} should be rejected");
        }
    }

    #[test]
    fn test_grid_has_120_distinct_seats() {
        let all: BTreeSet<SeatCode> = SeatCode::all().collect();
        assert_eq!(all.len(), TOTAL_SEATS);
        assert_eq!(SeatCode::all().next().unwrap().to_string(), "A1");
        assert_eq!(SeatCode::all().last().unwrap().to_string(), "J12");
    }

    #[test]
    fn test_occupied_count_is_total_minus_available() {
        assert_eq!(SeatMap::occupied_count(120), 0);
        assert_eq!(SeatMap::occupied_count(100), 20);
        assert_eq!(SeatMap::occupied_count(0), 120);
        // Counts outside the grid are clamped
        assert_eq!(SeatMap::occupied_count(150), 0);
        assert_eq!(SeatMap::occupied_count(-4), 120);
    }

    #[test]
    fn test_generate_marks_exact_number_of_seats() {
        let mut rng = StdRng::seed_from_u64(7);
        for available in [0, 1, 57, 119, 120] {
            let map = SeatMap::generate_with(available, &mut rng);
            assert_eq!(map.occupied_len(), SeatMap::occupied_count(available));
        }
    }

    #[test]
    fn test_generate_is_not_stable_between_calls() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = SeatMap::generate_with(60, &mut rng);
        let second = SeatMap::generate_with(60, &mut rng);
        assert_ne!(first, second);
    }
}
