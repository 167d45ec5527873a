use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::seat::{SeatCode, SeatMap};

/// Number of tickets requested for one booking, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct TicketCount(u8);

impl TicketCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Clamps any requested count into the allowed range.
    pub fn new(requested: i64) -> Self {
        Self(requested.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl From<i64> for TicketCount {
    fn from(requested: i64) -> Self {
        Self::new(requested)
    }
}

impl From<TicketCount> for u8 {
    fn from(count: TicketCount) -> Self {
        count.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatState {
    Available,
    Selected,
    Occupied,
}

/// What a click on a seat did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatToggle {
    Selected,
    Deselected,
    Ignored,
}

pub fn total_amount(seat_count: usize, unit_price: Decimal) -> Decimal {
    unit_price * Decimal::from(seat_count as u64)
}

/// Seats picked on the seat step, in click order.
#[derive(Debug, Clone)]
pub struct SeatSelection {
    ticket_count: TicketCount,
    seat_map: SeatMap,
    selected: Vec<SeatCode>,
}

impl SeatSelection {
    pub fn new(ticket_count: TicketCount, seat_map: SeatMap) -> Self {
        Self {
            ticket_count,
            seat_map,
            selected: Vec::with_capacity(ticket_count.get()),
        }
    }

    /// Occupied seats are ignored, a selected seat is released, and a free
    /// seat is taken only while fewer than `ticket_count` are held.
    pub fn toggle(&mut self, seat: SeatCode) -> SeatToggle {
        if self.seat_map.is_occupied(seat) {
            return SeatToggle::Ignored;
        }

        if let Some(pos) = self.selected.iter().position(|s| *s == seat) {
            self.selected.remove(pos);
            SeatToggle::Deselected
        } else if self.selected.len() < self.ticket_count.get() {
            self.selected.push(seat);
            SeatToggle::Selected
        } else {
            SeatToggle::Ignored
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.selected.len() == self.ticket_count.get()
    }

    pub fn selected(&self) -> &[SeatCode] {
        &self.selected
    }

    pub fn ticket_count(&self) -> TicketCount {
        self.ticket_count
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn seat_state(&self, seat: SeatCode) -> SeatState {
        if self.seat_map.is_occupied(seat) {
            SeatState::Occupied
        } else if self.selected.contains(&seat) {
            SeatState::Selected
        } else {
            SeatState::Available
        }
    }

    pub fn total_amount(&self, unit_price: Decimal) -> Decimal {
        total_amount(self.selected.len(), unit_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::booking::seat::TOTAL_SEATS;

    fn seat(code: &str) -> SeatCode {
        code.parse().unwrap()
    }

    #[test]
    fn test_ticket_count_is_clamped() {
        assert_eq!(TicketCount::new(0).get(), 1);
        assert_eq!(TicketCount::new(-3).get(), 1);
        assert_eq!(TicketCount::new(4).get(), 4);
        assert_eq!(TicketCount::new(11).get(), 10);

        let parsed: TicketCount = serde_json::from_str("25").unwrap();
        assert_eq!(parsed.get(), 10);
    }

    #[test]
    fn test_two_tickets_at_250() {
        let mut selection = SeatSelection::new(TicketCount::new(2), SeatMap::default());
        let price = Decimal::from(250);

        assert_eq!(selection.toggle(seat("A1")), SeatToggle::Selected);
        assert!(!selection.can_confirm());
        assert_eq!(selection.total_amount(price), Decimal::from(250));

        assert_eq!(selection.toggle(seat("A2")), SeatToggle::Selected);
        assert!(selection.can_confirm());
        assert_eq!(selection.total_amount(price), Decimal::from(500));
        assert_eq!(selection.selected(), &[seat("A1"), seat("A2")]);
    }

    #[test]
    fn test_occupied_seat_click_is_ignored() {
        let map = SeatMap::from_occupied([seat("B3")]);
        let mut selection = SeatSelection::new(TicketCount::new(2), map);

        assert_eq!(selection.toggle(seat("B3")), SeatToggle::Ignored);
        assert!(selection.selected().is_empty());
        assert_eq!(selection.seat_state(seat("B3")), SeatState::Occupied);
    }

    #[test]
    fn test_extra_seat_is_ignored_and_deselect_frees_a_slot() {
        let mut selection = SeatSelection::new(TicketCount::new(1), SeatMap::default());

        selection.toggle(seat("C1"));
        assert_eq!(selection.toggle(seat("C2")), SeatToggle::Ignored);
        assert_eq!(selection.selected(), &[seat("C1")]);

        assert_eq!(selection.toggle(seat("C1")), SeatToggle::Deselected);
        assert_eq!(selection.toggle(seat("C2")), SeatToggle::Selected);
        assert_eq!(selection.seat_state(seat("C1")), SeatState::Available);
        assert_eq!(selection.seat_state(seat("C2")), SeatState::Selected);
    }

    fn any_seat() -> impl Strategy<Value = SeatCode> {
        (0..TOTAL_SEATS).prop_map(|i| SeatCode::all().nth(i).unwrap())
    }

    proptest! {
        #[test]
        fn prop_confirm_iff_exactly_n_free_seats_selected(
            n in 1i64..=10,
            occupied in proptest::collection::vec(any_seat(), 0..60),
            clicks in proptest::collection::vec(any_seat(), 0..40),
        ) {
            let map = SeatMap::from_occupied(occupied);
            let mut selection = SeatSelection::new(TicketCount::new(n), map.clone());
            let price = Decimal::from(180);

            for click in clicks {
                let before = selection.selected().to_vec();
                let outcome = selection.toggle(click);

                if map.is_occupied(click) {
                    prop_assert_eq!(outcome, SeatToggle::Ignored);
                    prop_assert_eq!(selection.selected(), before.as_slice());
                }
                if before.len() == n as usize && !before.contains(&click) {
                    prop_assert_eq!(outcome, SeatToggle::Ignored);
                }

                prop_assert!(selection.selected().len() <= n as usize);
                prop_assert!(selection.selected().iter().all(|s| !map.is_occupied(*s)));
                prop_assert_eq!(selection.can_confirm(), selection.selected().len() == n as usize);
                prop_assert_eq!(
                    selection.total_amount(price),
                    price * Decimal::from(selection.selected().len() as u64)
                );
            }
        }
    }
}
