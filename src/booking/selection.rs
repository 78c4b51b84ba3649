use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{SeatLabel, SeatStatus};

pub const MAX_SELECTED_SEATS: usize = 10;

/// Status of `seat` for the current render. Booked always wins.
pub fn classify(seat: &SeatLabel, booked: &BTreeSet<SeatLabel>, selection: &Selection) -> SeatStatus {
    if booked.contains(seat) {
        SeatStatus::Booked
    } else if selection.contains(seat) {
        SeatStatus::Selected
    } else {
        SeatStatus::Available
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    Booked,
    LimitReached,
    UnknownSeat,
    NoShow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    Ignored(IgnoreReason),
}

impl ToggleOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, ToggleOutcome::Ignored(_))
    }
}

/// Seats picked for the active show, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    seats: Vec<SeatLabel>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `seat`. Adding stops silently at
    /// [`MAX_SELECTED_SEATS`]; removing always succeeds.
    pub fn toggle(&mut self, seat: SeatLabel) -> ToggleOutcome {
        if let Some(index) = self.seats.iter().position(|s| *s == seat) {
            self.seats.remove(index);
            ToggleOutcome::Removed
        } else if self.seats.len() >= MAX_SELECTED_SEATS {
            ToggleOutcome::Ignored(IgnoreReason::LimitReached)
        } else {
            self.seats.push(seat);
            ToggleOutcome::Added
        }
    }

    pub fn contains(&self, seat: &SeatLabel) -> bool {
        self.seats.contains(seat)
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= MAX_SELECTED_SEATS
    }

    pub fn seats(&self) -> &[SeatLabel] {
        &self.seats
    }

    pub fn total(&self, price: u32) -> u64 {
        self.seats.len() as u64 * u64::from(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seat(s: &str) -> SeatLabel {
        s.parse().unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::new();
        assert_eq!(selection.toggle(seat("B4")), ToggleOutcome::Added);
        assert_eq!(selection.toggle(seat("A1")), ToggleOutcome::Added);
        assert_eq!(selection.seats(), [seat("B4"), seat("A1")]);
        assert_eq!(selection.toggle(seat("B4")), ToggleOutcome::Removed);
        assert_eq!(selection.seats(), [seat("A1")]);
    }

    #[test]
    fn eleventh_seat_is_ignored() {
        let mut selection = Selection::new();
        for column in 1..=10 {
            selection.toggle(SeatLabel::new(0, column).unwrap());
        }
        assert!(selection.is_full());
        let before = selection.clone();
        assert_eq!(
            selection.toggle(seat("B1")),
            ToggleOutcome::Ignored(IgnoreReason::LimitReached)
        );
        assert_eq!(selection, before);
        assert_eq!(selection.total(200), 2_000);

        // Removing still works at the cap
        assert_eq!(selection.toggle(seat("A5")), ToggleOutcome::Removed);
        assert_eq!(selection.toggle(seat("B1")), ToggleOutcome::Added);
    }

    #[test]
    fn booked_beats_selected() {
        let booked: BTreeSet<_> = [seat("A1")].into();
        let mut selection = Selection::new();
        selection.toggle(seat("A1"));
        selection.toggle(seat("A2"));
        assert_eq!(classify(&seat("A1"), &booked, &selection), SeatStatus::Booked);
        assert_eq!(classify(&seat("A2"), &booked, &selection), SeatStatus::Selected);
        assert_eq!(classify(&seat("A3"), &booked, &selection), SeatStatus::Available);
    }

    #[test]
    fn outcome_serializes_with_reason() {
        let json = serde_json::to_value(ToggleOutcome::Ignored(IgnoreReason::Booked)).unwrap();
        assert_eq!(json, serde_json::json!({"result": "ignored", "reason": "booked"}));
        let json = serde_json::to_value(ToggleOutcome::Added).unwrap();
        assert_eq!(json, serde_json::json!({"result": "added"}));
    }

    fn seat_strategy() -> impl Strategy<Value = SeatLabel> {
        (0u32..4, 1u32..=10).prop_map(|(row, column)| SeatLabel::new(row, column).unwrap())
    }

    proptest! {
        #[test]
        fn total_tracks_membership(
            toggles in prop::collection::vec(seat_strategy(), 0..60),
            price in 0u32..1_000,
        ) {
            let mut selection = Selection::new();
            for seat in toggles {
                let was_selected = selection.contains(&seat);
                let before_total = selection.total(price);
                let before_len = selection.len();
                match selection.toggle(seat) {
                    ToggleOutcome::Removed => {
                        prop_assert!(was_selected);
                        prop_assert_eq!(selection.total(price), before_total - u64::from(price));
                    }
                    ToggleOutcome::Added => {
                        prop_assert!(!was_selected);
                        prop_assert!(before_len < MAX_SELECTED_SEATS);
                        prop_assert_eq!(selection.total(price), before_total + u64::from(price));
                    }
                    ToggleOutcome::Ignored(reason) => {
                        prop_assert_eq!(reason, IgnoreReason::LimitReached);
                        prop_assert_eq!(before_len, MAX_SELECTED_SEATS);
                        prop_assert_eq!(selection.total(price), before_total);
                    }
                }
                prop_assert!(selection.len() <= MAX_SELECTED_SEATS);
            }
        }

        #[test]
        fn booked_always_classifies_booked(seat in seat_strategy(), select in any::<bool>()) {
            let booked: BTreeSet<_> = [seat].into();
            let mut selection = Selection::new();
            if select {
                selection.toggle(seat);
            }
            prop_assert_eq!(classify(&seat, &booked, &selection), SeatStatus::Booked);
        }
    }
}
