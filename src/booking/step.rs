use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a visitor is in the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    #[default]
    Movie,
    Show,
    Seats,
    Payment,
    Confirmation,
}

impl BookingStep {
    pub const ALL: [BookingStep; 5] = [
        BookingStep::Movie,
        BookingStep::Show,
        BookingStep::Seats,
        BookingStep::Payment,
        BookingStep::Confirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Movie => "movie",
            BookingStep::Show => "show",
            BookingStep::Seats => "seats",
            BookingStep::Payment => "payment",
            BookingStep::Confirmation => "confirmation",
        }
    }

    /// Transition table for the flow, ignoring session preconditions.
    ///
    /// Forward moves go one step at a time, except that picking a showtime on
    /// the movie page lands directly on `seats`. Going back to any earlier step
    /// is allowed until the booking is confirmed; after that only a reset
    /// leaves `confirmation`.
    pub fn can_move_to(self, next: BookingStep) -> bool {
        use BookingStep::*;
        match (self, next) {
            (from, to) if from == to => true,
            (Confirmation, _) => false,
            (Movie, Show) | (Movie, Seats) | (Show, Seats) | (Seats, Payment) | (Payment, Confirmation) => {
                true
            }
            (from, to) => to < from,
        }
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
