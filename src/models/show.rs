use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::seat::SeatLabel;

/// A scheduled screening, as fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    pub movie_id: String,
    pub theater: String,
    pub screen: String,
    pub show_time: String,
    pub date: NaiveDate,
    pub city: String,
    pub price: u32,
    pub total_seats: u32,
    pub booked_seats: BTreeSet<SeatLabel>,
}

impl Show {
    pub fn is_booked(&self, seat: &SeatLabel) -> bool {
        self.booked_seats.contains(seat)
    }

    pub fn available_seats(&self) -> u32 {
        let booked = u32::try_from(self.booked_seats.len()).unwrap_or(u32::MAX);
        self.total_seats.saturating_sub(booked)
    }
}
