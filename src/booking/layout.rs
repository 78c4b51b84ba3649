use std::ops::Range;

use crate::models::SeatLabel;

pub const SEATS_PER_ROW: u32 = 10;

/// Rows of seat labels for a hall of `total_seats`.
///
/// Rows run `A`, `B`, ... with columns restarting at 1; the last row holds
/// whatever is left over.
pub fn generate_layout(total_seats: u32) -> Vec<Vec<SeatLabel>> {
    (0..total_seats.div_ceil(SEATS_PER_ROW))
        .map(|row| {
            row_indices(row, total_seats)
                .map(|index| SeatLabel::from_index(index, SEATS_PER_ROW))
                .collect()
        })
        .collect()
}

// Zero-based seat indices making up `row`
fn row_indices(row: u32, total_seats: u32) -> Range<u32> {
    let first = row.saturating_mul(SEATS_PER_ROW).min(total_seats);
    let last = first.saturating_add(SEATS_PER_ROW).min(total_seats);
    first..last
}

/// Whether `seat` exists in a hall of `total_seats`.
pub fn contains(total_seats: u32, seat: &SeatLabel) -> bool {
    if seat.column() > SEATS_PER_ROW {
        return false;
    }
    let index = u64::from(seat.row()) * u64::from(SEATS_PER_ROW) + u64::from(seat.column());
    index <= u64::from(total_seats)
}
