use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::layout;
use super::selection::{classify, IgnoreReason, Selection, ToggleOutcome, MAX_SELECTED_SEATS};
use super::step::BookingStep;
use super::BookingError;
use crate::models::{Booking, BookingStatus, SeatLabel, SeatStatus, Show};

/// Proof that a show load was started. Only the most recent ticket may
/// apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// One visitor's booking state.
///
/// Every change goes through a named operation so the selection never
/// contains a booked seat and the total always matches the selection.
#[derive(Debug, Clone)]
pub struct BookingSession {
    id: Uuid,
    selected_show: Option<Show>,
    selection: Selection,
    total_amount: u64,
    step: BookingStep,
    booking_id: Option<Uuid>,
    bookings: Vec<Booking>,
    load_generation: u64,
    last_active: DateTime<Utc>,
}

impl BookingSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            selected_show: None,
            selection: Selection::new(),
            total_amount: 0,
            step: BookingStep::Movie,
            booking_id: None,
            bookings: Vec::new(),
            load_generation: 0,
            last_active: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn selected_show(&self) -> Option<&Show> {
        self.selected_show.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn booking_id(&self) -> Option<Uuid> {
        self.booking_id
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub(crate) fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    #[cfg(test)]
    pub(crate) fn set_last_active(&mut self, at: DateTime<Utc>) {
        self.last_active = at;
    }

    /// Starts loading a show; any ticket issued earlier becomes stale.
    pub fn begin_show_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Applies a loaded show if `ticket` is still the latest one. Returns
    /// whether the show was applied.
    pub fn finish_show_load(&mut self, ticket: LoadTicket, show: Show) -> Result<bool, BookingError> {
        if ticket.0 != self.load_generation {
            debug!(
                session = %self.id,
                show = %show.id,
                "dropping superseded show load"
            );
            return Ok(false);
        }
        self.select_show(show)?;
        Ok(true)
    }

    /// Makes `show` the active show and moves to seat selection. Picking a
    /// different show starts a fresh selection.
    ///
    /// Follows the same transition table as [`BookingSession::set_step`], so a
    /// confirmed session has to be reset first.
    pub fn select_show(&mut self, show: Show) -> Result<(), BookingError> {
        if !self.step.can_move_to(BookingStep::Seats) {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: BookingStep::Seats,
            });
        }
        let same_show = self
            .selected_show
            .as_ref()
            .is_some_and(|current| current.id == show.id);
        if !same_show {
            self.selection.clear();
        }
        debug!(session = %self.id, show = %show.id, "show selected");
        self.selected_show = Some(show);
        self.step = BookingStep::Seats;
        self.recompute_total();
        Ok(())
    }

    pub fn seat_status(&self, seat: &SeatLabel) -> Option<SeatStatus> {
        let show = self.selected_show.as_ref()?;
        Some(classify(seat, &show.booked_seats, &self.selection))
    }

    /// Toggles `seat` for the active show.
    ///
    /// Booked seats, seats outside the hall and additions past the cap are
    /// ignored rather than reported as errors.
    pub fn toggle_seat(&mut self, seat: SeatLabel) -> ToggleOutcome {
        let Some(show) = self.selected_show.as_ref() else {
            return ToggleOutcome::Ignored(IgnoreReason::NoShow);
        };
        if !layout::contains(show.total_seats, &seat) {
            return ToggleOutcome::Ignored(IgnoreReason::UnknownSeat);
        }
        if show.is_booked(&seat) {
            return ToggleOutcome::Ignored(IgnoreReason::Booked);
        }
        let outcome = self.selection.toggle(seat);
        self.recompute_total();
        debug!(
            session = %self.id,
            %seat,
            ?outcome,
            selected = self.selection.len(),
            "seat toggled"
        );
        outcome
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.total_amount = 0;
    }

    /// Moves to `next` if the transition table and the session allow it.
    ///
    /// `confirmation` is only reachable through [`BookingSession::confirm`].
    pub fn set_step(&mut self, next: BookingStep) -> Result<(), BookingError> {
        let invalid = BookingError::InvalidTransition {
            from: self.step,
            to: next,
        };
        if next == BookingStep::Confirmation && self.step != BookingStep::Confirmation {
            return Err(invalid);
        }
        if !self.step.can_move_to(next) {
            return Err(invalid);
        }
        if next >= BookingStep::Seats && self.selected_show.is_none() {
            return Err(BookingError::NoShowSelected);
        }
        if next >= BookingStep::Payment && self.selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        self.step = next;
        Ok(())
    }

    /// Turns the current selection into a confirmed booking.
    ///
    /// `show_id` is the show `movie_title` was looked up for. If the session
    /// switched shows in the meantime nothing is booked.
    pub fn confirm(&mut self, show_id: &str, movie_title: &str) -> Result<Booking, BookingError> {
        if !self.step.can_move_to(BookingStep::Confirmation) || self.step == BookingStep::Confirmation {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: BookingStep::Confirmation,
            });
        }
        let show = self.selected_show.as_ref().ok_or(BookingError::NoShowSelected)?;
        if show.id != show_id {
            return Err(BookingError::ShowChanged {
                expected: show_id.to_string(),
                actual: show.id.clone(),
            });
        }
        if self.selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            show_id: show.id.clone(),
            movie_title: movie_title.to_string(),
            theater: show.theater.clone(),
            screen: show.screen.clone(),
            show_time: show.show_time.clone(),
            date: show.date,
            seats: self.selection.seats().to_vec(),
            total_amount: self.total_amount,
            booking_date: Utc::now(),
            status: BookingStatus::Confirmed,
            qr_code: None,
        };
        info!(
            session = %self.id,
            booking = %booking.id,
            show = %booking.show_id,
            seats = booking.seats.len(),
            total = booking.total_amount,
            "booking confirmed"
        );
        self.booking_id = Some(booking.id);
        self.bookings.push(booking.clone());
        self.step = BookingStep::Confirmation;
        Ok(booking)
    }

    /// Back to the start: no show, no seats, nothing owed. Booking history
    /// is kept, and in-flight show loads are invalidated.
    pub fn reset(&mut self) {
        self.selected_show = None;
        self.selection.clear();
        self.total_amount = 0;
        self.step = BookingStep::Movie;
        self.booking_id = None;
        self.load_generation += 1;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            step: self.step,
            show: self.selected_show.clone(),
            selected_seats: self.selection.seats().to_vec(),
            total_amount: self.total_amount,
            max_seats: MAX_SELECTED_SEATS,
            limit_reached: self.selection.is_full(),
            booking_id: self.booking_id,
        }
    }

    fn recompute_total(&mut self) {
        let price = self.selected_show.as_ref().map_or(0, |show| show.price);
        self.total_amount = self.selection.total(price);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: Uuid,
    pub step: BookingStep,
    pub show: Option<Show>,
    pub selected_seats: Vec<SeatLabel>,
    pub total_amount: u64,
    pub max_seats: usize,
    pub limit_reached: bool,
    pub booking_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn show(id: &str) -> Show {
        seed::load()
            .unwrap()
            .shows
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
    }

    fn seat(s: &str) -> SeatLabel {
        s.parse().unwrap()
    }

    fn session_with(show_id: &str) -> BookingSession {
        let mut session = BookingSession::new(Uuid::new_v4());
        session.select_show(show(show_id)).unwrap();
        session
    }

    #[test]
    fn toggling_updates_total() {
        let mut session = session_with("s1");
        assert_eq!(session.step(), BookingStep::Seats);

        assert_eq!(session.toggle_seat(seat("A3")), ToggleOutcome::Added);
        assert_eq!(session.toggle_seat(seat("A4")), ToggleOutcome::Added);
        assert_eq!(session.total_amount(), 400);
        assert_eq!(session.seat_status(&seat("A3")), Some(SeatStatus::Selected));

        assert_eq!(session.toggle_seat(seat("A3")), ToggleOutcome::Removed);
        assert_eq!(session.total_amount(), 200);
    }

    #[test]
    fn booked_and_unknown_seats_are_ignored() {
        let mut session = session_with("s1");
        assert_eq!(
            session.toggle_seat(seat("A1")),
            ToggleOutcome::Ignored(IgnoreReason::Booked)
        );
        // s3 has 80 seats, rows A..H
        let mut small = session_with("s3");
        assert_eq!(
            small.toggle_seat(seat("I1")),
            ToggleOutcome::Ignored(IgnoreReason::UnknownSeat)
        );
        assert!(session.selection().is_empty());
        assert_eq!(session.total_amount(), 0);
    }

    #[test]
    fn toggle_without_show_is_ignored() {
        let mut session = BookingSession::new(Uuid::new_v4());
        assert_eq!(
            session.toggle_seat(seat("A3")),
            ToggleOutcome::Ignored(IgnoreReason::NoShow)
        );
        assert_eq!(session.seat_status(&seat("A3")), None);
    }

    #[test]
    fn cap_holds_at_ten_seats() {
        let mut session = session_with("s4");
        for column in 1..=10 {
            session.toggle_seat(SeatLabel::new(5, column).unwrap());
        }
        assert_eq!(session.total_amount(), 1_800);
        assert_eq!(
            session.toggle_seat(seat("G1")),
            ToggleOutcome::Ignored(IgnoreReason::LimitReached)
        );
        assert_eq!(session.selection().len(), 10);
        assert_eq!(session.total_amount(), 1_800);
        assert!(session.summary().limit_reached);
    }

    #[test]
    fn new_show_clears_selection_same_show_keeps_it() {
        let mut session = session_with("s1");
        session.toggle_seat(seat("B1"));
        session.select_show(show("s1")).unwrap();
        assert_eq!(session.selection().len(), 1);

        session.select_show(show("s2")).unwrap();
        assert!(session.selection().is_empty());
        assert_eq!(session.total_amount(), 0);
    }

    #[test]
    fn stale_load_does_not_overwrite_newer_one() {
        let mut session = BookingSession::new(Uuid::new_v4());
        let first = session.begin_show_load();
        let second = session.begin_show_load();

        assert_eq!(session.finish_show_load(second, show("s2")), Ok(true));
        assert_eq!(session.finish_show_load(first, show("s1")), Ok(false));
        assert_eq!(session.selected_show().unwrap().id, "s2");
    }

    #[test]
    fn reset_invalidates_in_flight_loads() {
        let mut session = BookingSession::new(Uuid::new_v4());
        let ticket = session.begin_show_load();
        session.reset();
        assert_eq!(session.finish_show_load(ticket, show("s1")), Ok(false));
        assert!(session.selected_show().is_none());
    }

    #[test]
    fn step_transitions_check_preconditions() {
        let mut session = BookingSession::new(Uuid::new_v4());
        assert_eq!(session.set_step(BookingStep::Seats), Err(BookingError::NoShowSelected));
        assert!(matches!(
            session.set_step(BookingStep::Confirmation),
            Err(BookingError::InvalidTransition { .. })
        ));

        session.select_show(show("s1")).unwrap();
        assert_eq!(session.set_step(BookingStep::Payment), Err(BookingError::EmptySelection));
        session.toggle_seat(seat("C5"));
        session.set_step(BookingStep::Payment).unwrap();
        session.set_step(BookingStep::Seats).unwrap();
        session.set_step(BookingStep::Payment).unwrap();
        assert!(session.set_step(BookingStep::Confirmation).is_err());
    }

    #[test]
    fn confirm_records_booking() {
        let mut session = session_with("s2");
        session.toggle_seat(seat("E4"));
        session.toggle_seat(seat("E5"));

        assert!(session.confirm("s2", "Avengers: Endgame").is_err(), "must pass through payment");
        session.set_step(BookingStep::Payment).unwrap();

        let booking = session.confirm("s2", "Avengers: Endgame").unwrap();
        assert_eq!(booking.total_amount, 500);
        assert_eq!(booking.seats, [seat("E4"), seat("E5")]);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(session.step(), BookingStep::Confirmation);
        assert_eq!(session.booking_id(), Some(booking.id));
        assert_eq!(session.bookings().len(), 1);

        assert!(session.confirm("s2", "Avengers: Endgame").is_err());
        assert!(session.set_step(BookingStep::Seats).is_err());
        assert!(booking.qr_code.is_none());
    }

    #[test]
    fn confirmed_session_needs_reset_before_new_show() {
        let mut session = session_with("s2");
        session.toggle_seat(seat("E4"));
        session.set_step(BookingStep::Payment).unwrap();
        let booking = session.confirm("s2", "Avengers: Endgame").unwrap();

        assert_eq!(
            session.select_show(show("s1")),
            Err(BookingError::InvalidTransition {
                from: BookingStep::Confirmation,
                to: BookingStep::Seats,
            })
        );
        assert_eq!(session.step(), BookingStep::Confirmation);
        assert_eq!(session.selected_show().unwrap().id, "s2");
        assert_eq!(session.booking_id(), Some(booking.id));

        // A load finishing after confirmation is refused the same way
        let ticket = session.begin_show_load();
        assert!(session.finish_show_load(ticket, show("s1")).is_err());

        session.reset();
        session.select_show(show("s1")).unwrap();
        assert_eq!(session.step(), BookingStep::Seats);
    }

    #[test]
    fn confirm_refuses_when_show_changed() {
        let mut session = session_with("s1");
        session.toggle_seat(seat("C5"));
        session.set_step(BookingStep::Payment).unwrap();

        // The title was looked up for s1, then the visitor moved to s4
        session.set_step(BookingStep::Seats).unwrap();
        session.select_show(show("s4")).unwrap();
        session.toggle_seat(seat("E6"));
        session.set_step(BookingStep::Payment).unwrap();

        assert_eq!(
            session.confirm("s1", "Avengers: Endgame"),
            Err(BookingError::ShowChanged {
                expected: "s1".into(),
                actual: "s4".into(),
            })
        );
        assert!(session.bookings().is_empty());
        assert_eq!(session.step(), BookingStep::Payment);

        let booking = session.confirm("s4", "The Dark Knight").unwrap();
        assert_eq!(booking.movie_title, "The Dark Knight");
        assert_eq!(booking.total_amount, 180);
    }

    #[test]
    fn confirm_requires_seats() {
        let mut session = session_with("s2");
        session.step = BookingStep::Payment;
        assert_eq!(session.confirm("s2", "x"), Err(BookingError::EmptySelection));
    }

    #[test]
    fn reset_returns_to_start_from_anywhere() {
        let mut session = session_with("s2");
        session.toggle_seat(seat("E4"));
        session.set_step(BookingStep::Payment).unwrap();
        session.confirm("s2", "Avengers: Endgame").unwrap();

        session.reset();
        assert_eq!(session.step(), BookingStep::Movie);
        assert!(session.selected_show().is_none());
        assert!(session.selection().is_empty());
        assert_eq!(session.total_amount(), 0);
        assert_eq!(session.booking_id(), None);
        assert_eq!(session.bookings().len(), 1);
    }

    #[test]
    fn clear_selection_keeps_show() {
        let mut session = session_with("s2");
        session.toggle_seat(seat("E4"));
        session.clear_selection();
        assert!(session.selection().is_empty());
        assert_eq!(session.total_amount(), 0);
        assert!(session.selected_show().is_some());
        assert_eq!(session.step(), BookingStep::Seats);
    }
}
