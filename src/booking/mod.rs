use thiserror::Error;
use uuid::Uuid;

pub mod layout;
pub mod selection;
pub mod session;
pub mod step;
pub mod store;

pub use layout::{generate_layout, SEATS_PER_ROW};
pub use selection::{classify, IgnoreReason, Selection, ToggleOutcome, MAX_SELECTED_SEATS};
pub use session::{BookingSession, LoadTicket, SessionSummary};
pub use step::BookingStep;
pub use store::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("booking session {0} not found")]
    SessionNotFound(Uuid),
    #[error("no show selected")]
    NoShowSelected,
    #[error("no seats selected")]
    EmptySelection,
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: BookingStep, to: BookingStep },
    #[error("show changed from {expected} to {actual} before the booking was confirmed")]
    ShowChanged { expected: String, actual: String },
}
