pub mod booking;
pub mod filter;
pub mod movie;
pub mod seat;
pub mod show;

pub use booking::{Booking, BookingStatus};
pub use filter::{FilterOptions, MovieFilters};
pub use movie::Movie;
pub use seat::{row_name, SeatLabel, SeatStatus};
pub use show::Show;
