pub mod seat_map;
pub mod selection;

pub use seat_map::{generate_seat_map, Seat, SeatMap, SeatRow, SeatingError};
pub use selection::{SeatSelection, ToggleOutcome};
