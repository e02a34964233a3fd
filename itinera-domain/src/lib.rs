pub mod flight;
pub mod reservation;
pub mod turn;

pub use flight::{FlightRecord, SearchQuery, SearchResultSet};
pub use reservation::{Reservation, ReservationStatus};
pub use turn::{ClarificationKind, Intent, Turn, TurnOutcome, TurnSlots};
