use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Confirmed,
    Failed,
}

/// A committed booking. Created only by the booking handler and
/// immutable once committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Passenger Name Record, the booking confirmation identifier
    pub pnr: String,
    pub flight_id: String,
    pub passenger_name: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}
