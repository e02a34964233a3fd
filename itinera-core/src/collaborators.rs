use async_trait::async_trait;
use chrono::NaiveDate;
use itinera_domain::{FlightRecord, Reservation, Turn, TurnOutcome};

use crate::DialogResult;

/// Natural-language understanding step. Treated as a pure function from
/// text to structured intent + slots; a parse failure degrades the turn
/// to general chat rather than crashing it.
#[async_trait]
pub trait NluClient: Send + Sync {
    async fn parse(&self, text: &str) -> DialogResult<Turn>;
}

/// Flight inventory lookup. May legitimately return an empty list.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    async fn search(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> DialogResult<Vec<FlightRecord>>;
}

/// Reservation commit. PNR generation must be deterministic and unique
/// for the lifetime of the client.
#[async_trait]
pub trait ReservationClient: Send + Sync {
    async fn reserve(&self, flight_id: &str, passenger_name: &str) -> DialogResult<Reservation>;
}

/// Natural-language generation step. Pure formatting over the structured
/// outcome; must not alter facts.
#[async_trait]
pub trait NlgClient: Send + Sync {
    async fn render(&self, outcome: &TurnOutcome) -> DialogResult<String>;
}
