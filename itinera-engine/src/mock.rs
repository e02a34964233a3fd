//! In-process collaborator implementations for tests and hosts without a
//! live NLU/NLG model or inventory backend.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use itinera_core::collaborators::{InventoryClient, NlgClient, NluClient, ReservationClient};
use itinera_core::{DialogError, DialogResult};
use itinera_domain::{FlightRecord, Reservation, ReservationStatus, Turn, TurnOutcome};
use uuid::Uuid;

/// NLU stand-in that replays pre-parsed turns in order. Running past the
/// script is a collaborator failure, which the controller degrades to a
/// general turn.
pub struct ScriptedNlu {
    turns: Mutex<VecDeque<Turn>>,
}

impl ScriptedNlu {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
        }
    }
}

#[async_trait]
impl NluClient for ScriptedNlu {
    async fn parse(&self, text: &str) -> DialogResult<Turn> {
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DialogError::Collaborator {
                collaborator: "nlu".to_string(),
                message: format!("no scripted turn for '{}'", text),
            })
    }
}

struct FlightSeed {
    id: String,
    carrier: String,
    departure_time: String,
    price_amount: i64,
}

/// Deterministic inventory keyed by (origin, destination). Unknown routes
/// return an empty result, never an error.
#[derive(Default)]
pub struct FixtureInventory {
    routes: HashMap<(String, String), Vec<FlightSeed>>,
}

impl FixtureInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flight(
        mut self,
        origin: &str,
        destination: &str,
        id: &str,
        carrier: &str,
        departure_time: &str,
        price_amount: i64,
    ) -> Self {
        self.routes
            .entry(route_key(origin, destination))
            .or_default()
            .push(FlightSeed {
                id: id.to_string(),
                carrier: carrier.to_string(),
                departure_time: departure_time.to_string(),
                price_amount,
            });
        self
    }

    /// The reference demo inventory: one London to Paris route with three
    /// carriers at distinct price points.
    pub fn demo() -> Self {
        Self::new()
            .with_flight("London", "Paris", "BA-2847", "British Airways", "09:00 AM", 42000)
            .with_flight("London", "Paris", "AF-1923", "Air France", "02:00 PM", 30000)
            .with_flight("London", "Paris", "LH-5614", "Lufthansa", "08:00 PM", 60000)
    }
}

fn route_key(origin: &str, destination: &str) -> (String, String) {
    (
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase(),
    )
}

#[async_trait]
impl InventoryClient for FixtureInventory {
    async fn search(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> DialogResult<Vec<FlightRecord>> {
        let seeds = match self.routes.get(&route_key(origin, destination)) {
            Some(seeds) => seeds,
            None => return Ok(Vec::new()),
        };
        Ok(seeds
            .iter()
            .map(|seed| FlightRecord {
                id: seed.id.clone(),
                origin: origin.to_string(),
                destination: destination.to_string(),
                date,
                carrier: seed.carrier.clone(),
                departure_time: seed.departure_time.clone(),
                price_amount: seed.price_amount,
                price_currency: "USD".to_string(),
            })
            .collect())
    }
}

/// Reservation desk that issues "PNR" + 6 upper-hex confirmation codes.
/// Random tokens with a collision check against everything already issued
/// keep PNRs unique for the lifetime of the client.
#[derive(Default)]
pub struct MockReservations {
    issued: Mutex<HashSet<String>>,
}

impl MockReservations {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationClient for MockReservations {
    async fn reserve(&self, flight_id: &str, passenger_name: &str) -> DialogResult<Reservation> {
        let mut issued = self.issued.lock().unwrap();
        let pnr = loop {
            let token = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
            let candidate = format!("PNR{}", token);
            if issued.insert(candidate.clone()) {
                break candidate;
            }
        };
        Ok(Reservation {
            pnr,
            flight_id: flight_id.to_string(),
            passenger_name: passenger_name.to_string(),
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        })
    }
}

/// NLG stand-in that emits the deterministic plain rendering of the
/// outcome, unchanged.
pub struct TemplateNlg;

#[async_trait]
impl NlgClient for TemplateNlg {
    async fn render(&self, outcome: &TurnOutcome) -> DialogResult<String> {
        Ok(outcome.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_inventory_unknown_route_is_empty() {
        let inventory = FixtureInventory::demo();
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let flights = inventory.search("Oslo", "Reykjavik", date).await.unwrap();
        assert!(flights.is_empty());
    }

    #[tokio::test]
    async fn test_fixture_inventory_stamps_query_onto_records() {
        let inventory = FixtureInventory::demo();
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let flights = inventory.search("LONDON", "paris", date).await.unwrap();
        assert_eq!(flights.len(), 3);
        assert!(flights.iter().all(|f| f.date == date));
        assert!(flights.iter().all(|f| f.origin == "LONDON"));
    }

    #[tokio::test]
    async fn test_reservation_pnrs_are_unique() {
        let desk = MockReservations::new();
        let a = desk.reserve("LH-5614", "Robin").await.unwrap();
        let b = desk.reserve("AF-1923", "Robin").await.unwrap();
        assert!(a.pnr.starts_with("PNR"));
        assert_eq!(a.pnr.len(), 9);
        assert_ne!(a.pnr, b.pnr);
        assert_eq!(a.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_scripted_nlu_exhaustion_is_a_collaborator_error() {
        let nlu = ScriptedNlu::new(vec![]);
        let err = nlu.parse("hello").await.unwrap_err();
        assert!(matches!(err, DialogError::Collaborator { ref collaborator, .. } if collaborator == "nlu"));
    }
}
