use serde::{Deserialize, Serialize};

use crate::flight::{FlightRecord, SearchQuery};
use crate::reservation::Reservation;

/// Intent extracted by the NLU collaborator for one utterance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Search,
    Book,
    General,
}

/// Slot values extracted by the NLU collaborator. All optional; the
/// handlers decide what a missing slot means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnSlots {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Relative date reference as the user phrased it, e.g. "tomorrow"
    pub date_ref: Option<String>,
    /// Free-text flight reference, e.g. "the Lufthansa one" or "cheapest"
    pub reference: Option<String>,
    pub passenger: Option<String>,
}

/// One parsed user utterance. Ephemeral; not persisted beyond its turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub raw_text: String,
    pub intent: Intent,
    pub slots: TurnSlots,
}

impl Turn {
    pub fn new(raw_text: impl Into<String>, intent: Intent, slots: TurnSlots) -> Self {
        Self {
            raw_text: raw_text.into(),
            intent,
            slots,
        }
    }

    /// Degraded turn used when NLU output is missing or malformed
    pub fn general(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, Intent::General, TurnSlots::default())
    }
}

/// Why the controller is asking the user to clarify
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClarificationKind {
    UnresolvedDate,
    NoActiveSearch,
    AmbiguousReference,
    UnresolvedReference,
}

/// Structured result of one turn, rich enough for the NLG collaborator
/// to phrase a response without inventing facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnOutcome {
    SearchResults {
        query: SearchQuery,
        flights: Vec<FlightRecord>,
    },
    NoFlightsFound {
        query: SearchQuery,
    },
    Booked {
        reservation: Reservation,
        flight: FlightRecord,
    },
    Clarification {
        clarification: ClarificationKind,
        detail: String,
        candidates: Vec<FlightRecord>,
    },
    Unavailable {
        collaborator: String,
    },
    PassThrough {
        message: String,
    },
}

impl TurnOutcome {
    /// Deterministic plain-text rendering. Doubles as the fallback when
    /// the NLG collaborator itself is unavailable.
    pub fn summary(&self) -> String {
        match self {
            TurnOutcome::SearchResults { query, flights } => {
                let mut lines = vec![format!(
                    "Found {} option(s) from {} to {} on {}:",
                    flights.len(),
                    query.origin,
                    query.destination,
                    query.date
                )];
                for flight in flights {
                    lines.push(format!(
                        "- {} ({}): {} at {}",
                        flight.carrier,
                        flight.id,
                        flight.display_price(),
                        flight.departure_time
                    ));
                }
                lines.join("\n")
            }
            TurnOutcome::NoFlightsFound { query } => format!(
                "No flights found from {} to {} on {}.",
                query.origin, query.destination, query.date
            ),
            TurnOutcome::Booked {
                reservation,
                flight,
            } => format!(
                "Booking confirmed. Airline: {}. Flight: {}. Passenger: {}. PNR: {}.",
                flight.carrier, flight.id, reservation.passenger_name, reservation.pnr
            ),
            TurnOutcome::Clarification {
                detail, candidates, ..
            } => {
                if candidates.is_empty() {
                    detail.clone()
                } else {
                    let mut lines = vec![detail.clone()];
                    for flight in candidates {
                        lines.push(format!(
                            "- {} ({}): {}",
                            flight.carrier,
                            flight.id,
                            flight.display_price()
                        ));
                    }
                    lines.join("\n")
                }
            }
            TurnOutcome::Unavailable { collaborator } => format!(
                "Sorry, the {} service is not responding right now. Please try again shortly.",
                collaborator
            ),
            TurnOutcome::PassThrough { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::ReservationStatus;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_booked_summary_carries_pnr_and_flight() {
        let flight = FlightRecord {
            id: "LH-5614".to_string(),
            origin: "NYC".to_string(),
            destination: "LAX".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            carrier: "Lufthansa".to_string(),
            departure_time: "08:00 PM".to_string(),
            price_amount: 45000,
            price_currency: "USD".to_string(),
        };
        let outcome = TurnOutcome::Booked {
            reservation: Reservation {
                pnr: "PNRA1B2C3".to_string(),
                flight_id: flight.id.clone(),
                passenger_name: "Robin".to_string(),
                status: ReservationStatus::Confirmed,
                created_at: Utc::now(),
            },
            flight,
        };
        let text = outcome.summary();
        assert!(text.contains("LH-5614"));
        assert!(text.contains("PNRA1B2C3"));
        assert!(text.contains("Robin"));
    }

    #[test]
    fn test_general_turn_has_no_slots() {
        let turn = Turn::general("hello there");
        assert_eq!(turn.intent, Intent::General);
        assert!(turn.slots.origin.is_none());
        assert!(turn.slots.reference.is_none());
    }
}
