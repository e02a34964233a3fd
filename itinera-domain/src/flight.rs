use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single bookable flight as produced by an inventory search.
/// Immutable once produced; later turns only ever read it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightRecord {
    /// Opaque inventory identifier, e.g. "LH-5614"
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub carrier: String,
    pub departure_time: String,
    /// Price in minor units (cents)
    pub price_amount: i64,
    pub price_currency: String,
}

impl FlightRecord {
    /// Human-readable price for response rendering
    pub fn display_price(&self) -> String {
        let whole = self.price_amount / 100;
        let cents = self.price_amount % 100;
        match self.price_currency.as_str() {
            "USD" if cents == 0 => format!("${}", whole),
            "USD" => format!("${}.{:02}", whole, cents),
            other => format!("{}.{:02} {}", whole, cents, other),
        }
    }
}

/// The parameters that produced a result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
}

/// Ordered results of one search turn. At most one of these is retained
/// per conversation; a new search replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub query: SearchQuery,
    pub turn_index: u32,
    pub created_at: DateTime<Utc>,
    pub flights: Vec<FlightRecord>,
}

impl SearchResultSet {
    pub fn new(query: SearchQuery, turn_index: u32, flights: Vec<FlightRecord>) -> Self {
        Self {
            query,
            turn_index,
            created_at: Utc::now(),
            flights,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
