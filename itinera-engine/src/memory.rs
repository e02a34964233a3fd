use itinera_core::{DialogError, DialogResult};
use itinera_domain::{FlightRecord, Reservation, SearchQuery, SearchResultSet};
use tracing::info;

/// Ranking direction for superlative lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceExtreme {
    Min,
    Max,
}

/// Per-conversation state store. Owns the active search snapshot and the
/// reservation history; no other component mutates them. One instance per
/// conversation, passed explicitly, never a process-wide singleton.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    snapshot: Option<SearchResultSet>,
    reservations: Vec<Reservation>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active snapshot. Last search wins; no merge, no history
    /// beyond the latest set.
    pub fn store(&mut self, result_set: SearchResultSet) {
        info!(
            flights = result_set.flights.len(),
            origin = %result_set.query.origin,
            destination = %result_set.query.destination,
            "search snapshot replaced"
        );
        self.snapshot = Some(result_set);
    }

    pub fn snapshot(&self) -> Option<&SearchResultSet> {
        self.snapshot.as_ref()
    }

    /// Query context of the active snapshot, if any
    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.snapshot.as_ref().map(|set| &set.query)
    }

    fn active_flights(&self) -> DialogResult<&[FlightRecord]> {
        match &self.snapshot {
            Some(set) if !set.flights.is_empty() => Ok(&set.flights),
            _ => Err(DialogError::NoActiveSearch),
        }
    }

    /// Exact flight-id lookup, case-insensitive
    pub fn find_by_id(&self, id: &str) -> DialogResult<Option<&FlightRecord>> {
        let needle = id.trim();
        let flights = self.active_flights()?;
        Ok(flights.iter().find(|f| f.id.eq_ignore_ascii_case(needle)))
    }

    /// Carrier substring match, case- and whitespace-insensitive, in
    /// snapshot order. An empty query matches nothing.
    pub fn find_by_carrier(&self, name: &str) -> DialogResult<Vec<&FlightRecord>> {
        let needle = normalize(name);
        let flights = self.active_flights()?;
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(flights
            .iter()
            .filter(|f| normalize(&f.carrier).contains(&needle))
            .collect())
    }

    /// The single record with the globally minimal/maximal price. Ties
    /// keep the first record in result order.
    pub fn find_extreme_by_price(&self, direction: PriceExtreme) -> DialogResult<&FlightRecord> {
        let flights = self.active_flights()?;
        let mut best = &flights[0];
        for flight in &flights[1..] {
            let better = match direction {
                PriceExtreme::Min => flight.price_amount < best.price_amount,
                PriceExtreme::Max => flight.price_amount > best.price_amount,
            };
            if better {
                best = flight;
            }
        }
        Ok(best)
    }

    pub fn record_reservation(&mut self, reservation: Reservation) {
        info!(pnr = %reservation.pnr, flight_id = %reservation.flight_id, "reservation recorded");
        self.reservations.push(reservation);
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
