use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use itinera_core::collaborators::InventoryClient;
use itinera_core::{dates, DialogError, DialogResult};
use itinera_domain::{SearchQuery, SearchResultSet, TurnOutcome};
use tokio::time::timeout;
use tracing::info;

/// Runs one inventory search and stores the results as the new snapshot.
pub struct SearchHandler {
    inventory: Arc<dyn InventoryClient>,
    call_timeout: Duration,
}

impl SearchHandler {
    pub fn new(inventory: Arc<dyn InventoryClient>, call_timeout: Duration) -> Self {
        Self {
            inventory,
            call_timeout,
        }
    }

    /// A missing date reference defaults to the reference date itself; a
    /// present but unrecognized token is an `UnresolvedDate` failure.
    pub async fn handle(
        &self,
        memory: &mut crate::memory::ConversationMemory,
        origin: &str,
        destination: &str,
        date_ref: Option<&str>,
        reference_date: NaiveDate,
        turn_index: u32,
    ) -> DialogResult<TurnOutcome> {
        let date = match date_ref {
            Some(token) => dates::resolve_relative(token, reference_date)?,
            None => reference_date,
        };
        let query = SearchQuery {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date,
        };

        info!(origin, destination, %date, "inventory search");
        let flights = timeout(
            self.call_timeout,
            self.inventory.search(origin, destination, date),
        )
        .await
        .map_err(|_| DialogError::CollaboratorUnavailable {
            collaborator: "inventory".to_string(),
        })??;

        if flights.is_empty() {
            // Keep the previous snapshot so earlier results stay bookable.
            info!(origin, destination, "no flights found, snapshot untouched");
            return Ok(TurnOutcome::NoFlightsFound { query });
        }

        memory.store(SearchResultSet::new(query.clone(), turn_index, flights.clone()));
        Ok(TurnOutcome::SearchResults { query, flights })
    }
}
