use std::sync::Arc;
use std::time::Duration;

use itinera_core::collaborators::ReservationClient;
use itinera_core::{DialogError, DialogResult};
use itinera_domain::TurnOutcome;
use tokio::time::timeout;
use tracing::info;

use crate::memory::ConversationMemory;
use crate::resolver::EntityResolver;

/// Resolves a flight reference against the current snapshot and commits
/// exactly one reservation for it.
pub struct BookingHandler {
    reservations: Arc<dyn ReservationClient>,
    resolver: EntityResolver,
    call_timeout: Duration,
    default_passenger: String,
}

impl BookingHandler {
    pub fn new(
        reservations: Arc<dyn ReservationClient>,
        call_timeout: Duration,
        default_passenger: String,
    ) -> Self {
        Self {
            reservations,
            resolver: EntityResolver::default(),
            call_timeout,
            default_passenger,
        }
    }

    /// Resolver failures propagate with their specific kind so the
    /// controller can ask for clarification; this never silently picks a
    /// default flight.
    pub async fn handle(
        &self,
        memory: &mut ConversationMemory,
        reference: &str,
        passenger: Option<&str>,
    ) -> DialogResult<TurnOutcome> {
        let flight = self.resolver.resolve(reference, memory)?;
        let passenger = passenger.unwrap_or(&self.default_passenger);

        info!(flight_id = %flight.id, passenger, "committing reservation");
        let reservation = timeout(
            self.call_timeout,
            self.reservations.reserve(&flight.id, passenger),
        )
        .await
        .map_err(|_| DialogError::CollaboratorUnavailable {
            collaborator: "reservation".to_string(),
        })??;

        memory.record_reservation(reservation.clone());
        Ok(TurnOutcome::Booked {
            reservation,
            flight,
        })
    }
}
