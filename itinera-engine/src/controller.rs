use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use itinera_core::collaborators::{InventoryClient, NlgClient, NluClient, ReservationClient};
use itinera_core::DialogError;
use itinera_domain::{ClarificationKind, Intent, Turn, TurnOutcome};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::booking::BookingHandler;
use crate::memory::ConversationMemory;
use crate::search::SearchHandler;
use crate::settings::EngineSettings;

const GENERAL_REPLY: &str =
    "I can help you search for and book flights. Where would you like to go?";

/// Where the controller is inside one turn. Always returns to
/// `AwaitingIntent` before the turn completes; nothing but the memory
/// carries over between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingIntent,
    Searching,
    Booking,
}

/// Orchestrates one conversation: NLU parse, dispatch to exactly one
/// handler, and conversion of every failure into a structured outcome.
/// Owns the conversation's memory; one controller per conversation.
pub struct TurnController {
    nlu: Arc<dyn NluClient>,
    nlg: Arc<dyn NlgClient>,
    search: SearchHandler,
    booking: BookingHandler,
    memory: ConversationMemory,
    settings: EngineSettings,
    state: ControllerState,
    turn_index: u32,
}

impl TurnController {
    pub fn new(
        nlu: Arc<dyn NluClient>,
        inventory: Arc<dyn InventoryClient>,
        reservations: Arc<dyn ReservationClient>,
        nlg: Arc<dyn NlgClient>,
        settings: EngineSettings,
    ) -> Self {
        let call_timeout = settings.collaborator_timeout();
        Self {
            nlu,
            nlg,
            search: SearchHandler::new(inventory, call_timeout),
            booking: BookingHandler::new(
                reservations,
                call_timeout,
                settings.default_passenger.clone(),
            ),
            memory: ConversationMemory::new(),
            settings,
            state: ControllerState::AwaitingIntent,
            turn_index: 0,
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Observability hook; `AwaitingIntent` whenever no turn is in flight
    pub fn state(&self) -> ControllerState {
        self.state
    }

    fn reference_date(&self) -> NaiveDate {
        self.settings
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Process one utterance to a structured outcome. Never fails: every
    /// handler error becomes an outcome the NLG collaborator can phrase.
    pub async fn process(&mut self, raw_text: &str) -> TurnOutcome {
        self.turn_index += 1;
        let call_timeout = self.settings.collaborator_timeout();

        // Malformed or unavailable NLU degrades to general chat.
        let turn = match timeout(call_timeout, self.nlu.parse(raw_text)).await {
            Ok(Ok(turn)) => turn,
            Ok(Err(err)) => {
                warn!(%err, "NLU parse failed, degrading to general intent");
                Turn::general(raw_text)
            }
            Err(_) => {
                warn!("NLU timed out, degrading to general intent");
                Turn::general(raw_text)
            }
        };
        info!(turn = self.turn_index, intent = ?turn.intent, "turn dispatched");

        let reference_date = self.reference_date();
        let result = match turn.intent {
            Intent::Search => {
                self.state = ControllerState::Searching;
                debug!(state = ?self.state, "controller state");
                let slots = &turn.slots;
                self.search
                    .handle(
                        &mut self.memory,
                        slots.origin.as_deref().unwrap_or("Unknown"),
                        slots.destination.as_deref().unwrap_or("Unknown"),
                        slots.date_ref.as_deref(),
                        reference_date,
                        self.turn_index,
                    )
                    .await
            }
            Intent::Book => {
                self.state = ControllerState::Booking;
                debug!(state = ?self.state, "controller state");
                self.booking
                    .handle(
                        &mut self.memory,
                        turn.slots.reference.as_deref().unwrap_or(""),
                        turn.slots.passenger.as_deref(),
                    )
                    .await
            }
            Intent::General => Ok(TurnOutcome::PassThrough {
                message: GENERAL_REPLY.to_string(),
            }),
        };
        self.state = ControllerState::AwaitingIntent;

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(%err, "handler failure converted to outcome");
                outcome_for_error(err)
            }
        }
    }

    /// Process one utterance and render the outcome through the NLG
    /// collaborator, falling back to the deterministic plain rendering
    /// when NLG itself is unavailable.
    pub async fn respond(&mut self, raw_text: &str) -> String {
        let outcome = self.process(raw_text).await;
        match timeout(
            self.settings.collaborator_timeout(),
            self.nlg.render(&outcome),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                warn!(%err, "NLG failed, using plain rendering");
                outcome.summary()
            }
            Err(_) => {
                warn!("NLG timed out, using plain rendering");
                outcome.summary()
            }
        }
    }
}

/// Ambiguous and unresolved references become clarification prompts that
/// echo the candidates; unavailable collaborators become an apology with
/// a retry suggestion. Nothing here guesses on the user's behalf.
fn outcome_for_error(err: DialogError) -> TurnOutcome {
    match err {
        DialogError::UnresolvedDate { token } => TurnOutcome::Clarification {
            clarification: ClarificationKind::UnresolvedDate,
            detail: format!(
                "I couldn't understand the travel date '{}'. Try 'today', 'tomorrow' or a YYYY-MM-DD date.",
                token
            ),
            candidates: Vec::new(),
        },
        DialogError::NoActiveSearch => TurnOutcome::Clarification {
            clarification: ClarificationKind::NoActiveSearch,
            detail: "There are no search results yet. Please search for flights first.".to_string(),
            candidates: Vec::new(),
        },
        DialogError::AmbiguousReference {
            reference,
            candidates,
        } => TurnOutcome::Clarification {
            clarification: ClarificationKind::AmbiguousReference,
            detail: format!(
                "'{}' matches more than one flight. Which of these did you mean?",
                reference
            ),
            candidates,
        },
        DialogError::UnresolvedReference { reference } => TurnOutcome::Clarification {
            clarification: ClarificationKind::UnresolvedReference,
            detail: format!(
                "I couldn't match '{}' to a flight in the current results. Please use the airline name or flight ID.",
                reference
            ),
            candidates: Vec::new(),
        },
        DialogError::CollaboratorUnavailable { collaborator }
        | DialogError::Collaborator { collaborator, .. } => {
            TurnOutcome::Unavailable { collaborator }
        }
    }
}
