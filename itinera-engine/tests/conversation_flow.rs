use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use itinera_core::collaborators::{InventoryClient, NlgClient};
use itinera_core::{DialogError, DialogResult};
use itinera_domain::{FlightRecord, Intent, Turn, TurnOutcome, TurnSlots};
use itinera_engine::mock::{FixtureInventory, MockReservations, ScriptedNlu, TemplateNlg};
use itinera_engine::{ControllerState, EngineSettings, TurnController};

fn reference_date() -> NaiveDate {
    // A Monday; "tomorrow" resolves to 2026-03-03
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn settings() -> EngineSettings {
    EngineSettings {
        collaborator_timeout_ms: 250,
        default_passenger: "Guest".to_string(),
        reference_date: Some(reference_date()),
    }
}

fn search_turn(origin: &str, destination: &str, date_ref: Option<&str>) -> Turn {
    Turn::new(
        format!("find flights {} to {}", origin, destination),
        Intent::Search,
        TurnSlots {
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            date_ref: date_ref.map(str::to_string),
            ..TurnSlots::default()
        },
    )
}

fn book_turn(reference: &str, passenger: Option<&str>) -> Turn {
    Turn::new(
        format!("book {}", reference),
        Intent::Book,
        TurnSlots {
            reference: Some(reference.to_string()),
            passenger: passenger.map(str::to_string),
            ..TurnSlots::default()
        },
    )
}

fn nyc_lax_inventory() -> FixtureInventory {
    FixtureInventory::new()
        .with_flight("NYC", "LAX", "LH-5614", "Lufthansa", "08:00 PM", 45000)
        .with_flight("NYC", "LAX", "AF-1923", "Air France", "02:00 PM", 30000)
        .with_flight("NYC", "LAX", "DL-77", "Delta", "06:00 AM", 52000)
}

fn controller(script: Vec<Turn>, inventory: Arc<dyn InventoryClient>) -> TurnController {
    TurnController::new(
        Arc::new(ScriptedNlu::new(script)),
        inventory,
        Arc::new(MockReservations::new()),
        Arc::new(TemplateNlg),
        settings(),
    )
}

struct SlowInventory;

#[async_trait]
impl InventoryClient for SlowInventory {
    async fn search(
        &self,
        _origin: &str,
        _destination: &str,
        _date: NaiveDate,
    ) -> DialogResult<Vec<FlightRecord>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

struct FailingNlg;

#[async_trait]
impl NlgClient for FailingNlg {
    async fn render(&self, _outcome: &TurnOutcome) -> DialogResult<String> {
        Err(DialogError::Collaborator {
            collaborator: "nlg".to_string(),
            message: "model offline".to_string(),
        })
    }
}

#[tokio::test]
async fn test_search_then_carrier_booking_then_superlative() {
    let script = vec![
        search_turn("NYC", "LAX", Some("tomorrow")),
        book_turn("Lufthansa", Some("Robin")),
        book_turn("cheapest", Some("Robin")),
    ];
    let mut controller = controller(script, Arc::new(nyc_lax_inventory()));

    let outcome = controller.process("Find me flights from NYC to LAX for tomorrow").await;
    match outcome {
        TurnOutcome::SearchResults { query, flights } => {
            assert_eq!(query.date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
            assert_eq!(flights.len(), 3);
            assert_eq!(flights[0].id, "LH-5614");
        }
        other => panic!("expected SearchResults, got {other:?}"),
    }

    let outcome = controller.process("Book the Lufthansa one for Robin").await;
    match outcome {
        TurnOutcome::Booked {
            reservation,
            flight,
        } => {
            assert_eq!(flight.id, "LH-5614");
            assert_eq!(reservation.flight_id, "LH-5614");
            assert_eq!(reservation.passenger_name, "Robin");
            assert!(reservation.pnr.starts_with("PNR"));
        }
        other => panic!("expected Booked, got {other:?}"),
    }

    // The earlier booking must not affect superlative resolution against
    // the same snapshot.
    let outcome = controller.process("Actually book the cheapest one for Robin").await;
    match outcome {
        TurnOutcome::Booked { flight, .. } => assert_eq!(flight.id, "AF-1923"),
        other => panic!("expected Booked, got {other:?}"),
    }

    let reservations = controller.memory().reservations();
    assert_eq!(reservations.len(), 2);
    assert_ne!(reservations[0].pnr, reservations[1].pnr);

    // Nothing but the memory carries over between turns.
    assert_eq!(controller.state(), ControllerState::AwaitingIntent);
}

#[tokio::test]
async fn test_booking_before_any_search_asks_to_search_first() {
    let script = vec![book_turn("cheapest", None)];
    let mut controller = controller(script, Arc::new(nyc_lax_inventory()));

    let outcome = controller.process("book the cheapest flight").await;
    match outcome {
        TurnOutcome::Clarification { clarification, .. } => {
            assert_eq!(
                clarification,
                itinera_domain::ClarificationKind::NoActiveSearch
            );
        }
        other => panic!("expected Clarification, got {other:?}"),
    }
    assert!(controller.memory().reservations().is_empty());
}

#[tokio::test]
async fn test_new_search_discards_previous_snapshot() {
    let inventory = nyc_lax_inventory()
        .with_flight("BOS", "SFO", "UA-300", "United", "11:00 AM", 41000);
    let script = vec![
        search_turn("NYC", "LAX", Some("tomorrow")),
        search_turn("BOS", "SFO", Some("tomorrow")),
        book_turn("Lufthansa", None),
    ];
    let mut controller = controller(script, Arc::new(inventory));

    controller.process("flights NYC to LAX tomorrow").await;
    controller.process("flights BOS to SFO tomorrow").await;

    // Lufthansa only existed in the first snapshot.
    let outcome = controller.process("book the Lufthansa one").await;
    match outcome {
        TurnOutcome::Clarification { clarification, .. } => {
            assert_eq!(
                clarification,
                itinera_domain::ClarificationKind::UnresolvedReference
            );
        }
        other => panic!("expected Clarification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ambiguous_carrier_reference_echoes_candidates() {
    let inventory = FixtureInventory::new()
        .with_flight("NYC", "LAX", "AF-1923", "Air France", "02:00 PM", 30000)
        .with_flight("NYC", "LAX", "AC-101", "Air Canada", "04:00 PM", 35000);
    let script = vec![
        search_turn("NYC", "LAX", None),
        book_turn("Air", None),
    ];
    let mut controller = controller(script, Arc::new(inventory));

    controller.process("flights NYC to LAX").await;
    let outcome = controller.process("book the Air flight").await;
    match outcome {
        TurnOutcome::Clarification {
            clarification,
            candidates,
            ..
        } => {
            assert_eq!(
                clarification,
                itinera_domain::ClarificationKind::AmbiguousReference
            );
            let ids: Vec<&str> = candidates.iter().map(|f| f.id.as_str()).collect();
            assert_eq!(ids, ["AF-1923", "AC-101"]);
        }
        other => panic!("expected Clarification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_inventory_preserves_prior_snapshot() {
    let script = vec![
        search_turn("NYC", "LAX", Some("tomorrow")),
        search_turn("NYC", "Atlantis", Some("tomorrow")),
        book_turn("cheapest", None),
    ];
    let mut controller = controller(script, Arc::new(nyc_lax_inventory()));

    controller.process("flights NYC to LAX tomorrow").await;

    let outcome = controller.process("flights NYC to Atlantis tomorrow").await;
    assert!(matches!(outcome, TurnOutcome::NoFlightsFound { .. }));

    // The failed search must not have clobbered the earlier results.
    let outcome = controller.process("book the cheapest one").await;
    match outcome {
        TurnOutcome::Booked {
            flight,
            reservation,
        } => {
            assert_eq!(flight.id, "AF-1923");
            assert_eq!(reservation.passenger_name, "Guest");
        }
        other => panic!("expected Booked, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unrecognized_date_asks_for_clarification() {
    let script = vec![search_turn("NYC", "LAX", Some("whenever works"))];
    let mut controller = controller(script, Arc::new(nyc_lax_inventory()));

    let outcome = controller.process("flights NYC to LAX whenever works").await;
    match outcome {
        TurnOutcome::Clarification { clarification, .. } => {
            assert_eq!(
                clarification,
                itinera_domain::ClarificationKind::UnresolvedDate
            );
        }
        other => panic!("expected Clarification, got {other:?}"),
    }
    // Nothing was stored for the failed turn.
    assert!(controller.memory().snapshot().is_none());
}

#[tokio::test]
async fn test_pathological_day_count_is_a_clarification_not_a_crash() {
    let script = vec![search_turn("NYC", "LAX", Some("in 100000000 days"))];
    let mut controller = controller(script, Arc::new(nyc_lax_inventory()));

    let outcome = controller
        .process("flights NYC to LAX in 100000000 days")
        .await;
    match outcome {
        TurnOutcome::Clarification { clarification, .. } => {
            assert_eq!(
                clarification,
                itinera_domain::ClarificationKind::UnresolvedDate
            );
        }
        other => panic!("expected Clarification, got {other:?}"),
    }
    assert_eq!(controller.state(), ControllerState::AwaitingIntent);
}

#[tokio::test]
async fn test_slow_inventory_surfaces_as_unavailable() {
    let script = vec![search_turn("NYC", "LAX", Some("tomorrow"))];
    let mut controller = controller(script, Arc::new(SlowInventory));

    let outcome = controller.process("flights NYC to LAX tomorrow").await;
    assert!(matches!(
        outcome,
        TurnOutcome::Unavailable { ref collaborator } if collaborator == "inventory"
    ));
}

#[tokio::test]
async fn test_nlu_failure_degrades_to_general_chat() {
    // Empty script: the NLU errors on the first utterance.
    let mut controller = controller(vec![], Arc::new(nyc_lax_inventory()));

    let outcome = controller.process("blorp").await;
    assert!(matches!(outcome, TurnOutcome::PassThrough { .. }));
}

#[tokio::test]
async fn test_respond_renders_and_falls_back_when_nlg_fails() {
    let script = vec![
        search_turn("NYC", "LAX", Some("tomorrow")),
        book_turn("Lufthansa", Some("Robin")),
    ];
    let mut rendered = TurnController::new(
        Arc::new(ScriptedNlu::new(script)),
        Arc::new(nyc_lax_inventory()),
        Arc::new(MockReservations::new()),
        Arc::new(FailingNlg),
        settings(),
    );

    // NLG is down, so both replies come from the plain rendering.
    let text = rendered.respond("flights NYC to LAX tomorrow").await;
    assert!(text.contains("Lufthansa"));
    assert!(text.contains("$450"));

    let text = rendered.respond("book the Lufthansa one for Robin").await;
    assert!(text.contains("Booking confirmed"));
    assert!(text.contains("PNR"));
}
