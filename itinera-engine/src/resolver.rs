use itinera_core::{DialogError, DialogResult};
use itinera_domain::FlightRecord;
use tracing::debug;

use crate::memory::{ConversationMemory, PriceExtreme};

/// One matching strategy. Returns `Ok(None)` when it simply does not
/// apply, letting the next strategy try; errors short-circuit.
type Matcher = fn(&str, &ConversationMemory) -> DialogResult<Option<FlightRecord>>;

/// Resolves a free-text reference against the current snapshot by running
/// an ordered, short-circuiting list of matchers: exact flight id, then
/// carrier substring, then superlatives. Exact identifiers are unambiguous
/// and must win before fuzzier matching; new strategies slot into the list
/// without touching existing ones.
pub struct EntityResolver {
    matchers: Vec<Matcher>,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self {
            matchers: vec![match_exact_id, match_carrier, match_superlative],
        }
    }
}

impl EntityResolver {
    pub fn resolve(
        &self,
        reference: &str,
        memory: &ConversationMemory,
    ) -> DialogResult<FlightRecord> {
        for matcher in &self.matchers {
            if let Some(flight) = matcher(reference, memory)? {
                debug!(reference, flight_id = %flight.id, "reference resolved");
                return Ok(flight);
            }
        }
        Err(DialogError::UnresolvedReference {
            reference: reference.trim().to_string(),
        })
    }
}

fn match_exact_id(
    reference: &str,
    memory: &ConversationMemory,
) -> DialogResult<Option<FlightRecord>> {
    Ok(memory.find_by_id(reference)?.cloned())
}

fn match_carrier(
    reference: &str,
    memory: &ConversationMemory,
) -> DialogResult<Option<FlightRecord>> {
    let matches = memory.find_by_carrier(reference)?;
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].clone())),
        _ => Err(DialogError::AmbiguousReference {
            reference: reference.trim().to_string(),
            candidates: matches.into_iter().cloned().collect(),
        }),
    }
}

const MIN_KEYWORDS: &[&str] = &["cheapest", "lowest price", "lowest fare"];
const MAX_KEYWORDS: &[&str] = &["most expensive", "priciest", "highest price"];

fn match_superlative(
    reference: &str,
    memory: &ConversationMemory,
) -> DialogResult<Option<FlightRecord>> {
    let normalized = reference.to_lowercase();
    let direction = if MIN_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        PriceExtreme::Min
    } else if MAX_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        PriceExtreme::Max
    } else {
        return Ok(None);
    };
    Ok(Some(memory.find_extreme_by_price(direction)?.clone()))
}
