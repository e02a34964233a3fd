pub mod collaborators;
pub mod dates;

use itinera_domain::FlightRecord;

/// Everything that can go wrong inside a turn. All variants are
/// recoverable at the controller level; none terminate the process.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Unrecognized date reference: '{token}'")]
    UnresolvedDate { token: String },

    #[error("No active search results; run a search first")]
    NoActiveSearch,

    #[error("Reference '{reference}' matches {} flights", candidates.len())]
    AmbiguousReference {
        reference: String,
        candidates: Vec<FlightRecord>,
    },

    #[error("Reference '{reference}' does not match any flight in the current results")]
    UnresolvedReference { reference: String },

    #[error("The {collaborator} collaborator did not respond in time")]
    CollaboratorUnavailable { collaborator: String },

    #[error("The {collaborator} collaborator failed: {message}")]
    Collaborator {
        collaborator: String,
        message: String,
    },
}

pub type DialogResult<T> = Result<T, DialogError>;
