//! Single-conversation dialog engine: per-conversation memory, entity
//! resolution against the latest search snapshot, and a turn controller
//! that routes each parsed intent to exactly one transactional action.

pub mod booking;
pub mod controller;
pub mod memory;
pub mod mock;
pub mod resolver;
pub mod search;
pub mod settings;

pub use booking::BookingHandler;
pub use controller::{ControllerState, TurnController};
pub use memory::{ConversationMemory, PriceExtreme};
pub use resolver::EntityResolver;
pub use search::SearchHandler;
pub use settings::EngineSettings;
