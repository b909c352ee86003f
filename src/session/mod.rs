//! Coaching sessions — per-conversation state, the pluggable session store,
//! and the coordinator that turns dispatch output into one outward message.

mod coordinator;
mod state;
mod store;

pub use coordinator::{CoachingResponse, SessionCoordinator};
pub use state::{OfferRecord, SessionState};
pub use store::{InMemorySessionStore, SessionStore};
