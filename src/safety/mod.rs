//! Safety rule engine — pattern-triggered escalation, checked before any
//! coaching logic runs.
//!
//! Rules evaluate in registration order and the first matching pattern wins;
//! there is no priority merging across rules. A required escalation
//! short-circuits the entire dispatch for that turn.

mod engine;
mod rules;

pub use engine::{SafetyEngine, SafetyOutcome};
pub use rules::{EscalationLevel, RulePattern, SafetyCategory, SafetyRule, default_rules};
