#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::cast_precision_loss
)]

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod safety;
pub mod session;

pub use catalog::{
    MessageSet, MessageVariant, Muse, SkillDefinition, SkillDomain, SuccessMetrics, TimeWindow,
};
pub use config::EngineConfig;
pub use dispatch::{DispatchContext, DispatchResult, Dispatcher, Recommendation};
pub use error::{CatalogError, CoachError, ConfigError, RuleError};
pub use registry::{InteractionTelemetry, SkillPerformance, SkillRegistry};
pub use safety::{EscalationLevel, SafetyCategory, SafetyEngine, SafetyOutcome, SafetyRule};
pub use session::{CoachingResponse, InMemorySessionStore, SessionCoordinator, SessionStore};
