//! Skill catalog model — the data contract for behavior-change skills.
//!
//! All variability between skills is data interpreted by the dispatcher;
//! there is no per-skill or per-muse behavior.

pub mod content;
mod skill;

pub use skill::{
    MessageSet, MessageVariant, Muse, SkillDefinition, SkillDomain, SuccessMetrics, TimeWindow,
};
