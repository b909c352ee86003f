use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use strum::Display;

// ── Skill domain ─────────────────────────────────────────────────────────────

/// Life domain a skill intervenes in. Closed set — the dispatcher's
/// trigger-reason strings and the high-resistance short-circuit key off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillDomain {
    Sleep,
    Stress,
    Nutrition,
    Movement,
    MedicationAdherence,
}

impl SkillDomain {
    /// Human-readable phrase used in trigger-reason strings.
    pub fn reason_phrase(self) -> &'static str {
        match self {
            Self::Sleep => "your sleep came up",
            Self::Stress => "it sounds like stress is running high",
            Self::Nutrition => "food and energy came up",
            Self::Movement => "your body could use a little movement",
            Self::MedicationAdherence => "staying on top of medication came up",
        }
    }
}

// ── Muse (delivery persona) ──────────────────────────────────────────────────

/// One of four fixed delivery styles used to tone a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Muse {
    Coach,
    Caretaker,
    Scientist,
    Playmate,
}

impl Muse {
    pub const ALL: [Muse; 4] = [Muse::Coach, Muse::Caretaker, Muse::Scientist, Muse::Playmate];

    /// The two low-pressure muses offered under high resistance.
    pub const GENTLE: [Muse; 2] = [Muse::Caretaker, Muse::Playmate];

    pub fn is_gentle(self) -> bool {
        matches!(self, Self::Caretaker | Self::Playmate)
    }
}

// ── Message variants ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageVariant {
    Empathic,
    Practical,
    Playful,
}

/// The three tonal renderings every skill carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSet {
    pub empathic: String,
    pub practical: String,
    pub playful: String,
}

impl MessageSet {
    pub fn variant(&self, variant: MessageVariant) -> &str {
        match variant {
            MessageVariant::Empathic => &self.empathic,
            MessageVariant::Practical => &self.practical,
            MessageVariant::Playful => &self.playful,
        }
    }
}

// ── Time windows ─────────────────────────────────────────────────────────────

/// Time-of-day bucket a skill can be conditioned on.
///
/// `time_of_day` arrives as free text from the caller ("early morning",
/// "9pm", "late night"); matching is a fixed substring table per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeWindow {
    Morning,
    Afternoon,
    Evening,
    Bedtime,
}

impl TimeWindow {
    fn markers(self) -> &'static [&'static str] {
        match self {
            Self::Morning => &["morning", "am", "breakfast", "wake"],
            Self::Afternoon => &["afternoon", "noon", "lunch", "midday"],
            Self::Evening => &["evening", "pm", "dinner", "after work"],
            Self::Bedtime => &["bedtime", "night", "late", "sleep"],
        }
    }

    pub fn matches(self, time_of_day: &str) -> bool {
        let lowered = time_of_day.to_lowercase();
        self.markers().iter().any(|marker| lowered.contains(marker))
    }
}

// ── Success metrics ──────────────────────────────────────────────────────────

/// Textual metric targets tracked outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMetrics {
    pub short_term: String,
    pub mid_term: String,
}

// ── Skill definition ─────────────────────────────────────────────────────────

/// A reusable behavior-change intervention. Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub domain: SkillDomain,
    pub default_muse: Muse,
    /// Situational phrases that activate the skill (substring, lower-cased,
    /// expanded through the synonym table at match time).
    pub triggers: Vec<String>,
    #[serde(default)]
    pub time_windows: Vec<TimeWindow>,
    #[serde(default)]
    pub emotional_triggers: Vec<String>,
    /// One step completable in two minutes or less.
    pub minimal_action: String,
    pub messages: MessageSet,
    #[serde(default)]
    pub safety_notes: Vec<String>,
    pub metrics: SuccessMetrics,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl SkillDefinition {
    /// Registration-time validation. Every skill needs at least one trigger,
    /// a non-empty minimal action, and all three message variants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.triggers.iter().all(|t| t.trim().is_empty()) {
            return Err(CatalogError::NoTriggers {
                name: self.name.clone(),
            });
        }
        if self.minimal_action.trim().is_empty() {
            return Err(CatalogError::EmptyAction {
                name: self.name.clone(),
            });
        }
        for variant in [
            MessageVariant::Empathic,
            MessageVariant::Practical,
            MessageVariant::Playful,
        ] {
            if self.messages.variant(variant).trim().is_empty() {
                return Err(CatalogError::EmptyMessage {
                    name: self.name.clone(),
                    variant: variant.to_string(),
                });
            }
        }
        Ok(())
    }
}
