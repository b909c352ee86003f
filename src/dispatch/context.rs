use crate::catalog::{MessageVariant, Muse, SkillDomain};
use crate::safety::SafetyOutcome;
use serde::{Deserialize, Serialize};

/// Situational input to one dispatch call. Missing optional fields degrade
/// to the configured defaults; there is no fatal error path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchContext {
    pub current_input: String,
    /// 0.0–1.0 reluctance estimate. Callers clamp before building; the
    /// dispatcher clamps again defensively at the boundary.
    pub current_resistance: f64,
    /// Free text ("evening", "9pm", "late night") mapped to time buckets.
    pub time_of_day: String,
    #[serde(default)]
    pub recent_inputs: Vec<String>,
    #[serde(default)]
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub energy_level: Option<f64>,
    #[serde(default)]
    pub preferred_muse: Option<Muse>,
}

/// One ranked skill offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub skill_name: String,
    pub domain: SkillDomain,
    pub muse: Muse,
    pub variant: MessageVariant,
    /// The selected message variant text.
    pub message: String,
    pub minimal_action: String,
    pub confidence: f64,
    pub trigger_reason: String,
}

/// Outcome of one dispatch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    #[serde(default)]
    pub safety: Option<SafetyOutcome>,
    pub recommendations: Vec<Recommendation>,
    pub escalation_required: bool,
    /// Set whenever there are no recommendations and no escalation.
    #[serde(default)]
    pub fallback: Option<String>,
}

impl DispatchResult {
    pub fn escalation(outcome: SafetyOutcome) -> Self {
        Self {
            safety: Some(outcome),
            recommendations: Vec::new(),
            escalation_required: true,
            fallback: None,
        }
    }

    pub fn fallback(message: &str, safety: Option<SafetyOutcome>) -> Self {
        Self {
            safety,
            recommendations: Vec::new(),
            escalation_required: false,
            fallback: Some(message.to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.recommendations.is_empty() && !self.escalation_required
    }

    pub fn top(&self) -> Option<&Recommendation> {
        self.recommendations.first()
    }
}
