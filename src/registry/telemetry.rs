use crate::catalog::Muse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One skill offer-and-outcome event. Append-only; aggregates are computed
/// on demand and historical records never mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionTelemetry {
    pub id: Uuid,
    pub skill_name: String,
    pub muse: Muse,
    pub offered_at: DateTime<Utc>,
    pub accepted: bool,
    pub resistance_before: f64,
    #[serde(default)]
    pub resistance_after: Option<f64>,
    /// before − after; positive means resistance dropped.
    #[serde(default)]
    pub resistance_delta: Option<f64>,
    /// Consecutive accepted offers of this skill, including this one.
    pub streak: u32,
    #[serde(default)]
    pub decline_reason: Option<String>,
}

impl InteractionTelemetry {
    /// Clamps both resistance readings into [0, 1] and derives the delta.
    pub fn new(
        skill_name: &str,
        muse: Muse,
        accepted: bool,
        resistance_before: f64,
        resistance_after: Option<f64>,
        streak: u32,
        decline_reason: Option<String>,
    ) -> Self {
        let before = resistance_before.clamp(0.0, 1.0);
        let after = resistance_after.map(|r| r.clamp(0.0, 1.0));
        Self {
            id: Uuid::new_v4(),
            skill_name: skill_name.to_string(),
            muse,
            offered_at: Utc::now(),
            accepted,
            resistance_before: before,
            resistance_after: after,
            resistance_delta: after.map(|a| before - a),
            streak,
            decline_reason,
        }
    }
}

/// On-demand aggregate over every record for one skill name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillPerformance {
    pub offer_count: usize,
    pub acceptance_rate: f64,
    pub avg_resistance_reduction: f64,
    pub max_streak: u32,
}
