//! Engine tuning parameters.
//!
//! The scoring weights and resistance thresholds are tuning knobs, not
//! load-bearing constants. Defaults match the values the engine ships with;
//! embedders can override any of them from TOML.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub thresholds: ResistanceThresholds,

    #[serde(default)]
    pub learning: LearningConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl EngineConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        for (label, value) in [
            ("scoring.base_trigger", s.base_trigger),
            ("scoring.acceptance_weight", s.acceptance_weight),
            ("scoring.preference_weight", s.preference_weight),
            ("scoring.time_match_bonus", s.time_match_bonus),
            ("scoring.repetition_penalty", s.repetition_penalty),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{label} must be within [0.0, 1.0], got {value}"
                )));
            }
        }
        if s.repetition_window == 0 {
            return Err(ConfigError::Validation(
                "scoring.repetition_window must be non-zero".into(),
            ));
        }

        let t = &self.thresholds;
        for (label, value) in [
            ("thresholds.high", t.high),
            ("thresholds.moderate", t.moderate),
            ("thresholds.preference_override", t.preference_override),
            ("thresholds.empathic_floor", t.empathic_floor),
            ("thresholds.low_energy", t.low_energy),
            ("thresholds.playful_cap", t.playful_cap),
            ("thresholds.practical_floor", t.practical_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{label} must be within [0.0, 1.0], got {value}"
                )));
            }
        }
        if t.moderate >= t.high {
            return Err(ConfigError::Validation(format!(
                "thresholds.moderate ({}) must be below thresholds.high ({})",
                t.moderate, t.high
            )));
        }

        let l = &self.learning;
        if !(0.0..=1.0).contains(&l.preference_alpha) {
            return Err(ConfigError::Validation(format!(
                "learning.preference_alpha must be within [0.0, 1.0], got {}",
                l.preference_alpha
            )));
        }
        if l.recent_window == 0 {
            return Err(ConfigError::Validation(
                "learning.recent_window must be non-zero".into(),
            ));
        }

        if self.session.history_limit == 0 {
            return Err(ConfigError::Validation(
                "session.history_limit must be non-zero".into(),
            ));
        }

        Ok(())
    }
}

// ── Scoring weights ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base score for any triggered skill.
    #[serde(default = "default_base_trigger")]
    pub base_trigger: f64,
    /// Weight applied to the skill's historical acceptance rate.
    #[serde(default = "default_acceptance_weight")]
    pub acceptance_weight: f64,
    /// Weight applied to the preference score of the skill's default muse.
    #[serde(default = "default_preference_weight")]
    pub preference_weight: f64,
    /// Bonus when a time window matches the current time of day.
    #[serde(default = "default_time_match_bonus")]
    pub time_match_bonus: f64,
    /// Penalty when the skill was offered too often recently.
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f64,
    /// Acceptance rate assumed for skills with no telemetry.
    #[serde(default = "default_neutral_rate")]
    pub default_acceptance: f64,
    /// Preference score assumed for muses with no feedback.
    #[serde(default = "default_neutral_rate")]
    pub default_preference: f64,
    /// How many trailing telemetry records the repetition check inspects.
    #[serde(default = "default_repetition_window")]
    pub repetition_window: usize,
    /// Offers above this count inside the window incur the penalty.
    #[serde(default = "default_repetition_threshold")]
    pub repetition_threshold: usize,
    /// Fixed confidence for the single high-resistance recommendation.
    #[serde(default = "default_high_resistance_confidence")]
    pub high_resistance_confidence: f64,
}

fn default_base_trigger() -> f64 {
    0.4
}

fn default_acceptance_weight() -> f64 {
    0.3
}

fn default_preference_weight() -> f64 {
    0.2
}

fn default_time_match_bonus() -> f64 {
    0.1
}

fn default_repetition_penalty() -> f64 {
    0.2
}

fn default_neutral_rate() -> f64 {
    0.5
}

fn default_repetition_window() -> usize {
    10
}

fn default_repetition_threshold() -> usize {
    2
}

fn default_high_resistance_confidence() -> f64 {
    0.6
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_trigger: default_base_trigger(),
            acceptance_weight: default_acceptance_weight(),
            preference_weight: default_preference_weight(),
            time_match_bonus: default_time_match_bonus(),
            repetition_penalty: default_repetition_penalty(),
            default_acceptance: default_neutral_rate(),
            default_preference: default_neutral_rate(),
            repetition_window: default_repetition_window(),
            repetition_threshold: default_repetition_threshold(),
            high_resistance_confidence: default_high_resistance_confidence(),
        }
    }
}

// ── Resistance thresholds ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResistanceThresholds {
    /// Above this, dispatch short-circuits to a single gentle offer.
    #[serde(default = "default_high")]
    pub high: f64,
    /// Above this (and at most `high`), selection keeps one skill.
    #[serde(default = "default_moderate")]
    pub moderate: f64,
    /// Below this, an explicit muse preference overrides selection.
    #[serde(default = "default_preference_override")]
    pub preference_override: f64,
    /// Above this, delivery always uses the empathic variant.
    #[serde(default = "default_empathic_floor")]
    pub empathic_floor: f64,
    /// Energy below this forces the practical message variant.
    #[serde(default = "default_low_energy")]
    pub low_energy: f64,
    /// Playful delivery only below this resistance.
    #[serde(default = "default_playful_cap")]
    pub playful_cap: f64,
    /// Resistance below this reads as fully engaged (practical variant).
    #[serde(default = "default_practical_floor")]
    pub practical_floor: f64,
}

fn default_high() -> f64 {
    0.7
}

fn default_moderate() -> f64 {
    0.4
}

fn default_preference_override() -> f64 {
    0.6
}

fn default_empathic_floor() -> f64 {
    0.6
}

fn default_low_energy() -> f64 {
    0.3
}

fn default_playful_cap() -> f64 {
    0.5
}

fn default_practical_floor() -> f64 {
    0.2
}

impl Default for ResistanceThresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            moderate: default_moderate(),
            preference_override: default_preference_override(),
            empathic_floor: default_empathic_floor(),
            low_energy: default_low_energy(),
            playful_cap: default_playful_cap(),
            practical_floor: default_practical_floor(),
        }
    }
}

// ── Learning loop ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// EMA step for per-muse preference updates on each feedback outcome.
    #[serde(default = "default_preference_alpha")]
    pub preference_alpha: f64,
    /// Telemetry window for recent per-muse success rates.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

fn default_preference_alpha() -> f64 {
    0.2
}

fn default_recent_window() -> usize {
    10
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            preference_alpha: default_preference_alpha(),
            recent_window: default_recent_window(),
        }
    }
}

// ── Session ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How many raw inputs a session keeps.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Resistance adjustment applied per matched heuristic keyword turn.
    #[serde(default = "default_resistance_step")]
    pub resistance_step: f64,
}

fn default_history_limit() -> usize {
    20
}

fn default_resistance_step() -> f64 {
    0.1
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            resistance_step: default_resistance_step(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().expect("defaults valid");
    }

    #[test]
    fn default_scoring_weights_match_shipped_values() {
        let scoring = ScoringConfig::default();
        assert!((scoring.base_trigger - 0.4).abs() < f64::EPSILON);
        assert!((scoring.acceptance_weight - 0.3).abs() < f64::EPSILON);
        assert!((scoring.preference_weight - 0.2).abs() < f64::EPSILON);
        assert!((scoring.time_match_bonus - 0.1).abs() < f64::EPSILON);
        assert!((scoring.repetition_penalty - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn toml_overrides_single_field() {
        let config = EngineConfig::from_toml_str(
            "[scoring]\nrepetition_penalty = 0.35\n",
        )
        .expect("parse");
        assert!((config.scoring.repetition_penalty - 0.35).abs() < f64::EPSILON);
        // untouched fields keep defaults
        assert!((config.scoring.base_trigger - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_weight_rejected() {
        let err = EngineConfig::from_toml_str("[scoring]\nbase_trigger = 1.5\n")
            .expect_err("must reject");
        assert!(err.to_string().contains("base_trigger"));
    }

    #[test]
    fn moderate_must_stay_below_high() {
        let err = EngineConfig::from_toml_str(
            "[thresholds]\nmoderate = 0.8\nhigh = 0.7\n",
        )
        .expect_err("must reject");
        assert!(err.to_string().contains("moderate"));
    }

    #[test]
    fn garbage_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("not toml at all [").expect_err("must reject");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
