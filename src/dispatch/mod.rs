//! Dispatcher — the core decision pipeline.
//!
//! Per call: safety gate → trigger filter → high-resistance short-circuit →
//! scoring → selection. The dispatcher owns no persistent state; it is a
//! function of (catalog snapshot, telemetry aggregates, context), safe to
//! call concurrently for independent sessions.

mod context;
mod muse;
mod triggers;

pub use context::{DispatchContext, DispatchResult, Recommendation};
pub use muse::{MuseSignals, select_muse};
pub use triggers::skill_triggered;

use crate::catalog::{MessageVariant, Muse, SkillDefinition, SkillDomain};
use crate::config::EngineConfig;
use crate::registry::SkillRegistry;
use crate::safety::{SafetyEngine, SafetyOutcome};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error};

/// Shown when nothing triggered or the catalog is empty.
const NEUTRAL_FALLBACK: &str = "I don't have a specific suggestion right now — tell me a bit \
                                more about how things are going and we'll find something small \
                                together.";

/// Shown under high resistance when no gentle option is available.
const SUPPORTIVE_FALLBACK: &str = "It sounds like today is already a lot. No tasks from me — \
                                   I'm here, and we can pick something tiny whenever you're \
                                   ready.";

pub struct Dispatcher {
    registry: Arc<SkillRegistry>,
    safety: SafetyEngine,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<SkillRegistry>, safety: SafetyEngine, config: EngineConfig) -> Self {
        Self {
            registry,
            safety,
            config,
        }
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// Run one dispatch. Never errors: any internal fault degrades to the
    /// neutral fallback — this is a user-facing surface where a generic
    /// message beats a crash.
    pub fn dispatch(&self, context: &DispatchContext) -> DispatchResult {
        match self.try_dispatch(context) {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "dispatch fault, degrading to fallback");
                DispatchResult::fallback(NEUTRAL_FALLBACK, None)
            }
        }
    }

    fn try_dispatch(&self, context: &DispatchContext) -> Result<DispatchResult> {
        let resistance = context.current_resistance.clamp(0.0, 1.0);

        // 1. Safety gate. A required escalation ends the turn; a caution-level
        //    outcome rides along without blocking coaching.
        let advisory = match self.safety.check(&context.current_input) {
            Some(outcome) if outcome.requires_escalation => {
                return Ok(DispatchResult::escalation(outcome));
            }
            other => other,
        };

        // 2. Trigger filter, deduped by name, registration order preserved.
        let mut seen: HashSet<String> = HashSet::new();
        let mut triggered: Vec<(SkillDefinition, String)> = Vec::new();
        for skill in self.registry.active_skills() {
            if !seen.insert(skill.name.clone()) {
                continue;
            }
            if let Some(reason) = triggers::skill_triggered(&skill, context) {
                triggered.push((skill, reason));
            }
        }
        debug!(
            triggered = triggered.len(),
            resistance, "trigger filter complete"
        );

        // 3. High-resistance short-circuit.
        if resistance > self.config.thresholds.high {
            return Ok(self.dispatch_high_resistance(resistance, &triggered, advisory));
        }

        if triggered.is_empty() {
            return Ok(DispatchResult::fallback(NEUTRAL_FALLBACK, advisory));
        }

        // 4. Scoring. Stable sort keeps registration order on ties.
        let mut scored: Vec<(SkillDefinition, String, f64)> = triggered
            .into_iter()
            .map(|(skill, reason)| {
                let score = self.score(&skill, context);
                (skill, reason, score)
            })
            .collect();
        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

        // 5. Selection.
        let take = if resistance > self.config.thresholds.moderate {
            1
        } else {
            2
        };
        let signals = self.signals();
        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .take(take)
            .map(|(skill, _, score)| {
                let muse = self.choose_muse(resistance, context, &signals);
                let variant = self.choose_variant(resistance, context.energy_level, muse);
                Recommendation {
                    message: skill.messages.variant(variant).to_string(),
                    minimal_action: skill.minimal_action.clone(),
                    skill_name: skill.name.clone(),
                    domain: skill.domain,
                    muse,
                    variant,
                    confidence: score.clamp(0.0, 1.0),
                    trigger_reason: skill.domain.reason_phrase().to_string(),
                }
            })
            .collect();

        Ok(DispatchResult {
            safety: advisory,
            recommendations,
            escalation_required: false,
            fallback: None,
        })
    }

    // ── High resistance ──────────────────────────────────────────────────

    /// One gentle offer at most: prefer triggered stress-domain skills or
    /// anything named as a reset; otherwise back off entirely.
    fn dispatch_high_resistance(
        &self,
        resistance: f64,
        triggered: &[(SkillDefinition, String)],
        advisory: Option<SafetyOutcome>,
    ) -> DispatchResult {
        let candidate = triggered.iter().find(|(skill, _)| {
            skill.domain == SkillDomain::Stress || skill.name.contains("reset")
        });

        let Some((skill, _)) = candidate else {
            debug!("high resistance with no gentle candidate, backing off");
            return DispatchResult::fallback(SUPPORTIVE_FALLBACK, advisory);
        };

        let muse = muse::select_muse(
            resistance,
            self.config.thresholds.high,
            self.config.thresholds.moderate,
            &self.signals(),
        );
        let recommendation = Recommendation {
            skill_name: skill.name.clone(),
            domain: skill.domain,
            muse,
            variant: MessageVariant::Empathic,
            message: skill.messages.variant(MessageVariant::Empathic).to_string(),
            minimal_action: skill.minimal_action.clone(),
            confidence: self.config.scoring.high_resistance_confidence,
            trigger_reason: "resistance is running high, so this is the smallest possible step"
                .to_string(),
        };

        DispatchResult {
            safety: advisory,
            recommendations: vec![recommendation],
            escalation_required: false,
            fallback: None,
        }
    }

    // ── Scoring ──────────────────────────────────────────────────────────

    fn score(&self, skill: &SkillDefinition, context: &DispatchContext) -> f64 {
        let weights = &self.config.scoring;
        let mut score = weights.base_trigger;

        let performance = self.registry.performance(&skill.name);
        let acceptance = if performance.offer_count == 0 {
            weights.default_acceptance
        } else {
            performance.acceptance_rate
        };
        score += weights.acceptance_weight * acceptance;

        let preference = self
            .registry
            .muse_preferences()
            .get(&skill.default_muse)
            .copied()
            .unwrap_or(weights.default_preference);
        score += weights.preference_weight * preference;

        if skill
            .time_windows
            .iter()
            .any(|w| w.matches(&context.time_of_day))
        {
            score += weights.time_match_bonus;
        }

        let recent = self.registry.recent(weights.repetition_window);
        let appearances = recent
            .iter()
            .filter(|r| r.skill_name == skill.name)
            .count();
        if appearances > weights.repetition_threshold {
            score -= weights.repetition_penalty;
        }

        debug!(skill = %skill.name, score, appearances, "scored");
        score
    }

    // ── Muse & variant choice ────────────────────────────────────────────

    fn signals(&self) -> MuseSignals {
        MuseSignals::new(
            self.registry.muse_preferences(),
            self.registry
                .recent_muse_success(self.config.learning.recent_window),
            self.config.scoring.default_preference,
        )
    }

    fn choose_muse(
        &self,
        resistance: f64,
        context: &DispatchContext,
        signals: &MuseSignals,
    ) -> Muse {
        if resistance < self.config.thresholds.preference_override {
            if let Some(preferred) = context.preferred_muse {
                return preferred;
            }
        }
        muse::select_muse(
            resistance,
            self.config.thresholds.high,
            self.config.thresholds.moderate,
            signals,
        )
    }

    fn choose_variant(&self, resistance: f64, energy_level: Option<f64>, muse: Muse) -> MessageVariant {
        let t = &self.config.thresholds;
        if resistance > t.empathic_floor {
            return MessageVariant::Empathic;
        }
        if let Some(energy) = energy_level {
            if energy < t.low_energy {
                return MessageVariant::Practical;
            }
        }
        if muse == Muse::Playmate && resistance < t.playful_cap {
            return MessageVariant::Playful;
        }
        if resistance > t.moderate {
            return MessageVariant::Empathic;
        }
        if resistance < t.practical_floor {
            return MessageVariant::Practical;
        }
        MessageVariant::Empathic
    }
}
