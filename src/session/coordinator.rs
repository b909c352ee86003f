use super::state::OfferRecord;
use super::store::SessionStore;
use crate::catalog::Muse;
use crate::config::EngineConfig;
use crate::dispatch::{DispatchContext, DispatchResult, Dispatcher};
use crate::registry::{InteractionTelemetry, SkillRegistry};
use crate::safety::SafetyEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// The sole contract exposed to any UI/CLI/chat-transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingResponse {
    pub message: String,
    #[serde(default)]
    pub safety_alert: Option<String>,
    #[serde(default)]
    pub skill_offered: Option<String>,
    #[serde(default)]
    pub muse_used: Option<Muse>,
    pub requires_escalation: bool,
    pub follow_up_suggested: bool,
}

/// Wraps the dispatcher with per-session resistance state and relays
/// accept/decline feedback back into the registry.
pub struct SessionCoordinator {
    registry: Arc<SkillRegistry>,
    dispatcher: Dispatcher,
    store: Arc<dyn SessionStore>,
    config: EngineConfig,
}

impl SessionCoordinator {
    pub fn new(
        registry: Arc<SkillRegistry>,
        safety: SafetyEngine,
        store: Arc<dyn SessionStore>,
        config: EngineConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&registry), safety, config.clone());
        Self {
            registry,
            dispatcher,
            store,
            config,
        }
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn session(&self, session_id: &str) -> Option<super::state::SessionState> {
        self.store.load(session_id)
    }

    /// Explicit user persona choice for a session.
    pub fn set_preferred_muse(&self, session_id: &str, muse: Muse) {
        let mut session = self.store.load_or_create(session_id);
        session.preferred_muse = Some(muse);
        self.store.save(session);
    }

    // ── Coach ────────────────────────────────────────────────────────────

    /// One coaching turn: observe the input, dispatch, and render exactly
    /// one outward message.
    pub fn coach(
        &self,
        session_id: &str,
        user_input: &str,
        time_of_day: &str,
        energy_level: Option<f64>,
        emotional_state: Option<&str>,
    ) -> CoachingResponse {
        let mut session = self.store.load_or_create(session_id);
        session.observe_input(user_input, &self.config.session);

        let context = DispatchContext {
            current_input: user_input.to_string(),
            current_resistance: session.resistance,
            time_of_day: time_of_day.to_string(),
            recent_inputs: session.recent_inputs(),
            emotional_state: emotional_state.map(str::to_string),
            energy_level,
            preferred_muse: session.preferred_muse,
        };

        let result = self.dispatcher.dispatch(&context);
        let response = Self::render(&result);

        if let Some(offered) = &response.skill_offered {
            session.last_offer = Some(OfferRecord {
                skill_name: offered.clone(),
                muse: response.muse_used.unwrap_or(Muse::Coach),
            });
        }
        session.responses.push(response.clone());
        self.store.save(session);

        response
    }

    /// Translate a dispatch result into the single outward message.
    fn render(result: &DispatchResult) -> CoachingResponse {
        if result.escalation_required {
            // surfaced verbatim, never silently dropped
            let outcome = result
                .safety
                .as_ref()
                .expect("escalation always carries its outcome");
            let mut message = outcome.response.clone();
            if !outcome.resources.is_empty() {
                message.push_str("\n\nWhere to reach real support:");
                for resource in &outcome.resources {
                    message.push_str("\n- ");
                    message.push_str(resource);
                }
            }
            return CoachingResponse {
                message,
                safety_alert: Some(outcome.response.clone()),
                skill_offered: None,
                muse_used: None,
                requires_escalation: true,
                follow_up_suggested: false,
            };
        }

        let safety_alert = result.safety.as_ref().map(|o| o.response.clone());

        if let Some(top) = result.top() {
            let message = format!(
                "{}\n\nTry this — it takes under two minutes: {}\n\nWant to give it a go?",
                top.message, top.minimal_action
            );
            return CoachingResponse {
                message,
                safety_alert,
                skill_offered: Some(top.skill_name.clone()),
                muse_used: Some(top.muse),
                requires_escalation: false,
                follow_up_suggested: true,
            };
        }

        CoachingResponse {
            message: result
                .fallback
                .clone()
                .unwrap_or_else(|| "I'm here whenever you want to pick something small.".into()),
            safety_alert,
            skill_offered: None,
            muse_used: None,
            requires_escalation: false,
            follow_up_suggested: false,
        }
    }

    // ── Feedback ─────────────────────────────────────────────────────────

    /// Relay an accept/decline outcome into the learning loop. Unknown
    /// session or skill names are logged no-ops — they commonly arise from
    /// out-of-order or duplicate client calls.
    pub fn feedback(
        &self,
        session_id: &str,
        skill_name: &str,
        accepted: bool,
        resistance_after: Option<f64>,
        decline_reason: Option<&str>,
    ) {
        let Some(mut session) = self.store.load(session_id) else {
            warn!(session = session_id, "feedback for unknown session, ignoring");
            return;
        };
        let Some(skill) = self.registry.get(skill_name) else {
            warn!(skill = skill_name, "feedback for unknown skill, ignoring");
            return;
        };

        let muse = session
            .last_offer
            .as_ref()
            .filter(|offer| offer.skill_name == skill_name)
            .map_or(skill.default_muse, |offer| offer.muse);

        let streak = if accepted {
            self.registry.current_streak(skill_name) + 1
        } else {
            0
        };

        let record = InteractionTelemetry::new(
            skill_name,
            muse,
            accepted,
            session.resistance,
            resistance_after,
            streak,
            decline_reason.map(str::to_string),
        );
        debug!(
            skill = skill_name,
            accepted,
            streak,
            "feedback recorded"
        );
        self.registry.log(record);

        if let Some(after) = resistance_after {
            session.set_resistance(after);
        }
        self.store.save(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::content::starter_skills;
    use crate::session::InMemorySessionStore;

    fn coordinator() -> SessionCoordinator {
        let config = EngineConfig::default();
        let registry = Arc::new(
            SkillRegistry::with_skills(
                starter_skills(),
                config.learning.preference_alpha,
                config.scoring.default_preference,
            )
            .unwrap(),
        );
        SessionCoordinator::new(
            registry,
            SafetyEngine::with_default_rules(),
            Arc::new(InMemorySessionStore::new()),
            config,
        )
    }

    #[test]
    fn coach_creates_session_on_first_turn() {
        let coordinator = coordinator();
        coordinator.coach("s1", "hello there", "morning", None, None);
        let session = coordinator.session("s1").expect("session created");
        assert_eq!(session.inputs.len(), 1);
        assert_eq!(session.responses.len(), 1);
    }

    #[test]
    fn escalation_message_carries_resources() {
        let coordinator = coordinator();
        let response = coordinator.coach("s1", "I want to die", "evening", None, None);
        assert!(response.requires_escalation);
        assert!(response.safety_alert.is_some());
        assert!(response.skill_offered.is_none());
        assert!(response.message.contains("988"));
    }

    #[test]
    fn skill_offer_includes_action_and_call_to_action() {
        let coordinator = coordinator();
        let response =
            coordinator.coach("s1", "I keep having trouble sleeping", "evening", None, None);
        let offered = response.skill_offered.expect("skill offered");
        assert_eq!(offered, "wind-down-dim");
        assert!(response.message.contains("two minutes"));
        assert!(response.message.contains("Want to give it a go?"));
        assert!(response.follow_up_suggested);
        assert!(response.muse_used.is_some());
    }

    #[test]
    fn neutral_turn_gets_fallback() {
        let coordinator = coordinator();
        let response = coordinator.coach("s1", "nothing much", "dusk", None, None);
        assert!(!response.requires_escalation);
        assert!(response.skill_offered.is_none());
        assert!(!response.message.is_empty());
    }

    #[test]
    fn feedback_unknown_session_is_noop() {
        let coordinator = coordinator();
        coordinator.feedback("ghost", "wind-down-dim", true, None, None);
        assert_eq!(coordinator.registry().telemetry_len(), 0);
    }

    #[test]
    fn feedback_unknown_skill_is_noop() {
        let coordinator = coordinator();
        coordinator.coach("s1", "hello", "morning", None, None);
        coordinator.feedback("s1", "no-such-skill", true, None, None);
        assert_eq!(coordinator.registry().telemetry_len(), 0);
    }

    #[test]
    fn feedback_logs_telemetry_with_session_resistance() {
        let coordinator = coordinator();
        coordinator.coach("s1", "trouble sleeping again", "evening", None, None);
        coordinator.feedback("s1", "wind-down-dim", true, Some(0.2), None);

        assert_eq!(coordinator.registry().telemetry_len(), 1);
        let performance = coordinator.registry().performance("wind-down-dim");
        assert_eq!(performance.offer_count, 1);
        assert!((performance.acceptance_rate - 1.0).abs() < f64::EPSILON);

        // resistance_after applied to the session
        let session = coordinator.session("s1").unwrap();
        assert!((session.resistance - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn accepted_feedback_extends_streak() {
        let coordinator = coordinator();
        coordinator.coach("s1", "trouble sleeping", "evening", None, None);
        coordinator.feedback("s1", "wind-down-dim", true, None, None);
        coordinator.feedback("s1", "wind-down-dim", true, None, None);
        coordinator.feedback("s1", "wind-down-dim", false, None, Some("not tonight"));

        assert_eq!(coordinator.registry().performance("wind-down-dim").max_streak, 2);
        assert_eq!(coordinator.registry().current_streak("wind-down-dim"), 0);
    }

    #[test]
    fn preferred_muse_persists_and_applies() {
        let coordinator = coordinator();
        coordinator.set_preferred_muse("s1", Muse::Scientist);
        let response = coordinator.coach("s1", "can't sleep", "evening", None, None);
        // "can't" raises resistance 0.5 → 0.6, at/above the override cutoff,
        // so the selector decides; preference survives in state regardless
        assert!(response.skill_offered.is_some());
        let session = coordinator.session("s1").unwrap();
        assert_eq!(session.preferred_muse, Some(Muse::Scientist));
    }

    #[test]
    fn sessions_are_isolated() {
        let coordinator = coordinator();
        coordinator.coach("a", "I just can't, too hard", "morning", None, None);
        coordinator.coach("b", "ready to go, help me", "morning", None, None);
        let a = coordinator.session("a").unwrap();
        let b = coordinator.session("b").unwrap();
        assert!(a.resistance > b.resistance);
    }
}
