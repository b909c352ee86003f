use crate::catalog::Muse;
use crate::config::SessionConfig;
use crate::session::coordinator::CoachingResponse;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Phrases that read as pushback; each matching turn nudges resistance up.
const RAISING: &[&str] = &[
    "can't",
    "won't",
    "too tired",
    "no time",
    "stressed",
    "overwhelmed",
    "not working",
    "impossible",
    "too hard",
];

/// Phrases that read as engagement; each matching turn nudges resistance down.
const LOWERING: &[&str] = &[
    "ready",
    "want to",
    "help me",
    "let's try",
    "sounds good",
    "feeling better",
    "that worked",
    "motivated",
];

/// What the previous turn offered, so feedback can attribute the muse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRecord {
    pub skill_name: String,
    pub muse: Muse,
}

/// Mutable per-conversation state. Lives in the store for the process
/// lifetime; expiry and persistence across restarts belong to the embedder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    /// Bounded raw-input history, oldest first.
    pub inputs: VecDeque<String>,
    /// 0.0–1.0 reluctance estimate, moved by the keyword heuristic each turn
    /// and by explicit feedback readings.
    pub resistance: f64,
    #[serde(default)]
    pub preferred_muse: Option<Muse>,
    #[serde(default)]
    pub responses: Vec<CoachingResponse>,
    #[serde(default)]
    pub last_offer: Option<OfferRecord>,
}

impl SessionState {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            inputs: VecDeque::new(),
            resistance: 0.5,
            preferred_muse: None,
            responses: Vec::new(),
            last_offer: None,
        }
    }

    /// Record a turn: push into bounded history and apply the resistance
    /// heuristic. Raising phrases take precedence when both appear.
    pub fn observe_input(&mut self, input: &str, config: &SessionConfig) {
        self.inputs.push_back(input.to_string());
        while self.inputs.len() > config.history_limit {
            self.inputs.pop_front();
        }

        let lowered = input.to_lowercase();
        if RAISING.iter().any(|phrase| lowered.contains(phrase)) {
            self.resistance = (self.resistance + config.resistance_step).clamp(0.0, 1.0);
        } else if LOWERING.iter().any(|phrase| lowered.contains(phrase)) {
            self.resistance = (self.resistance - config.resistance_step).clamp(0.0, 1.0);
        }
    }

    pub fn set_resistance(&mut self, value: f64) {
        self.resistance = value.clamp(0.0, 1.0);
    }

    pub fn recent_inputs(&self) -> Vec<String> {
        self.inputs.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[test]
    fn new_session_starts_neutral() {
        let session = SessionState::new("s1");
        assert!((session.resistance - 0.5).abs() < f64::EPSILON);
        assert!(session.inputs.is_empty());
    }

    #[test]
    fn raising_phrase_increases_resistance() {
        let mut session = SessionState::new("s1");
        session.observe_input("I just can't today", &config());
        assert!((session.resistance - 0.6).abs() < 1e-12);
    }

    #[test]
    fn lowering_phrase_decreases_resistance() {
        let mut session = SessionState::new("s1");
        session.observe_input("ready when you are", &config());
        assert!((session.resistance - 0.4).abs() < 1e-12);
    }

    #[test]
    fn raising_takes_precedence_over_lowering() {
        let mut session = SessionState::new("s1");
        session.observe_input("I want to but it's impossible", &config());
        assert!((session.resistance - 0.6).abs() < 1e-12);
    }

    #[test]
    fn neutral_turn_leaves_resistance_alone() {
        let mut session = SessionState::new("s1");
        session.observe_input("the sky is blue", &config());
        assert!((session.resistance - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn resistance_clamps_at_both_ends() {
        let mut session = SessionState::new("s1");
        for _ in 0..20 {
            session.observe_input("too hard, no time", &config());
        }
        assert!((session.resistance - 1.0).abs() < f64::EPSILON);

        for _ in 0..30 {
            session.observe_input("motivated and ready", &config());
        }
        assert!((session.resistance - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn history_is_bounded() {
        let mut session = SessionState::new("s1");
        let config = SessionConfig {
            history_limit: 3,
            ..SessionConfig::default()
        };
        for i in 0..10 {
            session.observe_input(&format!("turn {i}"), &config);
        }
        assert_eq!(session.inputs.len(), 3);
        assert_eq!(session.inputs.front().unwrap(), "turn 7");
    }

    #[test]
    fn set_resistance_clamps() {
        let mut session = SessionState::new("s1");
        session.set_resistance(2.5);
        assert!((session.resistance - 1.0).abs() < f64::EPSILON);
        session.set_resistance(-1.0);
        assert!((session.resistance - 0.0).abs() < f64::EPSILON);
    }
}
