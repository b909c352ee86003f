use super::rules::{EscalationLevel, SafetyCategory, SafetyRule, default_rules};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Outcome ──────────────────────────────────────────────────────────────────

/// Verdict of a safety check. Carries everything the outward surface needs:
/// the fixed response, the matched pattern, and referral resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyOutcome {
    pub rule_name: String,
    pub category: SafetyCategory,
    pub level: EscalationLevel,
    pub matched_pattern: String,
    pub response: String,
    pub requires_escalation: bool,
    pub resources: Vec<String>,
}

// ── Engine ───────────────────────────────────────────────────────────────────

/// Evaluates free-text input against an ordered rule list. Pure — no state
/// mutation, no I/O.
pub struct SafetyEngine {
    rules: Vec<SafetyRule>,
}

impl SafetyEngine {
    pub fn new(rules: Vec<SafetyRule>) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    pub fn rules(&self) -> &[SafetyRule] {
        &self.rules
    }

    /// First matching pattern across rules in registration order wins.
    /// Empty input always yields `None`.
    pub fn check(&self, input: &str) -> Option<SafetyOutcome> {
        if input.trim().is_empty() {
            return None;
        }
        let lowered = input.to_lowercase();

        for rule in &self.rules {
            for pattern in &rule.patterns {
                if let Some(matched) = pattern.matches(&lowered) {
                    debug!(
                        rule = %rule.name,
                        category = %rule.category,
                        level = %rule.level,
                        matched = %matched,
                        "safety rule triggered"
                    );
                    return Some(SafetyOutcome {
                        rule_name: rule.name.clone(),
                        category: rule.category,
                        level: rule.level,
                        matched_pattern: matched,
                        response: rule.response.clone(),
                        requires_escalation: rule.requires_professional_help
                            || rule.level >= EscalationLevel::Immediate,
                        resources: rule.resources.clone(),
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, keywords: &[&str], level: EscalationLevel, help: bool) -> SafetyRule {
        SafetyRule::keyword(
            name,
            SafetyCategory::MentalHealthCrisis,
            keywords,
            level,
            "reach out for support",
            &["988"],
            help,
        )
        .unwrap()
    }

    #[test]
    fn empty_input_yields_none() {
        let engine = SafetyEngine::with_default_rules();
        assert!(engine.check("").is_none());
        assert!(engine.check("   ").is_none());
    }

    #[test]
    fn clear_input_yields_none() {
        let engine = SafetyEngine::with_default_rules();
        assert!(engine.check("had a nice walk this morning").is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let engine = SafetyEngine::with_default_rules();
        let outcome = engine.check("I Have CHEST PAIN").expect("must match");
        assert_eq!(outcome.category, SafetyCategory::MedicalEmergency);
        assert_eq!(outcome.matched_pattern, "chest pain");
    }

    #[test]
    fn first_registered_rule_wins_on_overlap() {
        // both rules trigger on "spiral"; registration order decides
        let engine = SafetyEngine::new(vec![
            rule("first", &["spiral"], EscalationLevel::Caution, false),
            rule("second", &["spiral"], EscalationLevel::Emergency, true),
        ]);
        let outcome = engine.check("I'm in a spiral").unwrap();
        assert_eq!(outcome.rule_name, "first");
    }

    #[test]
    fn escalation_required_from_level() {
        let engine = SafetyEngine::new(vec![rule(
            "immediate",
            &["trigger"],
            EscalationLevel::Immediate,
            false,
        )]);
        assert!(engine.check("trigger").unwrap().requires_escalation);
    }

    #[test]
    fn escalation_required_from_professional_help_flag() {
        let engine = SafetyEngine::new(vec![rule(
            "caution-help",
            &["trigger"],
            EscalationLevel::Caution,
            true,
        )]);
        assert!(engine.check("trigger").unwrap().requires_escalation);
    }

    #[test]
    fn caution_without_help_flag_does_not_escalate() {
        let engine = SafetyEngine::with_default_rules();
        let outcome = engine.check("worried about side effects").unwrap();
        assert_eq!(outcome.category, SafetyCategory::MedicationConcern);
        assert_eq!(outcome.level, EscalationLevel::Caution);
        assert!(!outcome.requires_escalation);
    }

    #[test]
    fn outcome_carries_response_and_resources_verbatim() {
        let engine = SafetyEngine::with_default_rules();
        let outcome = engine.check("I want to die").unwrap();
        assert!(outcome.response.contains("988"));
        assert!(!outcome.resources.is_empty());
        assert!(outcome.requires_escalation);
    }

    #[test]
    fn regex_trigger_in_default_set() {
        let engine = SafetyEngine::with_default_rules();
        let outcome = engine.check("honestly I dont want to be here").unwrap();
        assert_eq!(outcome.category, SafetyCategory::MentalHealthCrisis);
    }
}
