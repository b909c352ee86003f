//! Trigger matching — keyword/synonym, time-bucket, and emotional-state
//! activation of catalog skills.

use crate::catalog::SkillDefinition;
use super::context::DispatchContext;

/// Synonym expansions for known trigger categories. A trigger not in this
/// table matches only itself.
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "overwhelm",
        &["overwhelmed", "too much", "stressed out", "can't handle"],
    ),
    (
        "stress",
        &["stressed", "under pressure", "wound up", "on edge"],
    ),
    (
        "sleep",
        &["can't sleep", "insomnia", "trouble sleeping", "exhausted", "tossing and turning"],
    ),
    ("snack", &["snacking", "munchies", "something to eat"]),
    ("stiff", &["achy", "sore", "tight shoulders"]),
    ("skip", &["skipped", "skipping", "forgot to take"]),
];

/// The trigger itself plus any synonyms for its category.
pub fn expansions(trigger: &str) -> Vec<&str> {
    let mut expanded = vec![trigger];
    if let Some((_, synonyms)) = SYNONYMS.iter().find(|(key, _)| *key == trigger) {
        expanded.extend_from_slice(synonyms);
    }
    expanded
}

/// Returns a human-readable reason when the skill is activated by the
/// context, or `None`. Checks input keywords (synonym-expanded), then time
/// windows, then emotional triggers.
pub fn skill_triggered(skill: &SkillDefinition, context: &DispatchContext) -> Option<String> {
    let lowered_input = context.current_input.to_lowercase();

    for trigger in &skill.triggers {
        let trigger_lowered = trigger.to_lowercase();
        for phrase in expansions(&trigger_lowered) {
            if !phrase.is_empty() && lowered_input.contains(phrase) {
                return Some(format!("you mentioned \"{phrase}\""));
            }
        }
    }

    for window in &skill.time_windows {
        if window.matches(&context.time_of_day) {
            return Some(format!("it's {window} — a good moment for this"));
        }
    }

    if let Some(emotional_state) = &context.emotional_state {
        let lowered_state = emotional_state.to_lowercase();
        for trigger in &skill.emotional_triggers {
            let trigger_lowered = trigger.to_lowercase();
            if !trigger_lowered.is_empty() && lowered_state.contains(&trigger_lowered) {
                return Some(format!("you're feeling {trigger_lowered}"));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::content::starter_skills;
    use crate::catalog::{SkillDomain, TimeWindow};

    fn context(input: &str, time_of_day: &str) -> DispatchContext {
        DispatchContext {
            current_input: input.into(),
            current_resistance: 0.3,
            time_of_day: time_of_day.into(),
            recent_inputs: vec![],
            emotional_state: None,
            energy_level: None,
            preferred_muse: None,
        }
    }

    fn skill(domain: SkillDomain) -> SkillDefinition {
        starter_skills()
            .into_iter()
            .find(|s| s.domain == domain)
            .unwrap()
    }

    #[test]
    fn direct_keyword_triggers() {
        let stress = skill(SkillDomain::Stress);
        let reason = skill_triggered(&stress, &context("so much stress today", "midday"));
        assert!(reason.is_some());
    }

    #[test]
    fn synonym_expansion_triggers() {
        // "overwhelm" never appears literally; the synonym does
        let stress = skill(SkillDomain::Stress);
        let reason = skill_triggered(&stress, &context("it's all too much", "midday"))
            .expect("synonym should trigger");
        assert!(reason.contains("too much"));
    }

    #[test]
    fn time_window_triggers_without_keywords() {
        let sleep = skill(SkillDomain::Sleep);
        let reason = skill_triggered(&sleep, &context("what a day", "late evening"));
        assert!(reason.is_some());
    }

    #[test]
    fn emotional_state_triggers() {
        let stress = skill(SkillDomain::Stress);
        let mut ctx = context("nothing in particular", "midday");
        ctx.emotional_state = Some("Anxious and tired".into());
        let reason = skill_triggered(&stress, &ctx).expect("emotional trigger");
        assert!(reason.contains("anxious"));
    }

    #[test]
    fn unrelated_context_does_not_trigger() {
        let nutrition = skill(SkillDomain::Nutrition);
        // nutrition has an Afternoon window; pick a non-matching time
        assert!(skill_triggered(&nutrition, &context("lovely weather", "early morning")).is_none());
    }

    #[test]
    fn expansion_includes_the_trigger_itself() {
        let expanded = expansions("overwhelm");
        assert!(expanded.contains(&"overwhelm"));
        assert!(expanded.contains(&"can't handle"));
        assert_eq!(expansions("unlisted"), vec!["unlisted"]);
    }

    #[test]
    fn window_reason_names_the_bucket() {
        let sleep = skill(SkillDomain::Sleep);
        let reason = skill_triggered(&sleep, &context("hello", "bedtime")).unwrap();
        assert!(reason.contains(&TimeWindow::Evening.to_string()) || reason.contains("bedtime"));
    }
}
