//! Starter skill catalog — five interventions, one per domain.
//!
//! Pure data. Embedders typically replace or extend this set from their own
//! loader; the engine only requires the `SkillDefinition` field contract.

use super::{MessageSet, Muse, SkillDefinition, SkillDomain, SuccessMetrics, TimeWindow};

pub fn starter_skills() -> Vec<SkillDefinition> {
    vec![
        SkillDefinition {
            name: "wind-down-dim".into(),
            domain: SkillDomain::Sleep,
            default_muse: Muse::Caretaker,
            triggers: vec![
                "trouble sleeping".into(),
                "can't sleep".into(),
                "sleep".into(),
            ],
            time_windows: vec![TimeWindow::Evening, TimeWindow::Bedtime],
            emotional_triggers: vec!["restless".into(), "wired".into()],
            minimal_action: "Dim one light in the room you're in right now.".into(),
            messages: MessageSet {
                empathic: "Rough nights wear on everything. Let's make this one a little \
                           softer — no fixing, just one small signal to your body that the \
                           day is winding down."
                    .into(),
                practical: "Light is the strongest wake signal. Dimming one lamp now starts \
                            melatonin release about 30 minutes earlier."
                    .into(),
                playful: "Sunset mode: engage! One lamp down, cozy levels rising."
                    .into(),
            },
            safety_notes: vec![
                "If sleeplessness persists beyond two weeks, suggest a clinician visit.".into(),
            ],
            metrics: SuccessMetrics {
                short_term: "one dimmed-light evening tonight".into(),
                mid_term: "four wind-down evenings this week".into(),
            },
            active: true,
        },
        SkillDefinition {
            name: "box-breath-reset".into(),
            domain: SkillDomain::Stress,
            default_muse: Muse::Caretaker,
            triggers: vec!["overwhelm".into(), "stress".into(), "tense".into()],
            time_windows: vec![],
            emotional_triggers: vec!["anxious".into(), "frazzled".into(), "panicky".into()],
            minimal_action: "Breathe in 4, hold 4, out 4, hold 4 — one single box.".into(),
            messages: MessageSet {
                empathic: "When everything piles up at once, the kindest move is tiny. One \
                           slow box breath with me, and the pile can wait four counts."
                    .into(),
                practical: "A single box breath drops heart rate measurably. Four counts in, \
                            four hold, four out, four hold. Twenty seconds total."
                    .into(),
                playful: "Square-breathing speedrun: in-4, hold-4, out-4, hold-4. New \
                          personal best incoming."
                    .into(),
            },
            safety_notes: vec![
                "Breathing exercises are not a substitute for crisis support.".into(),
            ],
            metrics: SuccessMetrics {
                short_term: "one completed box breath today".into(),
                mid_term: "a daily reset on five days this week".into(),
            },
            active: true,
        },
        SkillDefinition {
            name: "protein-first-bite".into(),
            domain: SkillDomain::Nutrition,
            default_muse: Muse::Scientist,
            triggers: vec!["snack".into(), "cravings".into(), "junk food".into()],
            time_windows: vec![TimeWindow::Afternoon],
            emotional_triggers: vec!["bored".into()],
            minimal_action: "Before anything else, eat one bite of protein you already have."
                .into(),
            messages: MessageSet {
                empathic: "Craving hits are real and they're not a willpower failure. One \
                           protein bite first, then decide — you stay in charge either way."
                    .into(),
                practical: "Protein blunts the glucose spike that drives the next craving. \
                            One bite first, then whatever you were going to have."
                    .into(),
                playful: "Appetizer rule! Protein goes first, the snack can be the encore."
                    .into(),
            },
            safety_notes: vec![
                "Never frame food choices as good/bad for users flagged for disordered \
                 eating."
                    .into(),
            ],
            metrics: SuccessMetrics {
                short_term: "one protein-first snack today".into(),
                mid_term: "protein-first at most snack times this week".into(),
            },
            active: true,
        },
        SkillDefinition {
            name: "movement-snack".into(),
            domain: SkillDomain::Movement,
            default_muse: Muse::Playmate,
            triggers: vec!["sitting all day".into(), "stiff".into(), "sedentary".into()],
            time_windows: vec![TimeWindow::Morning, TimeWindow::Afternoon],
            emotional_triggers: vec!["sluggish".into()],
            minimal_action: "Stand up and do ten slow shoulder rolls.".into(),
            messages: MessageSet {
                empathic: "Long desk days leave the body asking for just a little motion. \
                           Ten shoulder rolls, no workout clothes required."
                    .into(),
                practical: "Micro-movement every hour beats one gym session for stiffness. \
                            Ten shoulder rolls takes 40 seconds."
                    .into(),
                playful: "Movement snack time — crunchier than chips! Ten shoulder rolls, \
                          go."
                    .into(),
            },
            safety_notes: vec![
                "Skip if any movement causes sharp pain; suggest professional advice.".into(),
            ],
            metrics: SuccessMetrics {
                short_term: "one movement snack today".into(),
                mid_term: "three movement snacks daily this week".into(),
            },
            active: true,
        },
        SkillDefinition {
            name: "pillbox-pairing".into(),
            domain: SkillDomain::MedicationAdherence,
            default_muse: Muse::Coach,
            triggers: vec![
                "forgot my meds".into(),
                "skip".into(),
                "missed a dose".into(),
            ],
            time_windows: vec![TimeWindow::Morning, TimeWindow::Evening],
            emotional_triggers: vec!["scattered".into()],
            minimal_action: "Put tomorrow's dose next to your toothbrush right now.".into(),
            messages: MessageSet {
                empathic: "Missing doses happens to everyone juggling a full life. Let's \
                           make tomorrow's dose impossible to miss — it takes one trip to \
                           the bathroom shelf."
                    .into(),
                practical: "Habit stacking works: anchor the dose to brushing your teeth. \
                            Move the pillbox next to the toothbrush now."
                    .into(),
                playful: "Operation toothbrush buddy: pills move in next to the brush. \
                          Mission time: 60 seconds."
                    .into(),
            },
            safety_notes: vec![
                "Dosage questions and side effects always go to a pharmacist or doctor."
                    .into(),
            ],
            metrics: SuccessMetrics {
                short_term: "pillbox moved today".into(),
                mid_term: "no missed doses this week".into(),
            },
            active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn starter_catalog_is_valid() {
        for skill in starter_skills() {
            skill.validate().expect("starter skill must validate");
        }
    }

    #[test]
    fn one_skill_per_domain() {
        let domains: HashSet<SkillDomain> =
            starter_skills().iter().map(|s| s.domain).collect();
        assert_eq!(domains.len(), 5);
    }

    #[test]
    fn stress_skill_is_a_reset() {
        let skills = starter_skills();
        let stress = skills
            .iter()
            .find(|s| s.domain == SkillDomain::Stress)
            .expect("stress skill present");
        assert!(stress.name.contains("reset"));
        assert!(stress.default_muse.is_gentle());
    }

    #[test]
    fn names_are_unique() {
        let skills = starter_skills();
        let names: HashSet<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), skills.len());
    }
}
