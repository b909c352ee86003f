use crate::error::RuleError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

// ── Categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SafetyCategory {
    MedicalEmergency,
    MentalHealthCrisis,
    MedicationConcern,
    SelfHarmRisk,
    EatingDisorder,
    SubstanceAbuse,
}

// ── Escalation levels ────────────────────────────────────────────────────────

/// Ordered severity: `None < Caution < Immediate < Emergency`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EscalationLevel {
    None,
    Caution,
    Immediate,
    Emergency,
}

// ── Trigger patterns ─────────────────────────────────────────────────────────

/// A single trigger: case-insensitive substring or compiled regex.
#[derive(Debug, Clone)]
pub enum RulePattern {
    Keyword(String),
    Regex(Regex),
}

impl RulePattern {
    /// Match against already-lowercased input. Returns the exact matched
    /// pattern text for the outcome report.
    pub fn matches(&self, lowered: &str) -> Option<String> {
        match self {
            Self::Keyword(keyword) => lowered
                .contains(&keyword.to_lowercase())
                .then(|| keyword.clone()),
            Self::Regex(regex) => regex.find(lowered).map(|m| m.as_str().to_string()),
        }
    }
}

// ── Safety rule ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SafetyRule {
    pub name: String,
    pub category: SafetyCategory,
    /// Evaluated in order; first match wins within the rule.
    pub patterns: Vec<RulePattern>,
    pub level: EscalationLevel,
    /// Fixed response template, surfaced verbatim.
    pub response: String,
    pub resources: Vec<String>,
    pub requires_professional_help: bool,
}

impl SafetyRule {
    /// Keyword-only rule.
    pub fn keyword(
        name: &str,
        category: SafetyCategory,
        keywords: &[&str],
        level: EscalationLevel,
        response: &str,
        resources: &[&str],
        requires_professional_help: bool,
    ) -> Result<Self, RuleError> {
        let patterns = keywords
            .iter()
            .map(|k| RulePattern::Keyword((*k).to_string()))
            .collect();
        Self::build(
            name,
            category,
            patterns,
            level,
            response,
            resources,
            requires_professional_help,
        )
    }

    /// Rule mixing keywords and regexes. Regex compilation failures are
    /// rejected here so bad patterns never reach evaluation.
    pub fn with_patterns(
        name: &str,
        category: SafetyCategory,
        keywords: &[&str],
        regexes: &[&str],
        level: EscalationLevel,
        response: &str,
        resources: &[&str],
        requires_professional_help: bool,
    ) -> Result<Self, RuleError> {
        let mut patterns: Vec<RulePattern> = keywords
            .iter()
            .map(|k| RulePattern::Keyword((*k).to_string()))
            .collect();
        for raw in regexes {
            let compiled = Regex::new(raw).map_err(|source| RuleError::InvalidPattern {
                rule: name.to_string(),
                source,
            })?;
            patterns.push(RulePattern::Regex(compiled));
        }
        Self::build(
            name,
            category,
            patterns,
            level,
            response,
            resources,
            requires_professional_help,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        name: &str,
        category: SafetyCategory,
        patterns: Vec<RulePattern>,
        level: EscalationLevel,
        response: &str,
        resources: &[&str],
        requires_professional_help: bool,
    ) -> Result<Self, RuleError> {
        if patterns.is_empty() {
            return Err(RuleError::NoPatterns {
                rule: name.to_string(),
            });
        }
        if response.trim().is_empty() {
            return Err(RuleError::EmptyResponse {
                rule: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            category,
            patterns,
            level,
            response: response.to_string(),
            resources: resources.iter().map(|r| (*r).to_string()).collect(),
            requires_professional_help,
        })
    }
}

// ── Default rule set ─────────────────────────────────────────────────────────

/// Six-category default rule set, ordered most-severe first so that
/// first-match-wins resolves overlapping triggers toward the stronger rule.
pub fn default_rules() -> Vec<SafetyRule> {
    let rules = [
        SafetyRule::with_patterns(
            "medical-emergency",
            SafetyCategory::MedicalEmergency,
            &[
                "chest pain",
                "can't breathe",
                "cannot breathe",
                "passing out",
                "severe bleeding",
                "stroke",
            ],
            &[r"heart attack", r"emergenc(y|ies)"],
            EscalationLevel::Emergency,
            "This sounds like it could be a medical emergency. Please call 911 (or your \
             local emergency number) right now, or have someone nearby call for you. I'm \
             not able to help with medical emergencies.",
            &["911 / local emergency services", "Nearest emergency department"],
            true,
        ),
        SafetyRule::with_patterns(
            "self-harm-risk",
            SafetyCategory::SelfHarmRisk,
            &["hurt myself", "hurting myself", "cut myself", "self harm", "self-harm"],
            &[],
            EscalationLevel::Emergency,
            "I'm really glad you told me. You deserve support from someone trained for \
             this. Please reach out to the 988 Suicide & Crisis Lifeline — call or text \
             988 — or talk to someone you trust right now.",
            &["988 Suicide & Crisis Lifeline (call or text 988)", "Crisis Text Line (text HOME to 741741)"],
            true,
        ),
        SafetyRule::with_patterns(
            "mental-health-crisis",
            SafetyCategory::MentalHealthCrisis,
            &[
                "want to die",
                "kill myself",
                "end it all",
                "no reason to live",
                "suicidal",
            ],
            &[r"don'?t want to (be here|live)"],
            EscalationLevel::Emergency,
            "What you're carrying sounds heavier than coaching can help with, and you \
             don't have to carry it alone. Please call or text 988 to reach the Suicide \
             & Crisis Lifeline — they're available 24/7.",
            &["988 Suicide & Crisis Lifeline (call or text 988)", "International Association for Suicide Prevention: https://www.iasp.info/resources/Crisis_Centres/"],
            true,
        ),
        SafetyRule::keyword(
            "eating-disorder",
            SafetyCategory::EatingDisorder,
            &[
                "purge",
                "purging",
                "haven't eaten in days",
                "starving myself",
                "binge and",
            ],
            EscalationLevel::Immediate,
            "Thank you for trusting me with that. Eating struggles deserve real, \
             specialized support rather than coaching tips. The NEDA helpline can help \
             you find it.",
            &["NEDA helpline: 1-800-931-2237", "ANAD helpline: 1-888-375-7767"],
            true,
        ),
        SafetyRule::with_patterns(
            "substance-abuse",
            SafetyCategory::SubstanceAbuse,
            &["relapsed", "can't stop drinking", "overdose", "blackout drunk"],
            &[r"using again"],
            EscalationLevel::Immediate,
            "That takes courage to say. Substance struggles respond best to professional \
             support, and SAMHSA's helpline is free, confidential, and open 24/7.",
            &["SAMHSA National Helpline: 1-800-662-4357"],
            true,
        ),
        SafetyRule::with_patterns(
            "medication-concern",
            SafetyCategory::MedicationConcern,
            &[
                "double dose",
                "doubled my dose",
                "stopped taking my",
                "side effects",
                "mixing my meds",
            ],
            &[r"took (too many|extra) pills"],
            EscalationLevel::Caution,
            "Medication changes and side effects are outside what I can safely advise \
             on. A pharmacist or your prescriber can answer this quickly — many \
             pharmacies take walk-in questions.",
            &["Your pharmacist", "Your prescribing clinician", "Poison Control: 1-800-222-1222"],
            false,
        ),
    ];

    rules
        .into_iter()
        .map(|r| r.expect("default safety rules are statically valid"))
        .collect()
}
