//! Skill registry — the in-memory store of skill definitions plus the
//! append-only interaction log and the per-muse preference learning loop.
//!
//! The registry is an explicitly constructed instance shared by handle;
//! there is no process-wide singleton, so tests can run isolated registries.

mod telemetry;

pub use telemetry::{InteractionTelemetry, SkillPerformance};

use crate::catalog::{Muse, SkillDefinition, SkillDomain};
use crate::error::CatalogError;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

pub struct SkillRegistry {
    /// Insertion-ordered so scoring tie-breaks preserve registration order.
    catalog: RwLock<Vec<SkillDefinition>>,
    /// Append-only. The lock serializes appends against aggregate reads.
    log: RwLock<Vec<InteractionTelemetry>>,
    /// Per-muse acceptance EMA, seeded lazily at the configured default.
    preferences: RwLock<HashMap<Muse, f64>>,
    preference_alpha: f64,
    default_preference: f64,
}

impl SkillRegistry {
    pub fn new(preference_alpha: f64, default_preference: f64) -> Self {
        Self {
            catalog: RwLock::new(Vec::new()),
            log: RwLock::new(Vec::new()),
            preferences: RwLock::new(HashMap::new()),
            preference_alpha,
            default_preference,
        }
    }

    /// Registry preloaded with a skill set. Invalid definitions abort the
    /// whole load so a partial catalog never goes live.
    pub fn with_skills(
        skills: Vec<SkillDefinition>,
        preference_alpha: f64,
        default_preference: f64,
    ) -> Result<Self, CatalogError> {
        let registry = Self::new(preference_alpha, default_preference);
        for skill in skills {
            registry.register(skill)?;
        }
        Ok(registry)
    }

    // ── Catalog ──────────────────────────────────────────────────────────

    /// Idempotent by name: re-registering replaces the definition in place,
    /// keeping its catalog position. Telemetry referencing the old
    /// definition stays valid.
    pub fn register(&self, skill: SkillDefinition) -> Result<(), CatalogError> {
        skill.validate()?;
        let mut catalog = self.catalog.write().expect("catalog lock poisoned");
        if let Some(existing) = catalog.iter_mut().find(|s| s.name == skill.name) {
            debug!(skill = %skill.name, "replacing existing skill definition");
            *existing = skill;
        } else {
            debug!(skill = %skill.name, domain = %skill.domain, "registered skill");
            catalog.push(skill);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SkillDefinition> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }

    /// Snapshot of active skills in registration order.
    pub fn active_skills(&self) -> Vec<SkillDefinition> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect()
    }

    pub fn by_domain(&self, domain: SkillDomain) -> Vec<SkillDefinition> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .filter(|s| s.domain == domain)
            .cloned()
            .collect()
    }

    pub fn by_muse(&self, muse: Muse) -> Vec<SkillDefinition> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .filter(|s| s.default_muse == muse)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.catalog.read().expect("catalog lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Telemetry ────────────────────────────────────────────────────────

    /// Append an outcome record and fold it into the muse preference EMA.
    /// This is the single write path of the learning loop.
    pub fn log(&self, record: InteractionTelemetry) {
        let outcome = if record.accepted { 1.0 } else { 0.0 };
        {
            let mut preferences = self.preferences.write().expect("preferences lock poisoned");
            let current = preferences
                .entry(record.muse)
                .or_insert(self.default_preference);
            *current = (1.0 - self.preference_alpha) * *current + self.preference_alpha * outcome;
        }
        debug!(
            skill = %record.skill_name,
            muse = %record.muse,
            accepted = record.accepted,
            streak = record.streak,
            "telemetry logged"
        );
        self.log.write().expect("log lock poisoned").push(record);
    }

    /// Fold over every record for `skill_name`. Zero offers yields the
    /// all-zero default rather than an error.
    pub fn performance(&self, skill_name: &str) -> SkillPerformance {
        let log = self.log.read().expect("log lock poisoned");
        let mut offer_count = 0usize;
        let mut accepted = 0usize;
        let mut delta_sum = 0.0f64;
        let mut delta_count = 0usize;
        let mut max_streak = 0u32;

        for record in log.iter().filter(|r| r.skill_name == skill_name) {
            offer_count += 1;
            if record.accepted {
                accepted += 1;
            }
            if let Some(delta) = record.resistance_delta {
                delta_sum += delta;
                delta_count += 1;
            }
            max_streak = max_streak.max(record.streak);
        }

        SkillPerformance {
            offer_count,
            acceptance_rate: if offer_count == 0 {
                0.0
            } else {
                accepted as f64 / offer_count as f64
            },
            avg_resistance_reduction: if delta_count == 0 {
                0.0
            } else {
                delta_sum / delta_count as f64
            },
            max_streak,
        }
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<InteractionTelemetry> {
        let log = self.log.read().expect("log lock poisoned");
        let start = log.len().saturating_sub(n);
        log[start..].to_vec()
    }

    /// Trailing run of accepted offers for one skill. Feeds the streak field
    /// of the next record.
    pub fn current_streak(&self, skill_name: &str) -> u32 {
        let log = self.log.read().expect("log lock poisoned");
        let mut streak = 0u32;
        for record in log.iter().rev().filter(|r| r.skill_name == skill_name) {
            if record.accepted {
                streak += 1;
            } else {
                break;
            }
        }
        streak
    }

    pub fn telemetry_len(&self) -> usize {
        self.log.read().expect("log lock poisoned").len()
    }

    // ── Learning signals ─────────────────────────────────────────────────

    /// Current EMA preference per muse. Muses with no feedback yet read as
    /// the configured default.
    pub fn muse_preferences(&self) -> HashMap<Muse, f64> {
        let preferences = self.preferences.read().expect("preferences lock poisoned");
        Muse::ALL
            .iter()
            .map(|&muse| {
                (
                    muse,
                    preferences.get(&muse).copied().unwrap_or(self.default_preference),
                )
            })
            .collect()
    }

    /// Per-muse acceptance rate over the last `window` records. Muses absent
    /// from the window read as the configured default.
    pub fn recent_muse_success(&self, window: usize) -> HashMap<Muse, f64> {
        let recent = self.recent(window);
        let mut counts: HashMap<Muse, (usize, usize)> = HashMap::new();
        for record in &recent {
            let entry = counts.entry(record.muse).or_insert((0, 0));
            entry.0 += 1;
            if record.accepted {
                entry.1 += 1;
            }
        }
        Muse::ALL
            .iter()
            .map(|&muse| {
                let rate = counts
                    .get(&muse)
                    .map_or(self.default_preference, |&(offers, accepted)| {
                        accepted as f64 / offers as f64
                    });
                (muse, rate)
            })
            .collect()
    }
}
