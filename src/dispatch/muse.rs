//! Muse selection — a pure function of resistance and learned signals.

use crate::catalog::Muse;
use std::collections::HashMap;

/// Learned inputs to muse selection. Missing entries read as `default`.
#[derive(Debug, Clone)]
pub struct MuseSignals {
    pub preferences: HashMap<Muse, f64>,
    pub recent_success: HashMap<Muse, f64>,
    pub default: f64,
}

impl MuseSignals {
    pub fn new(
        preferences: HashMap<Muse, f64>,
        recent_success: HashMap<Muse, f64>,
        default: f64,
    ) -> Self {
        Self {
            preferences,
            recent_success,
            default,
        }
    }

    fn preference(&self, muse: Muse) -> f64 {
        self.preferences.get(&muse).copied().unwrap_or(self.default)
    }

    fn success(&self, muse: Muse) -> f64 {
        self.recent_success
            .get(&muse)
            .copied()
            .unwrap_or(self.default)
    }
}

/// Pick the delivery muse for one offer.
///
/// - resistance > 0.7: the better-preferred of the two gentle muses,
///   ties toward caretaker;
/// - 0.4 < resistance <= 0.7: best recent success across all four, ties
///   toward the higher preference;
/// - otherwise: the better-preferred of coach and scientist.
pub fn select_muse(resistance: f64, high: f64, moderate: f64, signals: &MuseSignals) -> Muse {
    if resistance > high {
        return best_by(&Muse::GENTLE, |m| signals.preference(m));
    }
    if resistance > moderate {
        // stable max: on equal success the earlier candidate wins, so order
        // candidates by preference first
        let mut candidates = Muse::ALL;
        candidates.sort_by(|a, b| {
            signals
                .preference(*b)
                .partial_cmp(&signals.preference(*a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        return best_by(&candidates, |m| signals.success(m));
    }
    best_by(&[Muse::Coach, Muse::Scientist], |m| signals.preference(m))
}

fn best_by(candidates: &[Muse], score: impl Fn(Muse) -> f64) -> Muse {
    let mut best = candidates[0];
    let mut best_score = score(best);
    for &candidate in &candidates[1..] {
        let candidate_score = score(candidate);
        if candidate_score > best_score {
            best = candidate;
            best_score = candidate_score;
        }
    }
    best
}
