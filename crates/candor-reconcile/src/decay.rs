//! Exponential time decay of source authority.
//!
//! `weight(t) = exp(-ln2 · age_days / half_life_days)`: 1.0 when fresh, 0.5
//! after one half-life, 0.25 after two.

use std::f64::consts::LN_2;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use candor_contracts::source::DecayDomain;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Half-life per decay domain, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfLives {
    pub engineering: f64,
    pub policy: f64,
    pub incident: f64,
}

impl Default for HalfLives {
    fn default() -> Self {
        Self {
            engineering: DecayDomain::Engineering.default_half_life_days(),
            policy: DecayDomain::Policy.default_half_life_days(),
            incident: DecayDomain::Incident.default_half_life_days(),
        }
    }
}

impl HalfLives {
    pub fn get(&self, domain: DecayDomain) -> f64 {
        match domain {
            DecayDomain::Engineering => self.engineering,
            DecayDomain::Policy => self.policy,
            DecayDomain::Incident => self.incident,
        }
    }
}

/// Age of `timestamp` at `now`, in fractional days.  Timestamps in the
/// future count as age 0.
pub fn age_days(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - timestamp).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_DAY
}

/// Decay weight in `(0, 1]` for a source of the given age.
///
/// `half_life_days` must be positive; `DetectorConfig` guarantees it.
pub fn decay_weight(age_days: f64, half_life_days: f64) -> f64 {
    (-LN_2 * age_days.max(0.0) / half_life_days).exp()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn weight_halves_every_half_life() {
        assert!((decay_weight(0.0, 90.0) - 1.0).abs() < 1e-12);
        assert!((decay_weight(90.0, 90.0) - 0.5).abs() < 1e-12);
        assert!((decay_weight(180.0, 90.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn two_day_old_engineering_source_is_nearly_fresh() {
        let w = decay_weight(2.0, 90.0);
        assert!(w > 0.98 && w < 0.99, "got {w}");
    }

    #[test]
    fn age_is_fractional_and_never_negative() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert!((age_days(now - Duration::hours(36), now) - 1.5).abs() < 1e-9);
        assert_eq!(age_days(now + Duration::days(3), now), 0.0);
    }

    #[test]
    fn default_half_lives_per_domain() {
        let h = HalfLives::default();
        assert_eq!(h.get(DecayDomain::Engineering), 90.0);
        assert_eq!(h.get(DecayDomain::Policy), 365.0);
        assert_eq!(h.get(DecayDomain::Incident), 30.0);
    }
}
