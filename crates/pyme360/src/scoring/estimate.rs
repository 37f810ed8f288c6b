//! Estimation path: the only place the engine draws random numbers.
//!
//! Components produced here are placeholders for data the profile does not
//! carry. They are tagged [`super::ScoreBasis::Estimated`] by the callers so
//! a consumer can always tell them apart from data-derived scores.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::Rng;

use super::profile::{BusinessProfile, CompanySize};

const CREDIT_BASE: i32 = 55;
const CREDIT_SPREAD: i32 = 8;
const CREDIT_BOUNDS: RangeInclusive<i32> = 20..=100;

/// Wraps the caller-supplied generator for one scoring call.
pub(crate) struct Estimator<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Estimator<'a, R> {
    pub(crate) fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    /// `base` plus a uniform offset in `[-spread, spread]`, clamped to `bounds`.
    pub(crate) fn jitter(&mut self, base: i32, spread: i32, bounds: RangeInclusive<i32>) -> u8 {
        let offset = self.rng.gen_range(-spread..=spread);
        let value = (base + offset).clamp(*bounds.start(), *bounds.end());
        value.clamp(0, 100) as u8
    }

    /// Five credit components derived from company age and size when the
    /// profile has no credit accounts to measure.
    pub(crate) fn credit_components(
        &mut self,
        profile: &BusinessProfile,
        as_of: NaiveDate,
    ) -> [u8; 5] {
        let base = credit_base(profile, as_of);
        std::array::from_fn(|_| self.jitter(base, CREDIT_SPREAD, CREDIT_BOUNDS))
    }
}

pub(crate) fn credit_base(profile: &BusinessProfile, as_of: NaiveDate) -> i32 {
    let age_bonus = match profile.company_age_years(as_of) {
        Some(years) if years >= 10.0 => 15,
        Some(years) if years >= 5.0 => 10,
        Some(years) if years >= 2.0 => 5,
        _ => 0,
    };

    let size_bonus = match profile.company_size() {
        CompanySize::Large => 10,
        CompanySize::Medium => 7,
        CompanySize::Small => 4,
        CompanySize::Micro | CompanySize::Unknown => 0,
    };

    CREDIT_BASE + age_bonus + size_bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn jitter_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut estimator = Estimator::new(&mut rng);
        for _ in 0..500 {
            let value = estimator.jitter(88, 5, 75..=90);
            assert!((83..=90).contains(&value), "value {value} escaped bounds");
        }
    }

    #[test]
    fn seeded_generators_repeat() {
        let profile = BusinessProfile::default();
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");

        let mut first = StdRng::seed_from_u64(11);
        let mut second = StdRng::seed_from_u64(11);
        let a = Estimator::new(&mut first).credit_components(&profile, as_of);
        let b = Estimator::new(&mut second).credit_components(&profile, as_of);
        assert_eq!(a, b);
    }

    #[test]
    fn base_rewards_age_and_size() {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
        let profile = BusinessProfile::from_value(json!({
            "informacion_general": { "fecha_fundacion": "2010-01-01", "tamano_empresa": "Grande" }
        }))
        .expect("profile parses");
        assert_eq!(credit_base(&profile, as_of), 80);
        assert_eq!(credit_base(&BusinessProfile::default(), as_of), 55);
    }
}
