use chrono::NaiveDate;
use rand::Rng;

use super::super::credit::{payment_history, PaymentTally};
use super::super::error::SubScoreError;
use super::super::estimate::Estimator;
use super::super::profile::{BusinessProfile, CompanySize};
use super::super::ScoreBasis;
use super::TrustDimension;

const TECH_SECTORS: [&str; 9] = [
    "tecnología",
    "tecnologia",
    "software",
    "electrónica",
    "electronica",
    "telecomunicaciones",
    "technology",
    "electronics",
    "telecommunications",
];

const MODERN_SECTORS: [&str; 9] = [
    "biotech",
    "biotecnología",
    "biotecnologia",
    "energías renovables",
    "energias renovables",
    "farmacéutica",
    "farmaceutica",
    "renewable",
    "pharma",
];

const MARGIN_WINDOW: usize = 3;

pub(crate) struct Assessment {
    pub score: u8,
    pub basis: ScoreBasis,
}

impl Assessment {
    fn estimated(score: u8) -> Self {
        Self {
            score,
            basis: ScoreBasis::Estimated,
        }
    }
}

/// Heuristic score for one dimension when nothing stored is reused.
pub(crate) fn assess<R: Rng + ?Sized>(
    dimension: TrustDimension,
    profile: &BusinessProfile,
    as_of: NaiveDate,
    estimator: &mut Estimator<'_, R>,
) -> Result<Assessment, SubScoreError> {
    let bounds = dimension.bounds();
    let spread = dimension.spread();
    let base = i32::from(dimension.neutral_score());

    let assessment = match dimension {
        TrustDimension::Sustainability => {
            let bonus = match profile.company_age_years(as_of) {
                Some(years) if years > 10.0 => 10,
                Some(years) if years > 5.0 => 5,
                _ => 0,
            };
            Assessment::estimated(estimator.jitter(base + bonus, spread, bounds))
        }
        TrustDimension::TaxCompliance => {
            Assessment::estimated(estimator.jitter(base, spread, bounds))
        }
        TrustDimension::LaborPractices => {
            let employees = profile
                .general
                .as_ref()
                .and_then(|general| general.employees)
                .unwrap_or(0.0);
            let bonus = match profile.company_size() {
                CompanySize::Large => 10,
                _ if employees > 200.0 => 10,
                CompanySize::Medium => 5,
                _ if employees > 50.0 => 5,
                _ => 0,
            };
            Assessment::estimated(estimator.jitter(base + bonus, spread, bounds))
        }
        TrustDimension::FinancialStability => {
            let adjustment = margin_adjustment(profile)?;
            Assessment::estimated(estimator.jitter(base + adjustment, spread, bounds))
        }
        TrustDimension::PaymentPunctuality => match &profile.credit_history {
            Some(history) => {
                let outcome = payment_history(&PaymentTally::from_history(history))?;
                let basis = if outcome.metric.is_some() {
                    ScoreBasis::Measured
                } else {
                    ScoreBasis::Neutral
                };
                Assessment {
                    score: outcome.score,
                    basis,
                }
            }
            None => Assessment {
                score: dimension.neutral_score(),
                basis: ScoreBasis::Neutral,
            },
        },
        TrustDimension::Innovation => {
            let sector_bonus = sector_bonus(profile);
            let age_bonus = match profile.company_age_years(as_of) {
                Some(years) if years < 5.0 => 10,
                Some(years) if years < 10.0 => 5,
                Some(years) if years > 20.0 => -5,
                _ => 0,
            };
            Assessment::estimated(estimator.jitter(base + sector_bonus + age_bonus, spread, bounds))
        }
    };

    Ok(assessment)
}

/// Mean of the trailing valid monthly net margins mapped onto a score
/// adjustment. Margins are fractions (0.12 is 12%).
fn margin_adjustment(profile: &BusinessProfile) -> Result<i32, SubScoreError> {
    let margins: Vec<f64> = profile
        .profit_margin
        .as_ref()
        .map(|section| {
            section
                .monthly
                .iter()
                .filter_map(|month| month.net_margin)
                .collect()
        })
        .unwrap_or_default();

    let trailing = &margins[margins.len().saturating_sub(MARGIN_WINDOW)..];
    if trailing.is_empty() {
        return Ok(0);
    }

    let average = trailing.iter().sum::<f64>() / trailing.len() as f64;
    if !average.is_finite() {
        return Err(SubScoreError::NonFiniteAverage {
            field: "margen_neto",
            value: average,
        });
    }

    Ok(match average {
        avg if avg > 0.20 => 10,
        avg if avg > 0.15 => 5,
        avg if avg < 0.0 => -15,
        avg if avg < 0.05 => -5,
        _ => 0,
    })
}

fn sector_bonus(profile: &BusinessProfile) -> i32 {
    let Some(sector) = profile
        .general
        .as_ref()
        .and_then(|general| general.sector.as_deref())
    else {
        return 0;
    };
    let sector = sector.to_lowercase();

    if TECH_SECTORS.iter().any(|marker| sector.contains(marker)) {
        15
    } else if MODERN_SECTORS.iter().any(|marker| sector.contains(marker)) {
        10
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: serde_json::Value) -> BusinessProfile {
        BusinessProfile::from_value(value).expect("profile parses")
    }

    #[test]
    fn negative_margins_take_the_largest_penalty() {
        let losing = profile(json!({
            "margen_beneficio": { "datos_mensuales": [
                { "mes": "2026-07", "margen_neto": 0.30 },
                { "mes": "2026-08", "margen_neto": -0.10 },
                { "mes": "2026-09", "margen_neto": -0.05 },
                { "mes": "2026-10", "margen_neto": -0.02 }
            ]}
        }));
        assert_eq!(margin_adjustment(&losing), Ok(-15));

        let thin = profile(json!({
            "margen_beneficio": { "datos_mensuales": [{ "margen_neto": 0.03 }] }
        }));
        assert_eq!(margin_adjustment(&thin), Ok(-5));

        let healthy = profile(json!({
            "margen_beneficio": { "datos_mensuales": [{ "margen_neto": "0.22" }] }
        }));
        assert_eq!(margin_adjustment(&healthy), Ok(10));
    }

    #[test]
    fn margins_skip_unusable_months() {
        let mixed = profile(json!({
            "margen_beneficio": { "datos_mensuales": [
                { "margen_neto": 0.18 },
                { "margen_neto": "n/a" },
                { "mes": "2026-10" }
            ]}
        }));
        assert_eq!(margin_adjustment(&mixed), Ok(5));
        assert_eq!(margin_adjustment(&BusinessProfile::default()), Ok(0));
    }

    #[test]
    fn sector_bonus_prefers_technology() {
        let software = profile(json!({ "informacion_general": { "sector": "Software y Servicios" } }));
        assert_eq!(sector_bonus(&software), 15);

        let pharma = profile(json!({ "informacion_general": { "sector": "Farmacéutica" } }));
        assert_eq!(sector_bonus(&pharma), 10);

        let retail = profile(json!({ "informacion_general": { "sector": "Comercio" } }));
        assert_eq!(sector_bonus(&retail), 0);
    }
}
