mod dimensions;
mod presentation;

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::benefits::{benefits_for, Benefit, TrustLevel};
use super::error::ScoreError;
use super::estimate::Estimator;
use super::history::{trust_trend, TrendPoint};
use super::options::{CachePolicy, ScoringOptions};
use super::profile::{BusinessProfile, StoredComponent};
use super::ScoreBasis;

const WEIGHT_SCALE: u32 = 10_000;

/// Business-practice dimension contributing to the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustDimension {
    Sustainability,
    TaxCompliance,
    LaborPractices,
    FinancialStability,
    PaymentPunctuality,
    Innovation,
}

impl TrustDimension {
    pub const ALL: [TrustDimension; 6] = [
        TrustDimension::Sustainability,
        TrustDimension::TaxCompliance,
        TrustDimension::LaborPractices,
        TrustDimension::FinancialStability,
        TrustDimension::PaymentPunctuality,
        TrustDimension::Innovation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TrustDimension::Sustainability => "sustainability",
            TrustDimension::TaxCompliance => "tax_compliance",
            TrustDimension::LaborPractices => "labor_practices",
            TrustDimension::FinancialStability => "financial_stability",
            TrustDimension::PaymentPunctuality => "payment_punctuality",
            TrustDimension::Innovation => "innovation",
        }
    }

    /// Key used by profile documents written before the English keys.
    pub fn legacy_key(self) -> &'static str {
        match self {
            TrustDimension::Sustainability => "sostenibilidad",
            TrustDimension::TaxCompliance => "cumplimiento_fiscal",
            TrustDimension::LaborPractices => "practicas_laborales",
            TrustDimension::FinancialStability => "estabilidad_financiera",
            TrustDimension::PaymentPunctuality => "puntualidad_pagos",
            TrustDimension::Innovation => "innovacion",
        }
    }

    pub fn weight_bp(self) -> u32 {
        match self {
            TrustDimension::Sustainability => 1_500,
            TrustDimension::TaxCompliance => 2_000,
            TrustDimension::LaborPractices => 1_500,
            TrustDimension::FinancialStability => 2_000,
            TrustDimension::PaymentPunctuality => 2_000,
            TrustDimension::Innovation => 1_000,
        }
    }

    pub fn weight(self) -> f64 {
        f64::from(self.weight_bp()) / f64::from(WEIGHT_SCALE)
    }

    /// Score used when the heuristic cannot run.
    pub fn neutral_score(self) -> u8 {
        match self {
            TrustDimension::Sustainability => 70,
            TrustDimension::TaxCompliance => 85,
            TrustDimension::LaborPractices => 75,
            TrustDimension::FinancialStability => 80,
            TrustDimension::PaymentPunctuality => 85,
            TrustDimension::Innovation => 65,
        }
    }

    pub(crate) fn bounds(self) -> RangeInclusive<i32> {
        match self {
            TrustDimension::Sustainability => 50..=90,
            TrustDimension::TaxCompliance => 75..=95,
            TrustDimension::LaborPractices => 60..=90,
            TrustDimension::FinancialStability => 50..=95,
            TrustDimension::PaymentPunctuality => 0..=100,
            TrustDimension::Innovation => 45..=90,
        }
    }

    pub(crate) fn spread(self) -> i32 {
        match self {
            TrustDimension::FinancialStability => 3,
            TrustDimension::PaymentPunctuality => 0,
            _ => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustComponent {
    pub dimension: TrustDimension,
    pub score: u8,
    pub weight: f64,
    pub basis: ScoreBasis,
    pub metrics: Vec<Value>,
    /// Initiatives, yearly history or trend rows, depending on the dimension.
    pub details: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustScoreResult {
    pub global_score: u8,
    pub level: Option<TrustLevel>,
    pub components: Vec<TrustComponent>,
    pub historical_trend: Vec<TrendPoint>,
    pub benefits: Vec<Benefit>,
    pub as_of: NaiveDate,
}

impl TrustScoreResult {
    pub fn component(&self, dimension: TrustDimension) -> Option<&TrustComponent> {
        self.components
            .iter()
            .find(|component| component.dimension == dimension)
    }
}

pub(crate) fn calculate<R: Rng + ?Sized>(
    profile: &BusinessProfile,
    options: &ScoringOptions,
    as_of: NaiveDate,
    rng: &mut R,
) -> Result<TrustScoreResult, ScoreError> {
    if profile.is_empty() {
        return Err(ScoreError::EmptyProfile);
    }

    let mut estimator = Estimator::new(rng);
    let components: Vec<TrustComponent> = TrustDimension::ALL
        .iter()
        .map(|dimension| {
            match stored_component(profile, options.cache, *dimension) {
                Some(component) => component,
                None => fresh_component(*dimension, profile, as_of, &mut estimator),
            }
        })
        .collect();

    let global_score = combine(&components);
    debug!(global_score, "trust score computed");

    Ok(TrustScoreResult {
        global_score,
        level: TrustLevel::for_score(global_score),
        components,
        historical_trend: trust_trend(global_score, as_of, options.trend),
        benefits: benefits_for(global_score),
        as_of,
    })
}

/// Reuses a persisted dimension when the cache policy allows it and the
/// stored score is positive.
fn stored_component(
    profile: &BusinessProfile,
    cache: CachePolicy,
    dimension: TrustDimension,
) -> Option<TrustComponent> {
    if cache != CachePolicy::ReuseStored {
        return None;
    }

    let stored = profile.stored_trust_score.as_ref()?;
    let component: &StoredComponent = stored
        .components
        .get(dimension.key())
        .or_else(|| stored.components.get(dimension.legacy_key()))?;
    let score = component.score.filter(|score| *score > 0.0)?;

    Some(TrustComponent {
        dimension,
        score: score.round().clamp(0.0, 100.0) as u8,
        weight: dimension.weight(),
        basis: ScoreBasis::Stored,
        metrics: component.metrics.clone(),
        details: component.details.clone(),
    })
}

fn fresh_component<R: Rng + ?Sized>(
    dimension: TrustDimension,
    profile: &BusinessProfile,
    as_of: NaiveDate,
    estimator: &mut Estimator<'_, R>,
) -> TrustComponent {
    let (score, basis) = match dimensions::assess(dimension, profile, as_of, estimator) {
        Ok(assessment) => (assessment.score, assessment.basis),
        Err(err) => {
            warn!(dimension = dimension.key(), error = %err, "trust sub-score failed, using neutral default");
            (dimension.neutral_score(), ScoreBasis::Neutral)
        }
    };

    TrustComponent {
        dimension,
        score: score.min(100),
        weight: dimension.weight(),
        basis,
        metrics: presentation::default_metrics(dimension),
        details: presentation::default_details(dimension, as_of),
    }
}

/// Weighted mean rounded half up.
fn combine(components: &[TrustComponent]) -> u8 {
    let weighted_bp: u32 = components
        .iter()
        .map(|component| u32::from(component.score.min(100)) * component.dimension.weight_bp())
        .sum();
    let rounded = (weighted_bp + WEIGHT_SCALE / 2) / WEIGHT_SCALE;
    rounded.min(100) as u8
}
