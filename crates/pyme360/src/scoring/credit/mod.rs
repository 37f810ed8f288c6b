mod rules;

pub(crate) use rules::{payment_history, PaymentTally};

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ScoreError, SubScoreError};
use super::estimate::Estimator;
use super::history::{credit_trend, TrendPoint};
use super::options::{CachePolicy, EmptyHistoryPolicy, ScoringOptions};
use super::profile::{BusinessProfile, CreditHistory};
use super::ScoreBasis;
use rules::RuleOutcome;

pub const CREDIT_SCORE_MIN: u16 = 300;
pub const CREDIT_SCORE_MAX: u16 = 850;
const WEIGHT_SCALE: u32 = 10_000;

/// One of the five weighted credit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditFactor {
    PaymentHistory,
    CreditUtilization,
    HistoryLength,
    CreditMix,
    NewApplications,
}

impl CreditFactor {
    pub const ALL: [CreditFactor; 5] = [
        CreditFactor::PaymentHistory,
        CreditFactor::CreditUtilization,
        CreditFactor::HistoryLength,
        CreditFactor::CreditMix,
        CreditFactor::NewApplications,
    ];

    /// Weight in basis points; the five add up to 10 000.
    pub fn weight_bp(self) -> u32 {
        match self {
            CreditFactor::PaymentHistory => 3_500,
            CreditFactor::CreditUtilization => 3_000,
            CreditFactor::HistoryLength => 1_500,
            CreditFactor::CreditMix => 1_000,
            CreditFactor::NewApplications => 1_000,
        }
    }

    pub fn weight(self) -> f64 {
        f64::from(self.weight_bp()) / f64::from(WEIGHT_SCALE)
    }

    pub fn key(self) -> &'static str {
        match self {
            CreditFactor::PaymentHistory => "payment_history",
            CreditFactor::CreditUtilization => "credit_utilization",
            CreditFactor::HistoryLength => "history_length",
            CreditFactor::CreditMix => "credit_mix",
            CreditFactor::NewApplications => "new_applications",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditComponent {
    pub factor: CreditFactor,
    pub score: u8,
    pub weight: f64,
    pub basis: ScoreBasis,
    /// Raw measured value: percent for payment history and utilization,
    /// years for history length, counts for mix and applications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<f64>,
}

impl CreditComponent {
    fn new(factor: CreditFactor, score: u8, basis: ScoreBasis, metric: Option<f64>) -> Self {
        Self {
            factor,
            score: score.min(100),
            weight: factor.weight(),
            basis,
            metric,
        }
    }
}

/// Qualitative band for a 300-850 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditBand {
    Excellent,
    Good,
    Fair,
    Low,
    Poor,
}

impl CreditBand {
    pub fn for_score(score: u16) -> Self {
        match score {
            750.. => CreditBand::Excellent,
            670..=749 => CreditBand::Good,
            580..=669 => CreditBand::Fair,
            500..=579 => CreditBand::Low,
            _ => CreditBand::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CreditBand::Excellent => "Excellent",
            CreditBand::Good => "Good",
            CreditBand::Fair => "Fair",
            CreditBand::Low => "Low",
            CreditBand::Poor => "Poor",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CreditBand::Excellent => {
                "Your score places you in the top 10%, qualifying for the best rates and credit terms."
            }
            CreditBand::Good => {
                "Your score is above average, giving you access to favorable credit terms."
            }
            CreditBand::Fair => {
                "Your score is close to average. There is still room to improve and reach better credit terms."
            }
            CreditBand::Low => {
                "Your score is below average. New credit may be hard to obtain without additional collateral."
            }
            CreditBand::Poor => {
                "Your score is considerably low. Focus on improving your payment history and reducing current debt."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTier {
    pub band: CreditBand,
    pub name: String,
    pub description: String,
}

impl CreditTier {
    pub fn for_score(score: u16) -> Self {
        let band = CreditBand::for_score(score);
        Self {
            band,
            name: band.label().to_string(),
            description: band.description().to_string(),
        }
    }
}

/// Payment counts reported next to the score. Not weighted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total: u32,
    pub on_time: u32,
    pub late: u32,
    pub unclassified: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_time_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_days_late: Option<f64>,
}

impl From<PaymentTally> for PaymentSummary {
    fn from(tally: PaymentTally) -> Self {
        Self {
            total: tally.total(),
            on_time: tally.on_time,
            late: tally.late,
            unclassified: tally.unclassified,
            on_time_pct: tally.on_time_pct(),
            average_days_late: tally.average_days_late(),
        }
    }
}

/// Credit incident counts reported next to the score. Not weighted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentSummary {
    pub count: u32,
    pub open: u32,
    pub total_amount: f64,
}

impl IncidentSummary {
    fn from_history(history: &CreditHistory) -> Self {
        history
            .incidents
            .iter()
            .fold(Self::default(), |mut summary, incident| {
                summary.count += 1;
                if !incident.is_resolved() {
                    summary.open += 1;
                }
                summary.total_amount += incident.amount.unwrap_or(0.0);
                summary
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreResult {
    pub score: u16,
    pub basis: ScoreBasis,
    pub tier: CreditTier,
    pub components: Vec<CreditComponent>,
    pub history: Vec<TrendPoint>,
    #[serde(default)]
    pub payments: PaymentSummary,
    #[serde(default)]
    pub incidents: IncidentSummary,
    pub as_of: NaiveDate,
}

impl CreditScoreResult {
    pub fn component(&self, factor: CreditFactor) -> Option<&CreditComponent> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
    }

    /// A snapshot can stand in for a fresh calculation only when it carries
    /// each factor exactly once, every sub-score is within 0-100 and the
    /// score is inside the 300-850 band.
    fn is_well_formed(&self) -> bool {
        (CREDIT_SCORE_MIN..=CREDIT_SCORE_MAX).contains(&self.score)
            && self.components.len() == CreditFactor::ALL.len()
            && CreditFactor::ALL.iter().all(|factor| {
                self.component(*factor)
                    .is_some_and(|component| component.score <= 100)
            })
    }
}

pub(crate) fn calculate<R: Rng + ?Sized>(
    profile: &BusinessProfile,
    options: &ScoringOptions,
    as_of: NaiveDate,
    rng: &mut R,
) -> Result<CreditScoreResult, ScoreError> {
    if options.cache == CachePolicy::ReuseStored {
        if let Some(stored) = &profile.stored_credit_score {
            if stored.is_well_formed() {
                debug!(score = stored.score, "reusing stored credit score");
                return Ok(CreditScoreResult {
                    basis: ScoreBasis::Stored,
                    tier: CreditTier::for_score(stored.score),
                    ..stored.clone()
                });
            }
            debug!(
                score = stored.score,
                components = stored.components.len(),
                "stored credit score is malformed, recomputing"
            );
        }
    }

    let history = profile
        .credit_history
        .as_ref()
        .ok_or(ScoreError::MissingSection {
            section: "historial_crediticio",
        })?;

    let tally = PaymentTally::from_history(history);

    let (basis, components) = if history.has_accounts() {
        (ScoreBasis::Measured, measured_components(history, &tally, as_of))
    } else {
        match options.empty_history {
            EmptyHistoryPolicy::Estimate => {
                let scores = Estimator::new(rng).credit_components(profile, as_of);
                let components = CreditFactor::ALL
                    .iter()
                    .zip(scores)
                    .map(|(factor, score)| {
                        CreditComponent::new(*factor, score, ScoreBasis::Estimated, None)
                    })
                    .collect();
                (ScoreBasis::Estimated, components)
            }
            EmptyHistoryPolicy::Neutral => {
                let components = CreditFactor::ALL
                    .iter()
                    .map(|factor| {
                        CreditComponent::new(
                            *factor,
                            rules::NEUTRAL_SCORE,
                            ScoreBasis::Neutral,
                            None,
                        )
                    })
                    .collect();
                (ScoreBasis::Neutral, components)
            }
        }
    };

    let score = scale(&components);
    debug!(score, ?basis, "credit score computed");

    Ok(CreditScoreResult {
        score,
        basis,
        tier: CreditTier::for_score(score),
        components,
        history: credit_trend(score, as_of),
        payments: PaymentSummary::from(tally),
        incidents: IncidentSummary::from_history(history),
        as_of,
    })
}

fn measured_components(
    history: &CreditHistory,
    tally: &PaymentTally,
    as_of: NaiveDate,
) -> Vec<CreditComponent> {
    CreditFactor::ALL
        .iter()
        .map(|factor| {
            let outcome = match factor {
                CreditFactor::PaymentHistory => rules::payment_history(tally),
                CreditFactor::CreditUtilization => rules::credit_utilization(history),
                CreditFactor::HistoryLength => rules::history_length(history, as_of),
                CreditFactor::CreditMix => rules::credit_mix(history),
                CreditFactor::NewApplications => rules::new_applications(history, as_of),
            };
            settle(*factor, outcome)
        })
        .collect()
}

fn settle(factor: CreditFactor, outcome: Result<RuleOutcome, SubScoreError>) -> CreditComponent {
    let outcome = outcome.unwrap_or_else(|err| {
        warn!(factor = factor.key(), error = %err, "credit sub-score failed, using neutral default");
        RuleOutcome::neutral()
    });

    let basis = if outcome.metric.is_some() {
        ScoreBasis::Measured
    } else {
        ScoreBasis::Neutral
    };
    CreditComponent::new(factor, outcome.score, basis, outcome.metric)
}

/// Weighted sum mapped onto the 300-850 band, truncated.
fn scale(components: &[CreditComponent]) -> u16 {
    let weighted_bp: u32 = components
        .iter()
        .map(|component| u32::from(component.score.min(100)) * component.factor.weight_bp())
        .sum();
    let weighted_bp = weighted_bp.min(100 * WEIGHT_SCALE);

    let span = u32::from(CREDIT_SCORE_MAX - CREDIT_SCORE_MIN);
    let offset = weighted_bp * span / (100 * WEIGHT_SCALE);
    (CREDIT_SCORE_MIN + offset as u16).clamp(CREDIT_SCORE_MIN, CREDIT_SCORE_MAX)
}
