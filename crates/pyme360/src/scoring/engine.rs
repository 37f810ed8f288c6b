use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use super::credit::{self, CreditScoreResult};
use super::error::{ScoreError, ScoreOutcome};
use super::options::{CachePolicy, ScoringOptions, TrendGranularity};
use super::profile::BusinessProfile;
use super::trust::{self, TrustScoreResult};

/// Stateless entry point for both scores. Holds only immutable options, so a
/// single instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreEngine {
    options: ScoringOptions,
}

/// Both scores recomputed from scratch. Each slot carries its own failure so
/// a missing credit history does not hide the trust score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreUpdate {
    pub credit_score: ScoreOutcome<CreditScoreResult>,
    pub trust_score: ScoreOutcome<TrustScoreResult>,
}

impl ScoreEngine {
    pub fn new(options: ScoringOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    pub fn with_cache_policy(mut self, cache: CachePolicy) -> Self {
        self.options.cache = cache;
        self
    }

    pub fn with_trend(mut self, trend: TrendGranularity) -> Self {
        self.options.trend = trend;
        self
    }

    pub fn credit_score<R: Rng + ?Sized>(
        &self,
        profile: &BusinessProfile,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> Result<CreditScoreResult, ScoreError> {
        credit::calculate(profile, &self.options, as_of, rng)
    }

    pub fn trust_score<R: Rng + ?Sized>(
        &self,
        profile: &BusinessProfile,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> Result<TrustScoreResult, ScoreError> {
        trust::calculate(profile, &self.options, as_of, rng)
    }

    /// Recomputes both scores, ignoring any stored results.
    pub fn update_scores<R: Rng + ?Sized>(
        &self,
        profile: &BusinessProfile,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> ScoreUpdate {
        let engine = self.with_cache_policy(CachePolicy::Recompute);
        let update = ScoreUpdate {
            credit_score: engine.credit_score(profile, as_of, rng).into(),
            trust_score: engine.trust_score(profile, as_of, rng).into(),
        };

        info!(
            credit = update.credit_score.scored().map(|result| result.score),
            trust = update.trust_score.scored().map(|result| result.global_score),
            "scores recomputed"
        );
        update
    }
}
