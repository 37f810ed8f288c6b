//! Credit and trust score engine.
//!
//! Everything in here is synchronous and free of I/O. The current date and
//! the random source are passed in by the caller; randomness is only drawn
//! on the estimation path (see [`estimate`]).

mod benefits;
pub mod credit;
mod engine;
mod error;
mod estimate;
mod history;
mod ladder;
mod lenient;
mod options;
pub mod profile;
pub mod trust;

use serde::{Deserialize, Serialize};

pub use benefits::{benefits_for, Benefit, TrustLevel};
pub use credit::{
    CreditBand, CreditComponent, CreditFactor, CreditScoreResult, CreditTier, IncidentSummary,
    PaymentSummary, CREDIT_SCORE_MAX, CREDIT_SCORE_MIN,
};
pub use engine::{ScoreEngine, ScoreUpdate};
pub use error::{ScoreError, ScoreOutcome};
pub use history::TrendPoint;
pub use options::{CachePolicy, EmptyHistoryPolicy, ScoringOptions, TrendGranularity};
pub use profile::{BusinessProfile, CompanySize, PaymentStatus};
pub use trust::{TrustComponent, TrustDimension, TrustScoreResult};

/// Where a score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    /// Derived from data in the profile.
    Measured,
    /// Returned from a result persisted in the profile.
    Stored,
    /// Placeholder drawn on the estimation path.
    Estimated,
    /// Fixed default used because no usable data was present.
    Neutral,
}

#[cfg(test)]
mod tests;
