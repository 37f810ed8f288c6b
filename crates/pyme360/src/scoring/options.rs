use serde::{Deserialize, Serialize};

/// Whether a result persisted in the profile may be returned instead of
/// recomputing. Callers choose this explicitly per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    #[default]
    ReuseStored,
    Recompute,
}

impl CachePolicy {
    pub fn from_force_recompute(force_recompute: bool) -> Self {
        if force_recompute {
            Self::Recompute
        } else {
            Self::ReuseStored
        }
    }
}

/// Behavior when `historial_crediticio` exists but lists no accounts at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyHistoryPolicy {
    /// Estimate every component from company age and size plus jitter.
    #[default]
    Estimate,
    /// Report every component at its neutral default.
    Neutral,
}

impl EmptyHistoryPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "estimate" | "estimated" => Some(Self::Estimate),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Resolution of the synthetic trust score trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGranularity {
    #[default]
    Monthly,
    Quarterly,
}

impl TrendGranularity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Some(Self::Monthly),
            "quarterly" | "quarter" => Some(Self::Quarterly),
            _ => None,
        }
    }
}

/// Knobs applied by [`super::ScoreEngine`] on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOptions {
    pub cache: CachePolicy,
    pub empty_history: EmptyHistoryPolicy,
    pub trend: TrendGranularity,
}
