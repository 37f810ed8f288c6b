use serde::{Deserialize, Serialize};

/// Caller-visible scoring failure. Only whole missing inputs surface here;
/// record and sub-score problems are absorbed inside the calculators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("no credit history data available (missing `{section}`)")]
    MissingSection { section: &'static str },
    #[error("no profile data available")]
    EmptyProfile,
}

/// Failure inside a single sub-score routine. Replaced by the component's
/// neutral default before it can reach the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum SubScoreError {
    #[error("{field} total {value} is not a usable amount")]
    InvalidTotal { field: &'static str, value: f64 },
    #[error("{field} average {value} is not finite")]
    NonFiniteAverage { field: &'static str, value: f64 },
}

/// Result slot that serializes either as the score document or as
/// `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreOutcome<T> {
    Scored(T),
    Failed { error: String },
}

impl<T> From<Result<T, ScoreError>> for ScoreOutcome<T> {
    fn from(result: Result<T, ScoreError>) -> Self {
        match result {
            Ok(value) => Self::Scored(value),
            Err(err) => Self::Failed {
                error: err.to_string(),
            },
        }
    }
}

impl<T> ScoreOutcome<T> {
    pub fn scored(&self) -> Option<&T> {
        match self {
            Self::Scored(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}
