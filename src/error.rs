use thiserror::Error;

use crate::baseline::BaselineMetric;

/// Failure reasons for every engine computation.
///
/// Both the "no value" cases (a team without home or away history) and the
/// cases the engine answers with a zero fallback (secondary metrics) are
/// reported through this type, so callers always branch on a tagged reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("dataset has no matches")]
    EmptyDataset,
    #[error("{team} has no home matches in this dataset")]
    NoHomeMatches { team: String },
    #[error("{team} has no away matches in this dataset")]
    NoAwayMatches { team: String },
    #[error("{team} has no matches in this dataset")]
    NoMatches { team: String },
    #[error("league mean for {metric} is zero")]
    ZeroBaseline { metric: BaselineMetric },
    #[error("{team} cannot play itself")]
    SameTeam { team: String },
}

impl EngineError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyDataset
                | EngineError::NoHomeMatches { .. }
                | EngineError::NoAwayMatches { .. }
                | EngineError::NoMatches { .. }
                | EngineError::ZeroBaseline { .. }
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
