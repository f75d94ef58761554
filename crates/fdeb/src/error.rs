use crate::bundler::RunState;

/// Failures of a bundling run. Cancellation is not an error; see `RunOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid bundling parameter `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("compatibility score {name} = {value} outside [0, 1] for edges {i} and {j}")]
    ScoreOutOfRange {
        name: &'static str,
        value: f64,
        i: usize,
        j: usize,
    },
    #[error("flow graph has {found} edges, run was initialized with {expected}")]
    EdgeCountMismatch { expected: usize, found: usize },
    #[error("cannot {op} while the run is {state:?}")]
    InvalidState { op: &'static str, state: RunState },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
