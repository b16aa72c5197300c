//! Small helpers shared by the layout passes.

use crate::error::{Invariant, Result};

/// Result of a loop with an explicit iteration ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Converged { iterations: usize },
    IterationLimitExceeded { limit: usize },
}

impl Outcome {
    pub fn is_converged(self) -> bool {
        matches!(self, Outcome::Converged { .. })
    }

    /// Turns an exceeded ceiling into [`Invariant::IterationLimitExceeded`] for `pass`.
    pub fn into_result(self, pass: &'static str) -> Result<usize> {
        match self {
            Outcome::Converged { iterations } => Ok(iterations),
            Outcome::IterationLimitExceeded { limit } => {
                Err(Invariant::IterationLimitExceeded { pass, limit }.into())
            }
        }
    }
}

