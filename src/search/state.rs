//! Search lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The generation budget was used up.
    MaxGenerations,
    /// The archive did not improve for the configured number of generations.
    Stagnation,
    /// The cancellation token was set.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxGenerations => write!(f, "max generations reached"),
            Self::Stagnation => write!(f, "stagnation"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Phase of the evolutionary loop.
///
/// ```text
/// Initialized → Evaluating → Ranking → Selecting → Varying ─┐
///                   ↑                                        │
///                   └────────────────────────────────────────┘
///                   Ranking ──(stop condition)──→ Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    /// Built, no generation has run.
    Initialized,
    /// Decoding and evaluating new individuals.
    Evaluating,
    /// Non-dominated sorting and survivor selection.
    Ranking,
    /// Choosing parents by tournament.
    Selecting,
    /// Applying crossover and mutation.
    Varying,
    /// Stopped.
    Terminated(TerminationReason),
}

impl SearchState {
    /// Whether the loop has stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: SearchState) -> bool {
        use SearchState::*;
        matches!(
            (self, next),
            (Initialized, Evaluating)
                | (Evaluating, Ranking)
                | (Ranking, Selecting)
                | (Ranking, Terminated(_))
                | (Selecting, Varying)
                | (Varying, Evaluating)
        )
    }
}
