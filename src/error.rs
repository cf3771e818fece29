//! Error types for matching games.
//!
//! ## Taxonomy
//!
//! - [`GameError`]: fatal problems raised before or instead of solving
//!   (malformed instances, unsupported optimal roles, unknown players)
//! - [`EngineError`]: an engine hit its iteration guard
//! - [`InvalidMatching`]: every validity issue found by `check_validity`,
//!   reported together rather than failing on the first one
//!
//! Recoverable structural problems are not errors; see
//! [`Diagnostic`](crate::types::Diagnostic).

use std::fmt;

use thiserror::Error;

use crate::types::Optimal;

/// Fatal errors raised while constructing or solving a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The role string does not name any known party.
    #[error("unknown optimal role `{0}`")]
    UnknownOptimal(String),

    /// The role exists but the game cannot optimise for it.
    #[error("{game} cannot be solved {optimal}-optimally, expected one of {expected:?}")]
    InvalidOptimal {
        game: &'static str,
        optimal: Optimal,
        expected: &'static [Optimal],
    },

    /// Two players of the same party share a name.
    #[error("duplicate {party} name `{name}`")]
    DuplicatePlayer { party: &'static str, name: String },

    /// Stable marriage needs parties of equal size.
    #[error("there must be an equal number of suitors and reviewers: {suitors} != {reviewers}")]
    UnequalParties { suitors: usize, reviewers: usize },

    /// A roommate does not rank exactly every other roommate.
    #[error("roommate `{player}` must rank every other player exactly: missing {missing:?}")]
    IncompleteRoommatePreferences {
        player: String,
        missing: Vec<String>,
    },

    /// A capacitated player was given no capacity.
    #[error("no capacity given for {party} `{name}`")]
    MissingCapacity { party: &'static str, name: String },

    /// A project names a supervisor that does not exist.
    #[error("project `{project}` has unknown supervisor `{supervisor}`")]
    UnknownSupervisor { project: String, supervisor: String },

    /// A name passed to a setter is not a member of the expected party.
    #[error("`{name}` is not a {party}")]
    UnknownPlayer { party: &'static str, name: String },

    /// A roommate was asked to room with themselves.
    #[error("`{player}` cannot be paired with themselves")]
    SelfPairing { player: String },

    /// The engine gave up.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Errors raised from inside a proposal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The loop ran for more iterations than the instance can require.
    #[error("{engine} exceeded its iteration budget of {budget}")]
    BudgetExhausted { engine: &'static str, budget: usize },
}

/// A single problem found while validating a matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchingIssue {
    /// `player` is matched to `partner`, who is not on its preference list.
    NotAcceptable {
        player: String,
        partner: String,
        preferences: Vec<String>,
    },
    /// `player` holds more matches than its capacity allows.
    OverCapacity {
        player: String,
        capacity: usize,
        matching: Vec<String>,
    },
}

impl fmt::Display for MatchingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingIssue::NotAcceptable {
                player,
                partner,
                preferences,
            } => write!(
                f,
                "{player} is matched to {partner} but its preference list is {preferences:?}"
            ),
            MatchingIssue::OverCapacity {
                player,
                capacity,
                matching,
            } => write!(
                f,
                "{player} is matched to {matching:?} which is over its capacity of {capacity}"
            ),
        }
    }
}

/// Aggregated report raised by `check_validity`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("matching is invalid ({} issues): {}", .issues.len(), join_issues(.issues))]
pub struct InvalidMatching {
    pub issues: Vec<MatchingIssue>,
}

impl InvalidMatching {
    /// Issues about unacceptable partners only.
    pub fn unacceptable(&self) -> impl Iterator<Item = &MatchingIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, MatchingIssue::NotAcceptable { .. }))
    }

    /// Issues about exceeded capacities only.
    pub fn oversubscribed(&self) -> impl Iterator<Item = &MatchingIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, MatchingIssue::OverCapacity { .. }))
    }
}

fn join_issues(issues: &[MatchingIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_matching_lists_every_issue() {
        let error = InvalidMatching {
            issues: vec![
                MatchingIssue::NotAcceptable {
                    player: "A".into(),
                    partner: "X".into(),
                    preferences: vec!["Y".into()],
                },
                MatchingIssue::OverCapacity {
                    player: "H".into(),
                    capacity: 1,
                    matching: vec!["A".into(), "B".into()],
                },
            ],
        };

        let message = error.to_string();
        assert!(message.contains("2 issues"));
        assert!(message.contains("A is matched to X"));
        assert!(message.contains("over its capacity of 1"));
        assert_eq!(error.unacceptable().count(), 1);
        assert_eq!(error.oversubscribed().count(), 1);
    }

    #[test]
    fn test_engine_error_converts_into_game_error() {
        let error: GameError = EngineError::BudgetExhausted {
            engine: "stable_marriage",
            budget: 7,
        }
        .into();
        assert_eq!(error.to_string(), "stable_marriage exceeded its iteration budget of 7");
    }
}
