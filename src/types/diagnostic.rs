//! Recoverable warnings about a game instance.
//!
//! Diagnostics never abort construction or solving. They are collected on
//! the game, available through `diagnostics()`, and logged at `WARN` level
//! as they are raised. Whether a diagnostic was also repaired depends on the
//! `clean` flag the game was created with.

use std::fmt;

use crate::LOG_TARGET;

/// A structural warning raised while checking or solving an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A preference list names the same player more than once.
    DuplicatePreferences {
        party: &'static str,
        player: String,
        duplicates: Vec<String>,
    },

    /// A preference list names players outside the other party. These
    /// entries are always skipped since there is no player to point at.
    UnknownPreferences {
        party: &'static str,
        player: String,
        unknown: Vec<String>,
    },

    /// `player` ranks `other`, but `other` does not rank `player` back.
    UnreciprocatedPreference {
        party: &'static str,
        player: String,
        other: String,
    },

    /// A player has nobody to be matched with.
    EmptyPreferences { party: &'static str, player: String },

    /// A capacitated player cannot accept anyone.
    NonPositiveCapacity { party: &'static str, player: String },

    /// A project can hold more students than its supervisor.
    ProjectCapacityExceedsSupervisor {
        project: String,
        capacity: usize,
        supervisor: String,
        supervisor_capacity: usize,
    },

    /// A supervisor can hold more students than all its projects combined.
    SupervisorCapacityExceedsProjects {
        supervisor: String,
        capacity: usize,
        total: usize,
    },

    /// A stable marriage player does not rank the whole other party.
    IncompleteRanking {
        party: &'static str,
        player: String,
        missing: Vec<String>,
    },

    /// The roommates instance has no stable matching; `players` were
    /// rejected by everyone they ranked.
    NoStableMatching { players: Vec<String> },
}

impl Diagnostic {
    /// The player the diagnostic is about, if it concerns a single one.
    pub fn player(&self) -> Option<&str> {
        match self {
            Diagnostic::DuplicatePreferences { player, .. }
            | Diagnostic::UnknownPreferences { player, .. }
            | Diagnostic::UnreciprocatedPreference { player, .. }
            | Diagnostic::EmptyPreferences { player, .. }
            | Diagnostic::NonPositiveCapacity { player, .. }
            | Diagnostic::IncompleteRanking { player, .. } => Some(player),
            Diagnostic::ProjectCapacityExceedsSupervisor { project, .. } => Some(project),
            Diagnostic::SupervisorCapacityExceedsProjects { supervisor, .. } => Some(supervisor),
            Diagnostic::NoStableMatching { .. } => None,
        }
    }

    /// Whether this is the roommates non-existence signal.
    pub fn is_no_stable_matching(&self) -> bool {
        matches!(self, Diagnostic::NoStableMatching { .. })
    }

    /// Log the diagnostic and hand it back for collection.
    pub(crate) fn emit(self) -> Self {
        tracing::warn!(target: LOG_TARGET, "{}", self);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicatePreferences {
                party,
                player,
                duplicates,
            } => {
                write!(f, "{party} {player} ranks {duplicates:?} more than once")
            }
            Diagnostic::UnknownPreferences {
                party,
                player,
                unknown,
            } => {
                write!(f, "{party} {player} ranks non-members {unknown:?}, ignoring them")
            }
            Diagnostic::UnreciprocatedPreference {
                party,
                player,
                other,
            } => {
                write!(f, "{party} {player} ranks {other}, who does not rank {player}")
            }
            Diagnostic::EmptyPreferences { party, player } => {
                write!(f, "{party} {player} has an empty preference list")
            }
            Diagnostic::NonPositiveCapacity { party, player } => {
                write!(f, "{party} {player} does not have a positive capacity")
            }
            Diagnostic::ProjectCapacityExceedsSupervisor {
                project,
                capacity,
                supervisor,
                supervisor_capacity,
            } => write!(
                f,
                "project {project} has capacity {capacity}, more than its supervisor \
                 {supervisor}'s capacity of {supervisor_capacity}"
            ),
            Diagnostic::SupervisorCapacityExceedsProjects {
                supervisor,
                capacity,
                total,
            } => write!(
                f,
                "supervisor {supervisor} has capacity {capacity}, more than the {total} \
                 places its projects offer"
            ),
            Diagnostic::IncompleteRanking {
                party,
                player,
                missing,
            } => {
                write!(f, "{party} {player} does not rank {missing:?}")
            }
            Diagnostic::NoStableMatching { players } => write!(
                f,
                "no stable matching exists; these players were rejected by all others, \
                 emptying their preference lists: {players:?}"
            ),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
