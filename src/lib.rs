//! # Matching Games
//!
//! Stable matching algorithms for two-sided and one-sided markets.
//!
//! ## Architecture
//!
//! The crate consists of:
//! - **Types**: Leaf value types (`Optimal`, `Diagnostic`) and rank conversion
//! - **Players**: Slab-backed player arena with the pairing primitives
//! - **Engine**: One proposal state machine per game
//! - **Games**: Orchestrators that check input, solve, and verify results
//! - **Matching**: Read-side result containers with SHA-256 fingerprints
//!
//! ## Games
//!
//! | Game | Engine | Optimal roles |
//! |------|--------|---------------|
//! | [`StableMarriage`] | Gale-Shapley | suitor, reviewer |
//! | [`HospitalResident`] | capacitated Gale-Shapley | resident, hospital |
//! | [`StudentAllocation`] | two-level capacitated Gale-Shapley | student, supervisor |
//! | [`StableRoommates`] | Irving's two-phase algorithm | - |
//!
//! ## Design Principles
//!
//! 1. **Arena, not graphs**: players refer to each other by slab key, so
//!    pruning a pair is a symmetric removal from two key lists
//! 2. **Warnings are values**: structural problems are collected as
//!    [`Diagnostic`]s and logged through `tracing`, never panics
//! 3. **Original rankings are frozen**: stability is always judged against
//!    the preferences a player started with, not the pruned working copy
//! 4. **Synchronous Execution**: every engine is a sequential work queue
//!
//! ## Example
//!
//! ```
//! use matching_games::{HospitalResident, Optimal};
//!
//! let residents = [
//!     ("A", vec!["C"]),
//!     ("S", vec!["C", "M"]),
//!     ("D", vec!["C", "M", "G"]),
//!     ("J", vec!["C", "G", "M"]),
//!     ("L", vec!["M", "C", "G"]),
//! ];
//! let hospitals = [
//!     ("M", vec!["D", "L", "S", "J"]),
//!     ("C", vec!["D", "A", "S", "L", "J"]),
//!     ("G", vec!["D", "J", "L"]),
//! ];
//! let capacities = [("M", 2), ("C", 2), ("G", 2)];
//!
//! let mut game =
//!     HospitalResident::create_from_dictionaries(residents, hospitals, capacities, false)
//!         .unwrap();
//! let matching = game.solve(Optimal::Resident).unwrap();
//!
//! assert_eq!(matching.members("M"), Some(vec!["L", "S"]));
//! assert_eq!(matching.members("C"), Some(vec!["D", "A"]));
//! assert_eq!(matching.members("G"), Some(vec!["J"]));
//! assert!(game.check_stability());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for construction, solving and validation
pub mod error;

/// Core value types: Optimal, Diagnostic, rank conversion
pub mod types;

/// Player model: slab arena, parties and pairing primitives
pub mod players;

/// Proposal engines: one state machine per game
pub mod engine;

/// Game orchestrators
pub mod games;

/// Result containers
pub mod matching;

/// Target used for every `tracing` event emitted by this crate.
pub(crate) const LOG_TARGET: &str = "matching-games";

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{EngineError, GameError, InvalidMatching, MatchingIssue};
pub use types::{Diagnostic, Optimal};
pub use players::{Arena, Party, Player, PlayerKey, PlayerKind};
pub use games::{HospitalResident, StableMarriage, StableRoommates, StudentAllocation};
pub use matching::{MultipleMatching, SingleMatching};
