//! Irving's algorithm for stable roommates.
//!
//! ## Phase 1
//!
//! Everyone proposes down their list. A player holds at most one proposal
//! at a time, and on accepting `p` rejects everyone it ranks below `p`.
//! Holding is one-way: the proposer's own state is untouched.
//!
//! ## Phase 2
//!
//! While somebody still has two or more candidates, find a rotation
//! starting from them:
//!
//! ```text
//! x_0 := a player with at least two candidates
//! y_i := second candidate of x_i
//! x_{i+1} := last candidate of y_i
//! ```
//!
//! until some `x` repeats. The cycle from the first repeat onward is the
//! rotation. For each `(x_i, y_i)` in it, `y_i` rejects everyone ranked
//! below `x_i`, not just `x_{i+1}`; dropping only the literal rotation pairs
//! leaves dangling tails that later phases mistake for candidates.
//!
//! An empty list at any point proves there is no stable matching. The
//! engine records a [`Diagnostic::NoStableMatching`] and stops reducing.
//!
//! ## Finalisation
//!
//! Every player is matched to the head of whatever list remains.

use crate::engine::{Budget, SingleAssignment};
use crate::error::EngineError;
use crate::players::{Arena, PlayerKey};
use crate::types::Diagnostic;
use crate::LOG_TARGET;

/// What [`stable_roommates`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoommatesOutcome {
    /// Each player with their final roommate, in input order
    pub matching: SingleAssignment,

    /// `NoStableMatching` reports, at most one per phase
    pub diagnostics: Vec<Diagnostic>,
}

impl RoommatesOutcome {
    /// Whether the matching is known to be stable-less
    pub fn is_stable_matching_impossible(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_no_stable_matching)
    }
}

/// Run both phases of Irving's algorithm over `players`.
pub fn stable_roommates(
    arena: &mut Arena,
    players: &[PlayerKey],
) -> Result<RoommatesOutcome, EngineError> {
    let _span = tracing::debug_span!(
        target: LOG_TARGET,
        "stable_roommates",
        players = players.len(),
    )
    .entered();

    let mut budget = Budget::for_arena("stable_roommates", arena);
    let mut diagnostics = Vec::new();

    first_phase(arena, players, &mut budget)?;
    if let Some(diagnostic) = exhausted(arena, players) {
        diagnostics.push(diagnostic);
    }

    if players.iter().any(|&p| arena[p].preferences().len() > 1) {
        if let Some(diagnostic) = second_phase(arena, players, &mut budget)? {
            diagnostics.push(diagnostic);
        }
    }

    for &player in players {
        let head = arena[player].preferences().first().copied();
        let state = &mut arena[player];
        state.clear_matching();
        if let Some(head) = head {
            state.record_match(head);
        }
    }

    tracing::debug!(
        target: LOG_TARGET,
        iterations = budget.spent(),
        stable = diagnostics.is_empty(),
        "stable roommates solved",
    );

    Ok(RoommatesOutcome {
        matching: players.iter().map(|&p| (p, arena[p].partner())).collect(),
        diagnostics,
    })
}

fn first_phase(
    arena: &mut Arena,
    players: &[PlayerKey],
    budget: &mut Budget,
) -> Result<(), EngineError> {
    let mut free: Vec<PlayerKey> = players.to_vec();

    while let Some(player) = free.pop() {
        budget.spend()?;

        let Some(favourite) = arena[player].preferences().first().copied() else {
            continue;
        };

        if let Some(held) = arena[favourite].partner() {
            arena[favourite].record_unmatch(held);
            free.push(held);
        }

        tracing::trace!(
            target: LOG_TARGET,
            proposer = arena.name(player),
            holder = arena.name(favourite),
            "proposal held",
        );
        arena[favourite].record_match(player);

        let successors = arena[favourite].successors().to_vec();
        for successor in successors {
            arena.delete_pair(favourite, successor);
            if arena[successor].preferences().is_empty() {
                free.retain(|&p| p != successor);
            }
        }
    }

    Ok(())
}

/// Eliminate rotations until every list has at most one entry, or one
/// empties. Returns the diagnostic in the latter case.
fn second_phase(
    arena: &mut Arena,
    players: &[PlayerKey],
    budget: &mut Budget,
) -> Result<Option<Diagnostic>, EngineError> {
    while let Some(start) = players
        .iter()
        .copied()
        .find(|&p| arena[p].preferences().len() > 1)
    {
        budget.spend()?;

        let Some(rotation) = locate_rotation(arena, start) else {
            return Ok(Some(no_stable_matching(arena, players)));
        };

        for (right, successor) in rejections(arena, &rotation) {
            arena.delete_pair(right, successor);
        }

        if let Some(diagnostic) = exhausted(arena, players) {
            return Ok(Some(diagnostic));
        }
    }

    Ok(None)
}

/// Trace `x -> second(x) -> last(second(x))` from `start` until a player
/// repeats. Returns the cycle as `(x_{i+1}, y_i)` pairs, or `None` if a list
/// runs short along the way.
///
/// The walk visits each player at most once before repeating.
fn locate_rotation(arena: &Arena, start: PlayerKey) -> Option<Vec<(PlayerKey, PlayerKey)>> {
    let mut lasts = vec![start];
    let mut seconds = Vec::new();
    let mut player = start;

    loop {
        let &second = arena[player].preferences().get(1)?;
        let &last = arena[second].preferences().last()?;

        seconds.push(second);
        player = last;
        if lasts.contains(&player) {
            lasts.push(player);
            break;
        }
        lasts.push(player);
    }

    let first = lasts.iter().position(|&p| p == player)?;

    Some(
        lasts[first + 1..]
            .iter()
            .copied()
            .zip(seconds[first..].iter().copied())
            .collect(),
    )
}

/// Every `(y_i, t)` where `t` is ranked below `x_i` on `y_i`'s list.
fn rejections(arena: &Arena, rotation: &[(PlayerKey, PlayerKey)]) -> Vec<(PlayerKey, PlayerKey)> {
    let mut pairs: Vec<(PlayerKey, PlayerKey)> = Vec::new();

    for (i, &(_, right)) in rotation.iter().enumerate() {
        let left = rotation[(i + rotation.len() - 1) % rotation.len()].0;
        let preferences = arena[right].preferences();
        let Some(idx) = preferences.iter().position(|&p| p == left) else {
            continue;
        };

        for &successor in &preferences[idx + 1..] {
            if !pairs.contains(&(right, successor)) && !pairs.contains(&(successor, right)) {
                pairs.push((right, successor));
            }
        }
    }

    pairs
}

fn exhausted(arena: &Arena, players: &[PlayerKey]) -> Option<Diagnostic> {
    players
        .iter()
        .any(|&p| arena[p].preferences().is_empty())
        .then(|| no_stable_matching(arena, players))
}

fn no_stable_matching(arena: &Arena, players: &[PlayerKey]) -> Diagnostic {
    let empty: Vec<PlayerKey> = players
        .iter()
        .copied()
        .filter(|&p| arena[p].preferences().is_empty())
        .collect();

    Diagnostic::NoStableMatching {
        players: arena.names(&empty),
    }
    .emit()
}

// ============================================================================
// Unit Tests
// ============================================================================
