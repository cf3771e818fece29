//! Gale-Shapley for stable marriage.
//!
//! ## Algorithm
//!
//! ```text
//! while some suitor s is free:
//!     r := head of s's list
//!     if r holds s':  unmatch (s', r), s' is free again
//!     match (s, r)
//!     for every successor t of s on r's list: delete (t, r)
//! ```
//!
//! After `r` accepts `s`, nobody ranked below `s` can ever win `r`, so
//! those pairs are deleted from both lists. That is also why a suitor always
//! beats the reviewer's current partner: anyone worse is already gone.
//!
//! The result is suitor-optimal and reviewer-pessimal. For the
//! reviewer-optimal matching, call the engine with the roles swapped.

use crate::engine::Budget;
use crate::error::EngineError;
use crate::players::{Arena, PlayerKey};
use crate::LOG_TARGET;

/// Raw mapping from each player to its partner, if any.
pub type SingleAssignment = Vec<(PlayerKey, Option<PlayerKey>)>;

/// Run Gale-Shapley with `suitors` proposing.
///
/// Returns each suitor with its final partner, in the order given.
pub fn stable_marriage(
    arena: &mut Arena,
    suitors: &[PlayerKey],
) -> Result<SingleAssignment, EngineError> {
    let _span = tracing::debug_span!(
        target: LOG_TARGET,
        "stable_marriage",
        suitors = suitors.len(),
    )
    .entered();

    let mut budget = Budget::for_arena("stable_marriage", arena);
    let mut free: Vec<PlayerKey> = suitors
        .iter()
        .copied()
        .filter(|&suitor| !arena[suitor].preferences().is_empty())
        .collect();

    while let Some(suitor) = free.pop() {
        budget.spend()?;

        let Some(reviewer) = arena[suitor].favourite() else {
            continue;
        };

        if !arena[reviewer].is_acceptable(suitor) {
            arena.delete_pair(suitor, reviewer);
            if !arena[suitor].preferences().is_empty() {
                free.push(suitor);
            }
            continue;
        }

        if let Some(current) = arena[reviewer].partner() {
            arena.unmatch_pair(current, reviewer);
            free.push(current);
        }

        tracing::trace!(
            target: LOG_TARGET,
            suitor = arena.name(suitor),
            reviewer = arena.name(reviewer),
            "proposal accepted",
        );
        arena.match_pair(suitor, reviewer);

        let successors = arena[reviewer].successors().to_vec();
        for successor in successors {
            arena.delete_pair(successor, reviewer);
        }
    }

    tracing::debug!(target: LOG_TARGET, iterations = budget.spent(), "stable marriage solved");

    Ok(suitors.iter().map(|&suitor| (suitor, arena[suitor].partner())).collect())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::Player;

    /// Build an arena from rows of preference indices into the other side.
    fn build(
        suitor_prefs: &[&[usize]],
        reviewer_prefs: &[&[usize]],
    ) -> (Arena, Vec<PlayerKey>, Vec<PlayerKey>) {
        let mut arena = Arena::new();
        let suitors: Vec<_> = (0..suitor_prefs.len())
            .map(|i| arena.insert(Player::new(format!("S{i}"))))
            .collect();
        let reviewers: Vec<_> = (0..reviewer_prefs.len())
            .map(|i| arena.insert(Player::new(format!("R{i}"))))
            .collect();

        for (&suitor, prefs) in suitors.iter().zip(suitor_prefs) {
            arena.set_preferences(suitor, prefs.iter().map(|&i| reviewers[i]).collect());
        }
        for (&reviewer, prefs) in reviewers.iter().zip(reviewer_prefs) {
            arena.set_preferences(reviewer, prefs.iter().map(|&i| suitors[i]).collect());
        }
        (arena, suitors, reviewers)
    }

    #[test]
    fn test_everyone_gets_first_choice() {
        let (mut arena, s, r) = build(&[&[0, 1], &[1, 0]], &[&[0, 1], &[1, 0]]);

        let result = stable_marriage(&mut arena, &s).unwrap();

        assert_eq!(result, vec![(s[0], Some(r[0])), (s[1], Some(r[1]))]);
        assert_eq!(arena[r[0]].partner(), Some(s[0]));
    }

    #[test]
    fn test_suitor_and_reviewer_optimal_differ() {
        // Each suitor's first choice prefers the other suitor
        let suitor_prefs: &[&[usize]] = &[&[0, 1], &[1, 0]];
        let reviewer_prefs: &[&[usize]] = &[&[1, 0], &[0, 1]];

        let (mut arena, s, r) = build(suitor_prefs, reviewer_prefs);
        let result = stable_marriage(&mut arena, &s).unwrap();
        assert_eq!(result, vec![(s[0], Some(r[0])), (s[1], Some(r[1]))]);

        let (mut arena, s, r) = build(suitor_prefs, reviewer_prefs);
        let result = stable_marriage(&mut arena, &r).unwrap();
        assert_eq!(result, vec![(r[0], Some(s[1])), (r[1], Some(s[0]))]);
    }

    #[test]
    fn test_rejected_suitor_moves_down_list() {
        // Both suitors want R0, who prefers S1
        let (mut arena, s, r) = build(&[&[0, 1], &[0, 1]], &[&[1, 0], &[0, 1]]);

        let result = stable_marriage(&mut arena, &s).unwrap();

        assert_eq!(result, vec![(s[0], Some(r[1])), (s[1], Some(r[0]))]);
        // R0 pruned S0 once it accepted S1
        assert_eq!(arena[r[0]].preferences(), &[s[1]]);
        assert_eq!(arena[s[0]].original_preferences(), &[r[0], r[1]]);
    }

    #[test]
    fn test_empty_preferences_stay_unmatched() {
        let (mut arena, s, r) = build(&[&[], &[0]], &[&[1]]);

        let result = stable_marriage(&mut arena, &s).unwrap();

        assert_eq!(result, vec![(s[0], None), (s[1], Some(r[0]))]);
    }

    #[test]
    fn test_unranked_suitor_is_turned_away() {
        // R0 only ranks S1, so S0 falls through to R1
        let (mut arena, s, r) = build(&[&[0, 1], &[1, 0]], &[&[1], &[0, 1]]);

        let result = stable_marriage(&mut arena, &s).unwrap();

        assert_eq!(result, vec![(s[0], Some(r[1])), (s[1], Some(r[0]))]);
    }
}
