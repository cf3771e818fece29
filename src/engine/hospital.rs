//! Capacitated Gale-Shapley for hospital/resident games.
//!
//! ## Resident-Optimal
//!
//! ```text
//! while some resident r is free:
//!     h := head of r's list
//!     match (r, h)
//!     if h is over capacity:  evict h's worst match, who is free again
//!     if h is now full:       delete (h, t) for every successor t of h's worst match
//! ```
//!
//! A deleted successor that runs out of preferences leaves the queue: it can
//! never be matched.
//!
//! ## Hospital-Optimal
//!
//! ```text
//! while some hospital h is under-subscribed and has an unmatched resident on its list:
//!     r := h's favourite such resident
//!     if r is matched to h':  unmatch (r, h'), h' is free again
//!     match (r, h)
//!     for every successor h'' of h on r's list: delete (r, h'')
//! ```
//!
//! In both directions each hospital's matches end up sorted by the
//! hospital's own original ranking.

use crate::engine::{collect_hosts, Budget, HostAssignment};
use crate::error::EngineError;
use crate::players::{Arena, PlayerKey};
use crate::LOG_TARGET;

/// Solve with residents proposing.
pub fn resident_optimal(
    arena: &mut Arena,
    residents: &[PlayerKey],
    hospitals: &[PlayerKey],
) -> Result<HostAssignment, EngineError> {
    let _span = tracing::debug_span!(
        target: LOG_TARGET,
        "resident_optimal",
        residents = residents.len(),
        hospitals = hospitals.len(),
    )
    .entered();

    let mut budget = Budget::for_arena("resident_optimal", arena);
    let mut free: Vec<PlayerKey> = residents
        .iter()
        .copied()
        .filter(|&resident| !arena[resident].preferences().is_empty())
        .collect();

    while let Some(resident) = free.pop() {
        budget.spend()?;

        let Some(hospital) = arena[resident].favourite() else {
            continue;
        };

        // A hospital that does not rank the resident rejects it outright
        if !arena[hospital].is_acceptable(resident) {
            arena.delete_pair(resident, hospital);
            if !arena[resident].preferences().is_empty() {
                free.push(resident);
            }
            continue;
        }

        arena.match_pair(resident, hospital);

        if arena[hospital].is_over_subscribed() {
            if let Some(worst) = arena[hospital].worst_match() {
                tracing::trace!(
                    target: LOG_TARGET,
                    hospital = arena.name(hospital),
                    evicted = arena.name(worst),
                    "hospital over capacity",
                );
                arena.unmatch_pair(worst, hospital);
                free.push(worst);
            }
        }

        if arena[hospital].is_full() {
            let successors = arena[hospital].successors().to_vec();
            for successor in successors {
                arena.delete_pair(hospital, successor);
                if arena[successor].preferences().is_empty() {
                    free.retain(|&r| r != successor);
                }
            }
        }
    }

    tracing::debug!(target: LOG_TARGET, iterations = budget.spent(), "resident-optimal solved");

    Ok(collect_hosts(arena, hospitals))
}

/// Solve with hospitals proposing.
pub fn hospital_optimal(
    arena: &mut Arena,
    hospitals: &[PlayerKey],
) -> Result<HostAssignment, EngineError> {
    let _span = tracing::debug_span!(
        target: LOG_TARGET,
        "hospital_optimal",
        hospitals = hospitals.len(),
    )
    .entered();

    let mut budget = Budget::for_arena("hospital_optimal", arena);
    let mut free: Vec<PlayerKey> = hospitals
        .iter()
        .copied()
        .filter(|&hospital| proposal(arena, hospital).is_some())
        .collect();

    while let Some(hospital) = free.pop() {
        budget.spend()?;

        let Some(resident) = proposal(arena, hospital) else {
            continue;
        };

        if !arena[resident].is_acceptable(hospital) {
            arena.delete_pair(hospital, resident);
            if proposal(arena, hospital).is_some() {
                free.push(hospital);
            }
            continue;
        }

        if let Some(current) = arena[resident].partner() {
            arena.unmatch_pair(resident, current);
            if !free.contains(&current) {
                free.push(current);
            }
        }

        tracing::trace!(
            target: LOG_TARGET,
            hospital = arena.name(hospital),
            resident = arena.name(resident),
            "offer accepted",
        );
        arena.match_pair(resident, hospital);

        if proposal(arena, hospital).is_some() && !free.contains(&hospital) {
            free.push(hospital);
        }

        let successors = arena[resident].successors().to_vec();
        for successor in successors {
            arena.delete_pair(resident, successor);
            if proposal(arena, successor).is_none() {
                free.retain(|&h| h != successor);
            }
        }
    }

    tracing::debug!(target: LOG_TARGET, iterations = budget.spent(), "hospital-optimal solved");

    Ok(collect_hosts(arena, hospitals))
}

/// The resident `hospital` would offer a place to next, if it can offer one.
fn proposal(arena: &Arena, hospital: PlayerKey) -> Option<PlayerKey> {
    let player = &arena[hospital];
    if player.is_under_subscribed() {
        player.favourite()
    } else {
        None
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
