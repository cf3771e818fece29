//! Bi-level Gale-Shapley for student allocation.
//!
//! Students are assigned to projects, and every project belongs to one
//! supervisor. A supervisor's match list is the union of its projects'
//! lists, so both capacities bind at once. [`assign`] and [`release`] keep
//! the three match states in step.
//!
//! ## Student-Optimal
//!
//! ```text
//! while some student s is free:
//!     p := head of s's list, g := supervisor of p
//!     assign (s, p)
//!     if p is over capacity:       release p's worst student
//!     else if g is over capacity:  release g's worst student from their project
//!     if p is full:  delete (p, t) for every successor t of p's worst student
//!     if g is full:  for every successor t of g's worst student,
//!                    delete (q, t) for every project q of g that t ranks
//! ```
//!
//! Project-level pruning only touches the full project, even when other
//! projects of the same supervisor would reject the same students. Only a
//! full supervisor prunes across all of its projects.
//!
//! ## Supervisor-Optimal
//!
//! ```text
//! while some supervisor g is under capacity and has a viable (s, p):
//!     (s, p) := first student on g's list with a project of g they rank,
//!               that has room and is not already theirs
//!     if s is assigned to p':  release (s, p'), g' of p' may propose again
//!     assign (s, p)
//!     for every successor q of p on s's list:
//!         delete (s, q)
//!         if s ranks no project of q's supervisor h any more: h forgets s
//! ```

use crate::engine::{collect_hosts, Budget, HostAssignment};
use crate::error::EngineError;
use crate::players::{Arena, PlayerKey};
use crate::LOG_TARGET;

/// Solve with students proposing.
pub fn student_optimal(
    arena: &mut Arena,
    students: &[PlayerKey],
    projects: &[PlayerKey],
) -> Result<HostAssignment, EngineError> {
    let _span = tracing::debug_span!(
        target: LOG_TARGET,
        "student_optimal",
        students = students.len(),
        projects = projects.len(),
    )
    .entered();

    let mut budget = Budget::for_arena("student_optimal", arena);
    let mut free: Vec<PlayerKey> = students
        .iter()
        .copied()
        .filter(|&student| !arena[student].preferences().is_empty())
        .collect();

    while let Some(student) = free.pop() {
        budget.spend()?;

        let Some(project) = arena[student].favourite() else {
            continue;
        };
        let supervisor = match arena[project].supervisor_key() {
            Some(supervisor) if arena[project].is_acceptable(student) => supervisor,
            _ => {
                arena.delete_pair(student, project);
                if !arena[student].preferences().is_empty() {
                    free.push(student);
                }
                continue;
            }
        };

        assign(arena, student, project);

        if arena[project].is_over_subscribed() {
            if let Some(worst) = arena[project].worst_match() {
                release(arena, worst, project);
                free.push(worst);
            }
        } else if arena[supervisor].is_over_subscribed() {
            if let Some(worst) = arena[supervisor].worst_match() {
                if let Some(held) = arena[worst].partner() {
                    tracing::trace!(
                        target: LOG_TARGET,
                        supervisor = arena.name(supervisor),
                        evicted = arena.name(worst),
                        "supervisor over capacity",
                    );
                    release(arena, worst, held);
                    free.push(worst);
                }
            }
        }

        if arena[project].is_full() {
            let successors = arena[project].successors().to_vec();
            for successor in successors {
                arena.delete_pair(project, successor);
                if arena[successor].preferences().is_empty() {
                    free.retain(|&s| s != successor);
                }
            }
        }

        if arena[supervisor].is_full() {
            let successors = arena[supervisor].successors().to_vec();
            for successor in successors {
                let ranked: Vec<PlayerKey> = arena[supervisor]
                    .projects()
                    .iter()
                    .copied()
                    .filter(|&p| arena[successor].is_acceptable(p))
                    .collect();
                for p in ranked {
                    arena.delete_pair(p, successor);
                }
                if arena[successor].preferences().is_empty() {
                    free.retain(|&s| s != successor);
                }
            }
        }
    }

    tracing::debug!(target: LOG_TARGET, iterations = budget.spent(), "student-optimal solved");

    Ok(collect_hosts(arena, projects))
}

/// Solve with supervisors proposing on behalf of their projects.
pub fn supervisor_optimal(
    arena: &mut Arena,
    projects: &[PlayerKey],
    supervisors: &[PlayerKey],
) -> Result<HostAssignment, EngineError> {
    let _span = tracing::debug_span!(
        target: LOG_TARGET,
        "supervisor_optimal",
        projects = projects.len(),
        supervisors = supervisors.len(),
    )
    .entered();

    let mut budget = Budget::for_arena("supervisor_optimal", arena);
    let mut free: Vec<PlayerKey> = supervisors
        .iter()
        .copied()
        .filter(|&supervisor| proposal(arena, supervisor).is_some())
        .collect();

    while let Some(supervisor) = free.pop() {
        budget.spend()?;

        let Some((student, project)) = proposal(arena, supervisor) else {
            continue;
        };

        if let Some(current) = arena[student].partner() {
            release(arena, student, current);
            if let Some(vacated) = arena[current].supervisor_key() {
                if vacated != supervisor && !free.contains(&vacated) {
                    free.push(vacated);
                }
            }
        }

        tracing::trace!(
            target: LOG_TARGET,
            supervisor = arena.name(supervisor),
            project = arena.name(project),
            student = arena.name(student),
            "offer accepted",
        );
        assign(arena, student, project);

        if proposal(arena, supervisor).is_some() && !free.contains(&supervisor) {
            free.push(supervisor);
        }

        let successors = arena[student].successors().to_vec();
        for successor in successors {
            arena.delete_pair(student, successor);

            let Some(other) = arena[successor].supervisor_key() else {
                continue;
            };
            let still_ranked = arena[student]
                .preferences()
                .iter()
                .any(|&p| arena[p].supervisor_key() == Some(other));
            if !still_ranked {
                arena[other].forget(student);
            }
            if proposal(arena, other).is_none() {
                free.retain(|&g| g != other);
            }
        }
    }

    tracing::debug!(target: LOG_TARGET, iterations = budget.spent(), "supervisor-optimal solved");

    Ok(collect_hosts(arena, projects))
}

/// Match `student` to `project` and record them with the supervisor.
pub(crate) fn assign(arena: &mut Arena, student: PlayerKey, project: PlayerKey) {
    arena.match_pair(student, project);
    if let Some(supervisor) = arena[project].supervisor_key() {
        arena[supervisor].record_match(student);
    }
}

/// Undo [`assign`].
pub(crate) fn release(arena: &mut Arena, student: PlayerKey, project: PlayerKey) {
    arena.unmatch_pair(student, project);
    if let Some(supervisor) = arena[project].supervisor_key() {
        arena[supervisor].record_unmatch(student);
    }
}

/// The next (student, project) offer `supervisor` can make.
///
/// Walks the supervisor's students in order and, for each, the student's
/// own ranking, so the student gets the best project on offer.
fn proposal(arena: &Arena, supervisor: PlayerKey) -> Option<(PlayerKey, PlayerKey)> {
    let player = &arena[supervisor];
    if !player.is_under_subscribed() {
        return None;
    }

    player.preferences().iter().find_map(|&student| {
        arena[student]
            .preferences()
            .iter()
            .copied()
            .find(|&project| {
                let p = &arena[project];
                p.supervisor_key() == Some(supervisor)
                    && !p.is_matched_to(student)
                    && p.is_under_subscribed()
                    && p.is_acceptable(student)
            })
            .map(|project| (student, project))
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
