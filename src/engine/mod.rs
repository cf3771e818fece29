//! Proposal engines for matching games.
//!
//! ## Design Principles
//!
//! Every engine is a sequential state machine over a shared protocol:
//!
//! 1. **Work queue**: free players are popped from the back of a `Vec`
//! 2. **Proposal**: a free player offers itself to its current favourite
//! 3. **Rejection**: displaced players go back on the queue
//! 4. **Pruning**: pairs that can never be part of the result are deleted
//!    from both preference lists, which is what guarantees termination
//!
//! Engines mutate the [`Arena`](crate::players::Arena) in place and return
//! a raw key-level mapping; games turn that into result containers.
//!
//! ## Engines
//!
//! | Module | Game | Optimal for |
//! |--------|------|-------------|
//! | [`marriage`] | stable marriage | the proposing side |
//! | [`hospital`] | hospital/resident | residents or hospitals |
//! | [`allocation`] | student allocation | students or supervisors |
//! | [`roommates`] | stable roommates | - |
//!
//! ## Iteration Guard
//!
//! Each pass of a loop spends one unit of a [`Budget`]. Every displacement
//! deletes at least one pair, so `players + 2 * entries + 1` passes are
//! always enough; running out means a broken invariant, which is reported as
//! [`EngineError::BudgetExhausted`] instead of looping forever.

pub mod marriage;
pub mod hospital;
pub mod allocation;
pub mod roommates;

pub use marriage::{stable_marriage, SingleAssignment};
pub use hospital::{hospital_optimal, resident_optimal};
pub use allocation::{student_optimal, supervisor_optimal};
pub use roommates::{stable_roommates, RoommatesOutcome};

use crate::error::EngineError;
use crate::players::{Arena, PlayerKey};

/// Raw mapping from each host to the players it holds.
pub type HostAssignment = Vec<(PlayerKey, Vec<PlayerKey>)>;

/// Snapshot the matches of `hosts`, in order.
pub(crate) fn collect_hosts(arena: &Arena, hosts: &[PlayerKey]) -> HostAssignment {
    hosts
        .iter()
        .map(|&host| (host, arena[host].matches().to_vec()))
        .collect()
}

/// Iteration guard for an engine loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    engine: &'static str,
    limit: usize,
    spent: usize,
}

impl Budget {
    /// A budget of exactly `limit` iterations
    pub fn new(engine: &'static str, limit: usize) -> Self {
        Self {
            engine,
            limit,
            spent: 0,
        }
    }

    /// The budget an instance in `arena` can need at most
    pub fn for_arena(engine: &'static str, arena: &Arena) -> Self {
        Self::new(engine, arena.len() + 2 * arena.total_preference_entries() + 1)
    }

    /// Spend one iteration
    #[inline]
    pub fn spend(&mut self) -> Result<(), EngineError> {
        if self.spent >= self.limit {
            return Err(EngineError::BudgetExhausted {
                engine: self.engine,
                budget: self.limit,
            });
        }
        self.spent += 1;
        Ok(())
    }

    /// Iterations used so far
    #[inline]
    pub fn spent(&self) -> usize {
        self.spent
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
