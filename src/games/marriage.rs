//! Stable marriage game.

use crate::engine::{stable_marriage, SingleAssignment};
use crate::error::{GameError, InvalidMatching, Result};
use crate::games::input::{self, PreferenceTable};
use crate::games::{enrol, resolve, validate, BlockingPairs};
use crate::matching::SingleMatching;
use crate::players::{Arena, Party, Player};
use crate::types::{Diagnostic, Optimal};
use crate::LOG_TARGET;

const GAME: &str = "stable marriage";
const ROLES: &[Optimal] = &[Optimal::Suitor, Optimal::Reviewer];

/// Two equal-sized parties, each ranking the whole other party.
#[derive(Debug, Clone)]
pub struct StableMarriage {
    arena: Arena,
    suitors: Party,
    reviewers: Party,
    diagnostics: Vec<Diagnostic>,
    matching: Option<SingleMatching>,
    blocking_pairs: BlockingPairs,
}

impl StableMarriage {
    /// Build a game from name tables.
    ///
    /// Unequal party sizes are fatal. Incomplete rankings and duplicate
    /// entries are reported; with `clean`, duplicates keep only their first
    /// occurrence. Names outside the other party are always dropped.
    pub fn create_from_dictionaries<SK, SP, SN, RK, RP, RN>(
        suitor_preferences: impl IntoIterator<Item = (SK, SP)>,
        reviewer_preferences: impl IntoIterator<Item = (RK, RP)>,
        clean: bool,
    ) -> Result<Self>
    where
        SK: AsRef<str>,
        SP: IntoIterator<Item = SN>,
        SN: AsRef<str>,
        RK: AsRef<str>,
        RP: IntoIterator<Item = RN>,
        RN: AsRef<str>,
    {
        let mut suitors = input::read_table("suitor", suitor_preferences)?;
        let mut reviewers = input::read_table("reviewer", reviewer_preferences)?;

        if suitors.len() != reviewers.len() {
            return Err(GameError::UnequalParties {
                suitors: suitors.len(),
                reviewers: reviewers.len(),
            });
        }

        let mut diagnostics = Vec::new();
        let suitor_names = input::member_names(&suitors);
        let reviewer_names = input::member_names(&reviewers);

        input::skip_unknown(
            "suitor",
            &mut suitors,
            |_, r| reviewer_names.contains(r),
            &mut diagnostics,
        );
        input::skip_unknown(
            "reviewer",
            &mut reviewers,
            |_, s| suitor_names.contains(s),
            &mut diagnostics,
        );
        input::check_duplicates("suitor", &mut suitors, clean, &mut diagnostics);
        input::check_duplicates("reviewer", &mut reviewers, clean, &mut diagnostics);
        input::check_complete("suitor", &suitors, &input::names(&reviewers), &mut diagnostics);
        input::check_complete("reviewer", &reviewers, &input::names(&suitors), &mut diagnostics);

        let game = Self::build(suitors, reviewers, diagnostics);

        tracing::debug!(
            target: LOG_TARGET,
            players = game.suitors.len(),
            diagnostics = game.diagnostics.len(),
            "stable marriage game created",
        );
        Ok(game)
    }

    fn build(
        suitors: PreferenceTable,
        reviewers: PreferenceTable,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let mut arena = Arena::with_capacity(suitors.len() + reviewers.len());
        let mut suitor_party = Party::with_capacity("suitor", suitors.len());
        let mut reviewer_party = Party::with_capacity("reviewer", reviewers.len());

        for (name, _) in &suitors {
            enrol(&mut arena, &mut suitor_party, Player::new(name.as_str()));
        }
        for (name, _) in &reviewers {
            enrol(&mut arena, &mut reviewer_party, Player::new(name.as_str()));
        }

        for (name, preferences) in &suitors {
            if let Some(key) = suitor_party.get(name) {
                arena.set_preferences(key, resolve(&reviewer_party, preferences));
            }
        }
        for (name, preferences) in &reviewers {
            if let Some(key) = reviewer_party.get(name) {
                arena.set_preferences(key, resolve(&suitor_party, preferences));
            }
        }

        Self {
            arena,
            suitors: suitor_party,
            reviewers: reviewer_party,
            diagnostics,
            matching: None,
            blocking_pairs: Vec::new(),
        }
    }

    /// Solve for `optimal`, which must be `Suitor` or `Reviewer`.
    ///
    /// The result is keyed by suitor either way.
    pub fn solve(&mut self, optimal: Optimal) -> Result<SingleMatching> {
        let optimal = optimal.expect_one_of(GAME, ROLES)?;

        self.arena.reset();
        self.blocking_pairs.clear();

        match optimal {
            Optimal::Reviewer => {
                stable_marriage(&mut self.arena, self.reviewers.keys())?;
            }
            _ => {
                stable_marriage(&mut self.arena, self.suitors.keys())?;
            }
        }

        let matching = self.collect();
        self.matching = Some(matching.clone());
        Ok(matching)
    }

    /// Parse `optimal` and [`solve`](Self::solve).
    pub fn solve_for(&mut self, optimal: &str) -> Result<SingleMatching> {
        self.solve(optimal.parse()?)
    }

    fn collect(&self) -> SingleMatching {
        let assignment: SingleAssignment = self
            .suitors
            .keys()
            .iter()
            .map(|&suitor| (suitor, self.arena[suitor].partner()))
            .collect();

        let mut matching = SingleMatching::new();
        for (suitor, reviewer) in assignment {
            matching.insert(
                self.arena.name(suitor),
                reviewer.map(|r| self.arena.name(r).to_string()),
            );
        }
        matching
    }

    /// Marry `suitor` to `reviewer`, or leave `suitor` single with `None`.
    ///
    /// Both previous partners are left single.
    pub fn set_partner(&mut self, suitor: &str, reviewer: Option<&str>) -> Result<()> {
        let s = self.suitors.get(suitor).ok_or_else(|| GameError::UnknownPlayer {
            party: "suitor",
            name: suitor.to_string(),
        })?;
        let r = reviewer
            .map(|name| {
                self.reviewers.get(name).ok_or_else(|| GameError::UnknownPlayer {
                    party: "reviewer",
                    name: name.to_string(),
                })
            })
            .transpose()?;

        if let Some(old) = self.arena[s].partner() {
            self.arena.unmatch_pair(s, old);
        }
        if let Some(r) = r {
            if let Some(old) = self.arena[r].partner() {
                self.arena.unmatch_pair(old, r);
            }
            self.arena.match_pair(s, r);
        }

        self.matching = Some(self.collect());
        self.blocking_pairs.clear();
        Ok(())
    }

    /// Check the current matching against the working preference lists.
    pub fn check_validity(&self) -> std::result::Result<(), InvalidMatching> {
        validate(&self.arena, &[&self.suitors, &self.reviewers])
    }

    /// Whether no suitor and reviewer would both rather be together.
    pub fn check_stability(&mut self) -> bool {
        let mut blocking = Vec::new();
        for &suitor in self.suitors.keys() {
            for &reviewer in self.reviewers.keys() {
                let s = &self.arena[suitor];
                let r = &self.arena[reviewer];
                if s.partner() != Some(reviewer)
                    && s.prefers_to_partner(reviewer)
                    && r.prefers_to_partner(suitor)
                {
                    blocking.push((s.name().to_string(), r.name().to_string()));
                }
            }
        }

        self.blocking_pairs = blocking;
        self.blocking_pairs.is_empty()
    }

    /// `(suitor, reviewer)` pairs found by the last stability check
    pub fn blocking_pairs(&self) -> &BlockingPairs {
        &self.blocking_pairs
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn matching(&self) -> Option<&SingleMatching> {
        self.matching.as_ref()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn suitors(&self) -> &Party {
        &self.suitors
    }

    pub fn reviewers(&self) -> &Party {
        &self.reviewers
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
