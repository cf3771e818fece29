//! Hospital/resident game.

use crate::engine::{hospital_optimal, resident_optimal, HostAssignment};
use crate::error::{GameError, InvalidMatching, Result};
use crate::games::input::{self, PreferenceTable};
use crate::games::{
    enrol, host_would_take, reassign, resolve, single_would_leave, validate, BlockingPairs,
};
use crate::matching::MultipleMatching;
use crate::players::{Arena, Party, Player};
use crate::types::{Diagnostic, Optimal};
use crate::LOG_TARGET;

const GAME: &str = "hospital-resident";
const ROLES: &[Optimal] = &[Optimal::Resident, Optimal::Hospital];

/// Residents rank hospitals, hospitals rank residents and take up to their
/// capacity.
#[derive(Debug, Clone)]
pub struct HospitalResident {
    arena: Arena,
    residents: Party,
    hospitals: Party,
    diagnostics: Vec<Diagnostic>,
    matching: Option<MultipleMatching>,
    blocking_pairs: BlockingPairs,
}

impl HospitalResident {
    /// Build a game from name tables.
    ///
    /// Every hospital needs a capacity. Hospitals should rank exactly the
    /// residents that rank them; anything else is reported as a
    /// [`Diagnostic`], and repaired when `clean` is set:
    ///
    /// - duplicate entries keep their first occurrence
    /// - unreciprocated entries are dropped
    /// - hospitals with zero capacity are withdrawn from every list
    ///
    /// Names outside the other party are always dropped.
    pub fn create_from_dictionaries<RK, RP, RN, HK, HP, HN, CK>(
        resident_preferences: impl IntoIterator<Item = (RK, RP)>,
        hospital_preferences: impl IntoIterator<Item = (HK, HP)>,
        hospital_capacities: impl IntoIterator<Item = (CK, usize)>,
        clean: bool,
    ) -> Result<Self>
    where
        RK: AsRef<str>,
        RP: IntoIterator<Item = RN>,
        RN: AsRef<str>,
        HK: AsRef<str>,
        HP: IntoIterator<Item = HN>,
        HN: AsRef<str>,
        CK: AsRef<str>,
    {
        let mut residents = input::read_table("resident", resident_preferences)?;
        let mut hospitals = input::read_table("hospital", hospital_preferences)?;
        let capacities = input::read_capacities("hospital", hospital_capacities, &hospitals)?;

        let mut diagnostics = Vec::new();
        let resident_names = input::member_names(&residents);
        let hospital_names = input::member_names(&hospitals);

        input::skip_unknown(
            "resident",
            &mut residents,
            |_, h| hospital_names.contains(h),
            &mut diagnostics,
        );
        input::skip_unknown(
            "hospital",
            &mut hospitals,
            |_, r| resident_names.contains(r),
            &mut diagnostics,
        );
        input::check_duplicates("resident", &mut residents, clean, &mut diagnostics);
        input::check_duplicates("hospital", &mut hospitals, clean, &mut diagnostics);

        let resident_ranks = input::rankings(&residents);
        let hospital_ranks = input::rankings(&hospitals);
        input::check_reciprocity(
            "resident",
            &mut residents,
            |r, h| hospital_ranks.get(h).is_some_and(|ranked| ranked.contains(r)),
            clean,
            &mut diagnostics,
        );
        input::check_reciprocity(
            "hospital",
            &mut hospitals,
            |h, r| resident_ranks.get(r).is_some_and(|ranked| ranked.contains(h)),
            clean,
            &mut diagnostics,
        );

        let closed = input::check_capacities("hospital", &hospitals, &capacities, &mut diagnostics);
        if clean {
            input::withdraw(&mut residents, &closed);
            for (name, preferences) in hospitals.iter_mut() {
                if closed.contains(name) {
                    preferences.clear();
                }
            }
        }

        input::check_empty("resident", &residents, &mut diagnostics);
        input::check_empty("hospital", &hospitals, &mut diagnostics);

        let game = Self::build(residents, hospitals, |name| {
            capacities.get(name).copied().unwrap_or(0)
        }, diagnostics);

        tracing::debug!(
            target: LOG_TARGET,
            residents = game.residents.len(),
            hospitals = game.hospitals.len(),
            diagnostics = game.diagnostics.len(),
            "hospital-resident game created",
        );
        Ok(game)
    }

    fn build(
        residents: PreferenceTable,
        hospitals: PreferenceTable,
        capacity: impl Fn(&str) -> usize,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let mut arena = Arena::with_capacity(residents.len() + hospitals.len());
        let mut resident_party = Party::with_capacity("resident", residents.len());
        let mut hospital_party = Party::with_capacity("hospital", hospitals.len());

        for (name, _) in &residents {
            enrol(&mut arena, &mut resident_party, Player::new(name.as_str()));
        }
        for (name, _) in &hospitals {
            enrol(&mut arena, &mut hospital_party, Player::host(name.as_str(), capacity(name)));
        }

        for (name, preferences) in &residents {
            if let Some(key) = resident_party.get(name) {
                arena.set_preferences(key, resolve(&hospital_party, preferences));
            }
        }
        for (name, preferences) in &hospitals {
            if let Some(key) = hospital_party.get(name) {
                arena.set_preferences(key, resolve(&resident_party, preferences));
            }
        }

        Self {
            arena,
            residents: resident_party,
            hospitals: hospital_party,
            diagnostics,
            matching: None,
            blocking_pairs: Vec::new(),
        }
    }

    /// Solve for `optimal`, which must be `Resident` or `Hospital`.
    pub fn solve(&mut self, optimal: Optimal) -> Result<MultipleMatching> {
        let optimal = optimal.expect_one_of(GAME, ROLES)?;

        self.arena.reset();
        self.blocking_pairs.clear();

        let assignment = match optimal {
            Optimal::Hospital => hospital_optimal(&mut self.arena, self.hospitals.keys())?,
            _ => resident_optimal(&mut self.arena, self.residents.keys(), self.hospitals.keys())?,
        };

        let matching = self.to_matching(&assignment);
        self.matching = Some(matching.clone());
        Ok(matching)
    }

    /// Parse `optimal` and [`solve`](Self::solve).
    pub fn solve_for(&mut self, optimal: &str) -> Result<MultipleMatching> {
        self.solve(optimal.parse()?)
    }

    fn to_matching(&self, assignment: &HostAssignment) -> MultipleMatching {
        let mut matching = MultipleMatching::new();
        for (hospital, residents) in assignment {
            matching.insert(self.arena.name(*hospital), self.arena.names(residents));
        }
        matching
    }

    /// Replace the residents of `hospital`, keeping both sides in step.
    ///
    /// Residents move off whatever hospital held them before. Validity is
    /// not enforced here; call [`check_validity`](Self::check_validity).
    pub fn set_assignment(&mut self, hospital: &str, residents: &[&str]) -> Result<()> {
        let host = self.hospitals.get(hospital).ok_or_else(|| GameError::UnknownPlayer {
            party: "hospital",
            name: hospital.to_string(),
        })?;
        let members = residents
            .iter()
            .map(|&name| {
                self.residents.get(name).ok_or_else(|| GameError::UnknownPlayer {
                    party: "resident",
                    name: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        reassign(&mut self.arena, host, &members);

        let assignment = crate::engine::collect_hosts(&self.arena, self.hospitals.keys());
        self.matching = Some(self.to_matching(&assignment));
        self.blocking_pairs.clear();
        Ok(())
    }

    /// Check the current matching against working lists and capacities.
    pub fn check_validity(&self) -> std::result::Result<(), InvalidMatching> {
        validate(&self.arena, &[&self.residents, &self.hospitals])
    }

    /// Whether no resident and hospital would both rather be together.
    ///
    /// The pairs found are kept for [`blocking_pairs`](Self::blocking_pairs).
    pub fn check_stability(&mut self) -> bool {
        let mut blocking = Vec::new();
        for &resident in self.residents.keys() {
            for &hospital in self.arena[resident].original_preferences() {
                if single_would_leave(&self.arena, resident, hospital)
                    && host_would_take(&self.arena, hospital, resident)
                {
                    blocking.push((
                        self.arena.name(resident).to_string(),
                        self.arena.name(hospital).to_string(),
                    ));
                }
            }
        }

        self.blocking_pairs = blocking;
        self.blocking_pairs.is_empty()
    }

    /// `(resident, hospital)` pairs found by the last stability check
    pub fn blocking_pairs(&self) -> &BlockingPairs {
        &self.blocking_pairs
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Result of the last solve or reassignment
    pub fn matching(&self) -> Option<&MultipleMatching> {
        self.matching.as_ref()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn residents(&self) -> &Party {
        &self.residents
    }

    pub fn hospitals(&self) -> &Party {
        &self.hospitals
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
