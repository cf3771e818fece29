//! Student allocation game.
//!
//! Students rank projects, supervisors rank students, and each project
//! belongs to exactly one supervisor. A project's ranking is derived from
//! its supervisor's: the supervisor's list restricted to the students that
//! rank that project.

use std::collections::{HashMap, HashSet};

use crate::engine::allocation::{assign, release};
use crate::engine::{collect_hosts, student_optimal, supervisor_optimal, HostAssignment};
use crate::error::{GameError, InvalidMatching, Result};
use crate::games::input::{self, PreferenceTable};
use crate::games::{enrol, resolve, validate, BlockingPairs};
use crate::matching::MultipleMatching;
use crate::players::{Arena, Party, Player, PlayerKey};
use crate::types::{Diagnostic, Optimal};
use crate::LOG_TARGET;

const GAME: &str = "student allocation";
const ROLES: &[Optimal] = &[Optimal::Student, Optimal::Supervisor];

/// Two-level capacitated allocation of students to supervised projects.
#[derive(Debug, Clone)]
pub struct StudentAllocation {
    arena: Arena,
    students: Party,
    projects: Party,
    supervisors: Party,
    diagnostics: Vec<Diagnostic>,
    matching: Option<MultipleMatching>,
    blocking_pairs: BlockingPairs,
}

/// Capacities after checking, by name.
struct Capacities {
    projects: HashMap<String, usize>,
    supervisors: HashMap<String, usize>,
}

impl StudentAllocation {
    /// Build a game from name tables.
    ///
    /// Every project needs a known supervisor and a capacity, and every
    /// supervisor a capacity; anything missing is fatal. The rest is
    /// reported as [`Diagnostic`]s, and with `clean`:
    ///
    /// - duplicate entries keep their first occurrence
    /// - unreciprocated entries are dropped
    /// - zero-capacity projects and supervisors are withdrawn
    /// - a project's capacity is cut to its supervisor's
    /// - a supervisor's capacity is cut to the places its projects offer
    #[allow(clippy::too_many_arguments)]
    pub fn create_from_dictionaries<SK, SP, SN, GK, GP, GN, PK, PG, CK, DK>(
        student_preferences: impl IntoIterator<Item = (SK, SP)>,
        supervisor_preferences: impl IntoIterator<Item = (GK, GP)>,
        project_supervisors: impl IntoIterator<Item = (PK, PG)>,
        project_capacities: impl IntoIterator<Item = (CK, usize)>,
        supervisor_capacities: impl IntoIterator<Item = (DK, usize)>,
        clean: bool,
    ) -> Result<Self>
    where
        SK: AsRef<str>,
        SP: IntoIterator<Item = SN>,
        SN: AsRef<str>,
        GK: AsRef<str>,
        GP: IntoIterator<Item = GN>,
        GN: AsRef<str>,
        PK: AsRef<str>,
        PG: AsRef<str>,
        CK: AsRef<str>,
        DK: AsRef<str>,
    {
        let mut students = input::read_table("student", student_preferences)?;
        let mut supervisors = input::read_table("supervisor", supervisor_preferences)?;
        let supervisor_names = input::member_names(&supervisors);

        // Projects as (name, [supervisor])
        let projects = input::read_table(
            "project",
            project_supervisors
                .into_iter()
                .map(|(project, supervisor)| (project, [supervisor])),
        )?;
        let owner: HashMap<String, String> = projects
            .iter()
            .map(|(project, supervisor)| (project.clone(), supervisor.concat()))
            .collect();
        if let Some((project, supervisor)) = projects
            .iter()
            .map(|(project, _)| (project, &owner[project]))
            .find(|(_, supervisor)| !supervisor_names.contains(*supervisor))
        {
            return Err(GameError::UnknownSupervisor {
                project: project.clone(),
                supervisor: supervisor.clone(),
            });
        }

        let mut capacities = Capacities {
            projects: input::read_capacities("project", project_capacities, &projects)?,
            supervisors: input::read_capacities("supervisor", supervisor_capacities, &supervisors)?,
        };

        let mut diagnostics = Vec::new();
        let student_names = input::member_names(&students);
        input::skip_unknown(
            "student",
            &mut students,
            |_, p| owner.contains_key(p),
            &mut diagnostics,
        );
        input::skip_unknown(
            "supervisor",
            &mut supervisors,
            |_, s| student_names.contains(s),
            &mut diagnostics,
        );
        input::check_duplicates("student", &mut students, clean, &mut diagnostics);
        input::check_duplicates("supervisor", &mut supervisors, clean, &mut diagnostics);

        let student_ranks = input::rankings(&students);
        let supervisor_ranks = input::rankings(&supervisors);
        input::check_reciprocity(
            "student",
            &mut students,
            |s, p| {
                owner
                    .get(p)
                    .and_then(|g| supervisor_ranks.get(g))
                    .is_some_and(|ranked| ranked.contains(s))
            },
            clean,
            &mut diagnostics,
        );
        input::check_reciprocity(
            "supervisor",
            &mut supervisors,
            |g, s| {
                student_ranks.get(s).is_some_and(|ranked| {
                    ranked.iter().any(|p| owner.get(p).is_some_and(|o| o == g))
                })
            },
            clean,
            &mut diagnostics,
        );

        let closed_projects =
            input::check_capacities("project", &projects, &capacities.projects, &mut diagnostics);
        let closed_supervisors = input::check_capacities(
            "supervisor",
            &supervisors,
            &capacities.supervisors,
            &mut diagnostics,
        );
        if clean {
            let mut withdrawn = closed_projects;
            withdrawn.extend(
                owner
                    .iter()
                    .filter(|(_, g)| closed_supervisors.contains(*g))
                    .map(|(p, _)| p.clone()),
            );
            input::withdraw(&mut students, &withdrawn);
            for (name, preferences) in supervisors.iter_mut() {
                if closed_supervisors.contains(name) {
                    preferences.clear();
                }
            }
        }

        check_capacity_consistency(&projects, &owner, &mut capacities, clean, &mut diagnostics);

        input::check_empty("student", &students, &mut diagnostics);
        input::check_empty("supervisor", &supervisors, &mut diagnostics);

        let game = Self::build(students, &projects, supervisors, &owner, &capacities, diagnostics);

        tracing::debug!(
            target: LOG_TARGET,
            students = game.students.len(),
            projects = game.projects.len(),
            supervisors = game.supervisors.len(),
            diagnostics = game.diagnostics.len(),
            "student allocation game created",
        );
        Ok(game)
    }

    fn build(
        students: PreferenceTable,
        projects: &PreferenceTable,
        supervisors: PreferenceTable,
        owner: &HashMap<String, String>,
        capacities: &Capacities,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let mut arena = Arena::with_capacity(students.len() + projects.len() + supervisors.len());
        let mut student_party = Party::with_capacity("student", students.len());
        let mut project_party = Party::with_capacity("project", projects.len());
        let mut supervisor_party = Party::with_capacity("supervisor", supervisors.len());

        for (name, _) in &supervisors {
            let capacity = capacities.supervisors.get(name).copied().unwrap_or(0);
            enrol(&mut arena, &mut supervisor_party, Player::supervisor(name.as_str(), capacity));
        }
        for (name, _) in projects {
            let Some(supervisor) = owner.get(name).and_then(|g| supervisor_party.get(g)) else {
                continue;
            };
            let capacity = capacities.projects.get(name).copied().unwrap_or(0);
            let key = enrol(
                &mut arena,
                &mut project_party,
                Player::project(name.as_str(), capacity, supervisor),
            );
            arena[supervisor].link_project(key);
        }
        for (name, _) in &students {
            enrol(&mut arena, &mut student_party, Player::new(name.as_str()));
        }

        for (name, preferences) in &students {
            if let Some(key) = student_party.get(name) {
                arena.set_preferences(key, resolve(&project_party, preferences));
            }
        }
        for (name, preferences) in &supervisors {
            if let Some(key) = supervisor_party.get(name) {
                arena.set_preferences(key, resolve(&student_party, preferences));
                cascade(&mut arena, key);
            }
        }

        Self {
            arena,
            students: student_party,
            projects: project_party,
            supervisors: supervisor_party,
            diagnostics,
            matching: None,
            blocking_pairs: Vec::new(),
        }
    }

    /// Solve for `optimal`, which must be `Student` or `Supervisor`.
    ///
    /// The result is keyed by project.
    pub fn solve(&mut self, optimal: Optimal) -> Result<MultipleMatching> {
        let optimal = optimal.expect_one_of(GAME, ROLES)?;

        self.arena.reset();
        self.blocking_pairs.clear();

        let assignment = match optimal {
            Optimal::Supervisor => {
                supervisor_optimal(&mut self.arena, self.projects.keys(), self.supervisors.keys())?
            }
            _ => student_optimal(&mut self.arena, self.students.keys(), self.projects.keys())?,
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
        for (project, students) in assignment {
            matching.insert(self.arena.name(*project), self.arena.names(students));
        }
        matching
    }

    /// Students held by each supervisor across all of its projects.
    pub fn supervisor_matching(&self) -> MultipleMatching {
        self.to_matching(&collect_hosts(&self.arena, self.supervisors.keys()))
    }

    /// Replace the students of `project`, keeping students, projects and
    /// supervisors in step.
    pub fn set_assignment(&mut self, project: &str, students: &[&str]) -> Result<()> {
        let p = self.projects.get(project).ok_or_else(|| GameError::UnknownPlayer {
            party: "project",
            name: project.to_string(),
        })?;
        let members = students
            .iter()
            .map(|&name| {
                self.students.get(name).ok_or_else(|| GameError::UnknownPlayer {
                    party: "student",
                    name: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for previous in self.arena[p].matches().to_vec() {
            release(&mut self.arena, previous, p);
        }
        for student in members {
            if let Some(old) = self.arena[student].partner() {
                release(&mut self.arena, student, old);
            }
            assign(&mut self.arena, student, p);
        }

        let assignment = collect_hosts(&self.arena, self.projects.keys());
        self.matching = Some(self.to_matching(&assignment));
        self.blocking_pairs.clear();
        Ok(())
    }

    /// Check students, projects and supervisors against their working
    /// lists and capacities.
    pub fn check_validity(&self) -> std::result::Result<(), InvalidMatching> {
        validate(&self.arena, &[&self.students, &self.projects, &self.supervisors])
    }

    /// Whether no student and project would both rather be together.
    ///
    /// A student `s` who prefers project `p` (supervisor `g`) to their
    /// current assignment blocks with `p` when `p` ranks `s` and one of:
    ///
    /// - `p` and `g` both have room
    /// - `p` has room, `g` is full, and `s` is already one of `g`'s students
    ///   or `g` prefers `s` to its worst student
    /// - `p` is full and prefers `s` to its worst student
    pub fn check_stability(&mut self) -> bool {
        let mut blocking = Vec::new();
        for &student in self.students.keys() {
            for &project in self.arena[student].original_preferences() {
                if self.blocks(student, project) {
                    blocking.push((
                        self.arena.name(student).to_string(),
                        self.arena.name(project).to_string(),
                    ));
                }
            }
        }

        self.blocking_pairs = blocking;
        self.blocking_pairs.is_empty()
    }

    fn blocks(&self, student: PlayerKey, project: PlayerKey) -> bool {
        let s = &self.arena[student];
        let p = &self.arena[project];
        let Some(supervisor) = p.supervisor_key() else {
            return false;
        };
        let g = &self.arena[supervisor];

        if s.is_matched_to(project)
            || !s.prefers_to_partner(project)
            || p.rank_of(student).is_none()
        {
            return false;
        }

        let prefers_to_worst = |host: &Player| {
            host.worst_match().is_some_and(|worst| host.prefers(student, worst))
        };

        if p.is_under_subscribed() {
            g.is_under_subscribed() || g.is_matched_to(student) || prefers_to_worst(g)
        } else {
            prefers_to_worst(p)
        }
    }

    /// `(student, project)` pairs found by the last stability check
    pub fn blocking_pairs(&self) -> &BlockingPairs {
        &self.blocking_pairs
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn matching(&self) -> Option<&MultipleMatching> {
        self.matching.as_ref()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn students(&self) -> &Party {
        &self.students
    }

    pub fn projects(&self) -> &Party {
        &self.projects
    }

    pub fn supervisors(&self) -> &Party {
        &self.supervisors
    }
}

/// Give each project of `supervisor` the supervisor's ranking restricted to
/// the students that rank that project.
fn cascade(arena: &mut Arena, supervisor: PlayerKey) {
    let ranking = arena[supervisor].preferences().to_vec();
    for project in arena[supervisor].projects().to_vec() {
        let preferences = ranking
            .iter()
            .copied()
            .filter(|&student| arena[student].is_acceptable(project))
            .collect();
        arena.set_preferences(project, preferences);
    }
}

/// Project capacity must not exceed its supervisor's, and a supervisor's
/// capacity must not exceed what its projects offer together.
fn check_capacity_consistency(
    projects: &PreferenceTable,
    owner: &HashMap<String, String>,
    capacities: &mut Capacities,
    clean: bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (project, _) in projects {
        let Some(supervisor) = owner.get(project) else {
            continue;
        };
        let supervisor_capacity = capacities.supervisors.get(supervisor).copied().unwrap_or(0);
        let Some(capacity) = capacities.projects.get_mut(project) else {
            continue;
        };
        if *capacity > supervisor_capacity {
            diagnostics.push(
                Diagnostic::ProjectCapacityExceedsSupervisor {
                    project: project.clone(),
                    capacity: *capacity,
                    supervisor: supervisor.clone(),
                    supervisor_capacity,
                }
                .emit(),
            );
            if clean {
                *capacity = supervisor_capacity;
            }
        }
    }

    let mut seen = HashSet::new();
    for (project, _) in projects {
        let Some(supervisor) = owner.get(project) else {
            continue;
        };
        if !seen.insert(supervisor.clone()) {
            continue;
        }
        let total: usize = owner
            .iter()
            .filter(|(_, g)| *g == supervisor)
            .filter_map(|(p, _)| capacities.projects.get(p))
            .sum();
        let Some(capacity) = capacities.supervisors.get_mut(supervisor) else {
            continue;
        };
        if *capacity > total {
            diagnostics.push(
                Diagnostic::SupervisorCapacityExceedsProjects {
                    supervisor: supervisor.clone(),
                    capacity: *capacity,
                    total,
                }
                .emit(),
            );
            if clean {
                *capacity = total;
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn game(clean: bool) -> StudentAllocation {
        StudentAllocation::create_from_dictionaries(
            [
                ("A", vec!["X1", "Y1"]),
                ("B", vec!["X1", "X2"]),
                ("C", vec!["X2", "Y1"]),
                ("D", vec!["Y1", "X1"]),
            ],
            [("X", vec!["D", "B", "A", "C"]), ("Y", vec!["A", "C", "D"])],
            [("X1", "X"), ("X2", "X"), ("Y1", "Y")],
            [("X1", 1), ("X2", 1), ("Y1", 2)],
            [("X", 2), ("Y", 2)],
            clean,
        )
        .unwrap()
    }

    #[test]
    fn test_project_preferences_cascade_from_supervisor() {
        let game = game(false);
        let arena = game.arena();
        let x1 = game.projects().get("X1").unwrap();
        let y1 = game.projects().get("Y1").unwrap();

        assert_eq!(arena.names(arena[x1].preferences()), vec!["D", "B", "A"]);
        assert_eq!(arena.names(arena[y1].preferences()), vec!["A", "C", "D"]);
        assert!(game.diagnostics().is_empty());
    }

    #[test]
    fn test_student_optimal() {
        let mut game = game(false);

        let matching = game.solve(Optimal::Student).unwrap();

        assert_eq!(matching.members("X1"), Some(vec!["B"]));
        assert_eq!(matching.members("X2"), Some(vec!["C"]));
        assert_eq!(matching.members("Y1"), Some(vec!["A", "D"]));
        assert_eq!(game.supervisor_matching().members("X"), Some(vec!["B", "C"]));
        assert_eq!(game.check_validity(), Ok(()));
        assert!(game.check_stability());
    }

    #[test]
    fn test_supervisor_optimal_is_stable() {
        let mut game = game(false);

        let matching = game.solve(Optimal::Supervisor).unwrap();

        assert_eq!(matching.matched(), 4);
        assert_eq!(game.check_validity(), Ok(()));
        assert!(game.check_stability());
    }

    #[test]
    fn test_unknown_supervisor_is_fatal() {
        let result = StudentAllocation::create_from_dictionaries(
            [("A", vec!["P"])],
            [("G", vec!["A"])],
            [("P", "H")],
            [("P", 1)],
            [("G", 1)],
            false,
        );

        assert_eq!(
            result.unwrap_err(),
            GameError::UnknownSupervisor {
                project: "P".into(),
                supervisor: "H".into(),
            }
        );
    }

    #[test]
    fn test_capacity_consistency_is_cleaned() {
        let game = StudentAllocation::create_from_dictionaries(
            [("A", vec!["P", "Q"])],
            [("G", vec!["A"])],
            [("P", "G"), ("Q", "G")],
            [("P", 3), ("Q", 1)],
            [("G", 2)],
            true,
        )
        .unwrap();

        assert!(game.diagnostics().contains(&Diagnostic::ProjectCapacityExceedsSupervisor {
            project: "P".into(),
            capacity: 3,
            supervisor: "G".into(),
            supervisor_capacity: 2,
        }));
        let p = game.projects().get("P").unwrap();
        assert_eq!(game.arena()[p].capacity(), 2);
    }

    #[test]
    fn test_supervisor_capacity_above_projects_total() {
        let game = StudentAllocation::create_from_dictionaries(
            [("A", vec!["P"])],
            [("G", vec!["A"])],
            [("P", "G")],
            [("P", 1)],
            [("G", 4)],
            true,
        )
        .unwrap();

        assert_eq!(
            game.diagnostics(),
            &[Diagnostic::SupervisorCapacityExceedsProjects {
                supervisor: "G".into(),
                capacity: 4,
                total: 1,
            }]
        );
        let g = game.supervisors().get("G").unwrap();
        assert_eq!(game.arena()[g].capacity(), 1);
    }

    #[test]
    fn test_set_assignment_updates_supervisor() {
        let mut game = game(false);
        game.solve(Optimal::Student).unwrap();

        game.set_assignment("X1", &["A", "B"]).unwrap();

        assert_eq!(game.matching().unwrap().members("Y1"), Some(vec!["D"]));
        assert_eq!(game.supervisor_matching().members("X"), Some(vec!["B", "A", "C"]));

        let error = game.check_validity().unwrap_err();
        assert_eq!(error.oversubscribed().count(), 2);
    }
}
