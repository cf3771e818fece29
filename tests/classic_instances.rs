//! Worked instances from the matching literature.
//!
//! Each test builds a game through the public API, solves it, and checks
//! the exact matching alongside validity and stability.

use matching_games::types::ranks::preferences_to_ranks;
use matching_games::{
    Diagnostic, GameError, HospitalResident, Optimal, StableMarriage, StableRoommates,
    StudentAllocation,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn classic_hospital_resident() -> HospitalResident {
    HospitalResident::create_from_dictionaries(
        [
            ("A", vec!["C"]),
            ("S", vec!["C", "M"]),
            ("D", vec!["C", "M", "G"]),
            ("J", vec!["C", "G", "M"]),
            ("L", vec!["M", "C", "G"]),
        ],
        [
            ("M", vec!["D", "L", "S", "J"]),
            ("C", vec!["D", "A", "S", "L", "J"]),
            ("G", vec!["D", "J", "L"]),
        ],
        [("M", 2), ("C", 2), ("G", 2)],
        false,
    )
    .unwrap()
}

/// Split "ABC" into ["A", "B", "C"].
fn letters(s: &str) -> Vec<String> {
    s.chars().map(String::from).collect()
}

// ============================================================================
// HOSPITAL / RESIDENT
// ============================================================================

#[test]
fn hospital_resident_classic() {
    let mut game = classic_hospital_resident();

    let resident = game.solve(Optimal::Resident).unwrap();
    assert_eq!(resident.members("M"), Some(vec!["L", "S"]));
    assert_eq!(resident.members("C"), Some(vec!["D", "A"]));
    assert_eq!(resident.members("G"), Some(vec!["J"]));
    assert!(game.check_stability());
    assert!(game.check_validity().is_ok());

    // Only one stable matching exists here, so both sides agree
    let hospital = game.solve(Optimal::Hospital).unwrap();
    assert_eq!(hospital, resident);
    assert_eq!(hospital.digest_hex(), resident.digest_hex());
    assert!(game.check_stability());
}

#[test]
fn hospital_resident_keeps_original_preferences() {
    let mut game = classic_hospital_resident();
    let before: Vec<Vec<String>> = game
        .residents()
        .keys()
        .iter()
        .map(|&key| game.arena().names(game.arena()[key].original_preferences()))
        .collect();

    game.solve(Optimal::Hospital).unwrap();
    game.solve(Optimal::Resident).unwrap();

    let after: Vec<Vec<String>> = game
        .residents()
        .keys()
        .iter()
        .map(|&key| game.arena().names(game.arena()[key].original_preferences()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(after[3], vec!["C", "G", "M"]);
}

#[test]
fn hospital_resident_rejects_marriage_roles() {
    let mut game = classic_hospital_resident();

    let error = game.solve(Optimal::Suitor).unwrap_err();
    assert!(matches!(error, GameError::InvalidOptimal { .. }));
    assert!(matches!(game.solve_for("everyone"), Err(GameError::UnknownOptimal(_))));
}

// ============================================================================
// STABLE MARRIAGE
// ============================================================================

#[test]
fn stable_marriage_sides_disagree() {
    let mut game = StableMarriage::create_from_dictionaries(
        [("A", letters("XYZ")), ("B", letters("YZX")), ("C", letters("ZXY"))],
        [("X", letters("BCA")), ("Y", letters("CAB")), ("Z", letters("ABC"))],
        false,
    )
    .unwrap();

    let suitor = game.solve(Optimal::Suitor).unwrap();
    assert_eq!(suitor.partner("A"), Some("X"));
    assert_eq!(suitor.partner("B"), Some("Y"));
    assert_eq!(suitor.partner("C"), Some("Z"));
    assert!(game.check_stability());

    let reviewer = game.solve(Optimal::Reviewer).unwrap();
    assert_eq!(reviewer.partner("A"), Some("Z"));
    assert_eq!(reviewer.partner("B"), Some("X"));
    assert_eq!(reviewer.partner("C"), Some("Y"));
    assert!(game.check_stability());

    assert_ne!(suitor.digest(), reviewer.digest());
}

#[test]
fn stable_marriage_unknown_names_are_skipped() {
    let game = StableMarriage::create_from_dictionaries(
        [("A", vec!["X", "Q"]), ("B", vec!["X"])],
        [("X", vec!["A", "B"]), ("Y", vec!["B", "A"])],
        false,
    );

    // Sizes are equal (2 and 2), so construction succeeds
    let game = game.unwrap();
    assert!(game.diagnostics().iter().any(|d| matches!(
        d,
        Diagnostic::UnknownPreferences {
            player,
            unknown,
            ..
        } if player == "A" && unknown == &["Q"]
    )));
}

// ============================================================================
// STABLE ROOMMATES
// ============================================================================

#[test]
fn stable_roommates_irving() {
    let mut game = StableRoommates::create_from_dictionaries(
        [
            ("A", letters("DFBEC")),
            ("B", letters("FCEAD")),
            ("C", letters("DEAFB")),
            ("D", letters("BFEAC")),
            ("E", letters("DBCFA")),
            ("F", letters("EADBC")),
        ],
        false,
    )
    .unwrap();

    let matching = game.solve().unwrap();

    assert_eq!(matching.partner("A"), Some("F"));
    assert_eq!(matching.partner("B"), Some("C"));
    assert_eq!(matching.partner("D"), Some("E"));
    assert_eq!(matching.matched(), 6);
    assert!(game.check_stability());
    assert!(game.blocking_pairs().is_empty());
}

#[test]
fn stable_roommates_without_solution() {
    let orders = [
        ["1", "2", "3"],
        ["1", "3", "2"],
        ["2", "1", "3"],
        ["2", "3", "1"],
        ["3", "1", "2"],
        ["3", "2", "1"],
    ];

    for order in orders {
        let mut game = StableRoommates::create_from_dictionaries(
            [
                ("1", vec!["2", "3", "4"]),
                ("2", vec!["3", "1", "4"]),
                ("3", vec!["1", "2", "4"]),
                ("4", order.to_vec()),
            ],
            false,
        )
        .unwrap();

        game.solve().unwrap();

        let report = game
            .diagnostics()
            .iter()
            .find(|d| d.is_no_stable_matching())
            .expect("no-stable-matching report");
        assert_eq!(
            report,
            &Diagnostic::NoStableMatching {
                players: vec!["4".to_string()],
            },
            "player 4 ranking {order:?}"
        );
    }
}

// ============================================================================
// STUDENT ALLOCATION
// ============================================================================

fn allocation() -> StudentAllocation {
    StudentAllocation::create_from_dictionaries(
        [
            ("S1", vec!["P1", "P2"]),
            ("S2", vec!["P1", "P3"]),
            ("S3", vec!["P2", "P3"]),
            ("S4", vec!["P3", "P1"]),
        ],
        [("G1", vec!["S4", "S3", "S2", "S1"]), ("G2", vec!["S2", "S3", "S4"])],
        [("P1", "G1"), ("P2", "G1"), ("P3", "G2")],
        [("P1", 2), ("P2", 1), ("P3", 1)],
        [("G1", 2), ("G2", 1)],
        false,
    )
    .unwrap()
}

#[test]
fn student_allocation_student_optimal() {
    let mut game = allocation();

    let matching = game.solve(Optimal::Student).unwrap();

    assert_eq!(matching.members("P1"), Some(vec!["S2"]));
    assert_eq!(matching.members("P2"), Some(vec!["S3"]));
    assert_eq!(matching.members("P3"), Some(vec!["S4"]));
    assert_eq!(matching.host_of("S1"), None);
    assert!(game.check_stability());
    assert!(game.check_validity().is_ok());
}

#[test]
fn student_allocation_supervisor_optimal() {
    let mut game = allocation();

    let matching = game.solve(Optimal::Supervisor).unwrap();

    assert_eq!(matching.members("P1"), Some(vec!["S4"]));
    assert_eq!(matching.members("P2"), Some(vec!["S3"]));
    assert_eq!(matching.members("P3"), Some(vec!["S2"]));
    assert_eq!(game.supervisor_matching().members("G1"), Some(vec!["S4", "S3"]));
    assert!(game.check_stability());
    assert!(game.check_validity().is_ok());
}

// ============================================================================
// RANK CONVERSION
// ============================================================================

#[test]
fn preference_ranks_match_classic_instance() {
    let hospitals = [
        ("M", vec!["D", "L", "S", "J"]),
        ("C", vec!["D", "A", "S", "L", "J"]),
        ("G", vec!["D", "J", "L"]),
    ];

    let ranks = preferences_to_ranks(&hospitals, &["A", "S", "D", "J", "L"]);

    assert_eq!(ranks[0], vec![5, 2, 0, 3, 1]);
    assert_eq!(ranks[2], vec![5, 5, 0, 1, 2]);
}
