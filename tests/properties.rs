//! Property tests: stability, optimality, capacity and snapshot invariants
//! over generated instances.

use proptest::collection::vec;
use proptest::prelude::*;

use matching_games::{HospitalResident, Optimal, StableMarriage};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Complete rank lists for `n` suitors and `n` reviewers, as indices.
fn marriage_instance() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<Vec<usize>>)> {
    (1usize..=7).prop_flat_map(|n| {
        let permutation = Just((0..n).collect::<Vec<_>>()).prop_shuffle();
        (vec(permutation.clone(), n), vec(permutation, n))
    })
}

/// Residents rank every hospital; hospitals rank every resident.
fn hospital_instance() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<Vec<usize>>, Vec<usize>)> {
    (1usize..=8, 1usize..=4).prop_flat_map(|(residents, hospitals)| {
        let resident_list = Just((0..hospitals).collect::<Vec<_>>()).prop_shuffle();
        let hospital_list = Just((0..residents).collect::<Vec<_>>()).prop_shuffle();
        (
            vec(resident_list, residents),
            vec(hospital_list, hospitals),
            vec(1usize..=3, hospitals),
        )
    })
}

fn named(prefix: &str, lists: &[Vec<usize>], other: &str) -> Vec<(String, Vec<String>)> {
    lists
        .iter()
        .enumerate()
        .map(|(i, list)| {
            (format!("{prefix}{i}"), list.iter().map(|j| format!("{other}{j}")).collect())
        })
        .collect()
}

fn marriage((suitors, reviewers): &(Vec<Vec<usize>>, Vec<Vec<usize>>)) -> StableMarriage {
    StableMarriage::create_from_dictionaries(
        named("s", suitors, "r"),
        named("r", reviewers, "s"),
        false,
    )
    .unwrap()
}

fn rank(lists: &[Vec<usize>], player: usize, partner: &str) -> usize {
    let index: usize = partner[1..].parse().unwrap();
    lists[player].iter().position(|&j| j == index).unwrap()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn marriage_is_stable_and_perfect(instance in marriage_instance()) {
        let mut game = marriage(&instance);
        let n = instance.0.len();

        for optimal in [Optimal::Suitor, Optimal::Reviewer] {
            let matching = game.solve(optimal).unwrap();
            prop_assert_eq!(matching.matched(), n);
            prop_assert!(game.check_stability());
            prop_assert!(game.check_validity().is_ok());
            prop_assert_eq!(game.check_validity(), game.check_validity());
        }
    }

    #[test]
    fn suitors_do_best_when_proposing(instance in marriage_instance()) {
        let mut game = marriage(&instance);
        let suitor = game.solve(Optimal::Suitor).unwrap();
        let reviewer = game.solve(Optimal::Reviewer).unwrap();

        for i in 0..instance.0.len() {
            let name = format!("s{i}");
            let best = rank(&instance.0, i, suitor.partner(&name).unwrap());
            let worst = rank(&instance.0, i, reviewer.partner(&name).unwrap());
            prop_assert!(best <= worst);
        }
    }

    #[test]
    fn hospitals_never_exceed_capacity(instance in hospital_instance()) {
        let (residents, hospitals, capacities) = &instance;
        let mut game = HospitalResident::create_from_dictionaries(
            named("r", residents, "h"),
            named("h", hospitals, "r"),
            capacities.iter().enumerate().map(|(i, &c)| (format!("h{i}"), c)),
            false,
        )
        .unwrap();

        for optimal in [Optimal::Resident, Optimal::Hospital] {
            let matching = game.solve(optimal).unwrap();
            for (i, &capacity) in capacities.iter().enumerate() {
                let hospital = format!("h{i}");
                prop_assert!(matching.get(&hospital).unwrap().len() <= capacity);
            }
            let places: usize = capacities.iter().sum();
            prop_assert_eq!(matching.matched(), places.min(residents.len()));
            prop_assert!(game.check_stability());
            prop_assert!(game.check_validity().is_ok());
        }
    }

    #[test]
    fn solving_leaves_original_preferences_alone(instance in marriage_instance()) {
        let mut game = marriage(&instance);
        let snapshot = |game: &StableMarriage| -> Vec<Vec<String>> {
            game.suitors()
                .keys()
                .iter()
                .chain(game.reviewers().keys())
                .map(|&key| game.arena().names(game.arena()[key].original_preferences()))
                .collect()
        };

        let before = snapshot(&game);
        let first = game.solve(Optimal::Reviewer).unwrap();
        game.solve(Optimal::Suitor).unwrap();
        let again = game.solve(Optimal::Reviewer).unwrap();

        prop_assert_eq!(before, snapshot(&game));
        prop_assert_eq!(first.digest(), again.digest());
    }
}
