//! Name-level input checks.
//!
//! Games receive plain name tables. Every check runs on those tables before
//! a single player exists, so cleaning never has to patch keys that are
//! already in the arena. Each check pushes [`Diagnostic`]s (logged as they
//! are raised) and, with `clean`, repairs what it found.

use std::collections::{HashMap, HashSet};

use crate::error::GameError;
use crate::types::Diagnostic;

/// A party's preference lists by player name, in input order.
pub(crate) type PreferenceTable = Vec<(String, Vec<String>)>;

/// Collect `entries` into a table. Player names must be unique.
pub(crate) fn read_table<K, P, N>(
    party: &'static str,
    entries: impl IntoIterator<Item = (K, P)>,
) -> Result<PreferenceTable, GameError>
where
    K: AsRef<str>,
    P: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut table = Vec::new();

    for (name, preferences) in entries {
        let name = name.as_ref().to_string();
        if !seen.insert(name.clone()) {
            return Err(GameError::DuplicatePlayer { party, name });
        }
        let preferences = preferences.into_iter().map(|n| n.as_ref().to_string()).collect();
        table.push((name, preferences));
    }

    Ok(table)
}

/// Collect capacities for every player of `table`.
///
/// A player without a capacity, or a capacity for a non-member, is fatal.
pub(crate) fn read_capacities<K>(
    party: &'static str,
    entries: impl IntoIterator<Item = (K, usize)>,
    table: &PreferenceTable,
) -> Result<HashMap<String, usize>, GameError>
where
    K: AsRef<str>,
{
    let members: HashSet<&str> = table.iter().map(|(name, _)| name.as_str()).collect();
    let mut capacities = HashMap::with_capacity(table.len());

    for (name, capacity) in entries {
        let name = name.as_ref();
        if !members.contains(name) {
            return Err(GameError::UnknownPlayer {
                party,
                name: name.to_string(),
            });
        }
        capacities.insert(name.to_string(), capacity);
    }

    if let Some((name, _)) = table.iter().find(|(name, _)| !capacities.contains_key(name)) {
        return Err(GameError::MissingCapacity {
            party,
            name: name.clone(),
        });
    }

    Ok(capacities)
}

/// Owned `player -> ranked names` lookup, taken before any cleaning.
pub(crate) fn rankings(table: &PreferenceTable) -> HashMap<String, HashSet<String>> {
    table
        .iter()
        .map(|(name, preferences)| (name.clone(), preferences.iter().cloned().collect()))
        .collect()
}

/// Names of the table's players.
pub(crate) fn member_names(table: &PreferenceTable) -> HashSet<String> {
    table.iter().map(|(name, _)| name.clone()).collect()
}

/// Drop entries that name no member of the other party.
///
/// Always applied: there is no player such an entry could point to.
pub(crate) fn skip_unknown(
    party: &'static str,
    table: &mut PreferenceTable,
    is_member: impl Fn(&str, &str) -> bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (player, preferences) in table.iter_mut() {
        let player = &*player;
        let unknown: Vec<String> = preferences
            .iter()
            .filter(|other| !is_member(player, other))
            .cloned()
            .collect();
        if unknown.is_empty() {
            continue;
        }
        preferences.retain(|other| is_member(player, other));
        diagnostics.push(
            Diagnostic::UnknownPreferences {
                party,
                player: player.clone(),
                unknown,
            }
            .emit(),
        );
    }
}

/// Warn about names ranked more than once; keep only the first with `clean`.
pub(crate) fn check_duplicates(
    party: &'static str,
    table: &mut PreferenceTable,
    clean: bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (player, preferences) in table.iter_mut() {
        let mut seen = HashSet::with_capacity(preferences.len());
        let mut duplicates = Vec::new();
        for other in preferences.iter() {
            if !seen.insert(other.as_str()) && !duplicates.contains(other) {
                duplicates.push(other.clone());
            }
        }
        if duplicates.is_empty() {
            continue;
        }

        diagnostics.push(
            Diagnostic::DuplicatePreferences {
                party,
                player: player.clone(),
                duplicates,
            }
            .emit(),
        );
        if clean {
            let mut kept = HashSet::with_capacity(preferences.len());
            preferences.retain(|other| kept.insert(other.clone()));
        }
    }
}

/// Warn about every `(player, other)` where `other` does not rank `player`
/// back; drop `other` from the list with `clean`.
///
/// `ranked_by(player, other)` answers "does `other` rank `player`?".
pub(crate) fn check_reciprocity(
    party: &'static str,
    table: &mut PreferenceTable,
    ranked_by: impl Fn(&str, &str) -> bool,
    clean: bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (player, preferences) in table.iter_mut() {
        let player = &*player;
        let mut reported = HashSet::new();
        for other in preferences.iter() {
            if !ranked_by(player, other) && reported.insert(other.clone()) {
                diagnostics.push(
                    Diagnostic::UnreciprocatedPreference {
                        party,
                        player: player.clone(),
                        other: other.clone(),
                    }
                    .emit(),
                );
            }
        }
        if clean && !reported.is_empty() {
            preferences.retain(|other| !reported.contains(other));
        }
    }
}

/// Warn about players with nobody to rank.
pub(crate) fn check_empty(
    party: &'static str,
    table: &PreferenceTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (player, preferences) in table {
        if preferences.is_empty() {
            diagnostics.push(
                Diagnostic::EmptyPreferences {
                    party,
                    player: player.clone(),
                }
                .emit(),
            );
        }
    }
}

/// Warn about players that do not rank every name in `others`.
pub(crate) fn check_complete(
    party: &'static str,
    table: &PreferenceTable,
    others: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (player, preferences) in table {
        let missing: Vec<String> = others
            .iter()
            .filter(|other| !preferences.contains(other))
            .cloned()
            .collect();
        if !missing.is_empty() {
            diagnostics.push(
                Diagnostic::IncompleteRanking {
                    party,
                    player: player.clone(),
                    missing,
                }
                .emit(),
            );
        }
    }
}

/// Warn about zero capacities. With `clean`, the returned names should be
/// withdrawn from the game.
pub(crate) fn check_capacities(
    party: &'static str,
    table: &PreferenceTable,
    capacities: &HashMap<String, usize>,
    diagnostics: &mut Vec<Diagnostic>,
) -> HashSet<String> {
    let mut closed = HashSet::new();
    for (player, _) in table {
        if capacities.get(player).copied().unwrap_or(0) == 0 {
            diagnostics.push(
                Diagnostic::NonPositiveCapacity {
                    party,
                    player: player.clone(),
                }
                .emit(),
            );
            closed.insert(player.clone());
        }
    }
    closed
}

/// Remove every name in `withdrawn` from every list of `table`.
pub(crate) fn withdraw(table: &mut PreferenceTable, withdrawn: &HashSet<String>) {
    if withdrawn.is_empty() {
        return;
    }
    for (_, preferences) in table.iter_mut() {
        preferences.retain(|other| !withdrawn.contains(other));
    }
}

/// Names in table order.
pub(crate) fn names(table: &PreferenceTable) -> Vec<String> {
    table.iter().map(|(name, _)| name.clone()).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &[&str])]) -> PreferenceTable {
        read_table("resident", rows.iter().map(|(n, p)| (*n, p.iter().copied()))).unwrap()
    }

    #[test]
    fn test_read_table_rejects_duplicate_players() {
        let result = read_table("resident", [("A", vec!["X"]), ("A", vec!["Y"])]);

        assert_eq!(
            result,
            Err(GameError::DuplicatePlayer {
                party: "resident",
                name: "A".into(),
            })
        );
    }

    #[test]
    fn test_read_capacities() {
        let hospitals = table(&[("M", &["A"]), ("C", &["A"])]);

        let capacities = read_capacities("hospital", [("M", 2), ("C", 1)], &hospitals).unwrap();
        assert_eq!(capacities["M"], 2);

        assert_eq!(
            read_capacities("hospital", [("M", 2)], &hospitals),
            Err(GameError::MissingCapacity {
                party: "hospital",
                name: "C".into(),
            })
        );
        assert_eq!(
            read_capacities("hospital", [("M", 2), ("C", 1), ("G", 1)], &hospitals),
            Err(GameError::UnknownPlayer {
                party: "hospital",
                name: "G".into(),
            })
        );
    }

    #[test]
    fn test_skip_unknown_always_removes() {
        let mut residents = table(&[("A", &["M", "Q", "C"])]);
        let members: HashSet<String> = ["M".to_string(), "C".to_string()].into();
        let mut diagnostics = Vec::new();

        skip_unknown("resident", &mut residents, |_, o| members.contains(o), &mut diagnostics);

        assert_eq!(residents[0].1, vec!["M", "C"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnknownPreferences {
                party: "resident",
                player: "A".into(),
                unknown: vec!["Q".into()],
            }]
        );
    }

    #[test]
    fn test_duplicates_only_removed_when_cleaning() {
        let mut diagnostics = Vec::new();

        let mut kept = table(&[("A", &["M", "C", "M", "M"])]);
        check_duplicates("resident", &mut kept, false, &mut diagnostics);
        assert_eq!(kept[0].1.len(), 4);

        let mut cleaned = table(&[("A", &["M", "C", "M", "M"])]);
        check_duplicates("resident", &mut cleaned, true, &mut diagnostics);
        assert_eq!(cleaned[0].1, vec!["M", "C"]);

        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::DuplicatePreferences { duplicates, .. }
                if duplicates == &vec!["M".to_string()]
        ));
    }

    #[test]
    fn test_reciprocity() {
        let mut residents = table(&[("A", &["M", "C"])]);
        let hospitals = rankings(&table(&[("M", &["A"]), ("C", &[])]));
        let ranked_by = |player: &str, other: &str| {
            hospitals.get(other).is_some_and(|ranked| ranked.contains(player))
        };
        let mut diagnostics = Vec::new();

        check_reciprocity("resident", &mut residents, ranked_by, true, &mut diagnostics);

        assert_eq!(residents[0].1, vec!["M"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnreciprocatedPreference {
                party: "resident",
                player: "A".into(),
                other: "C".into(),
            }]
        );
    }

    #[test]
    fn test_empty_and_incomplete() {
        let suitors = table(&[("A", &["X"]), ("B", &[])]);
        let mut diagnostics = Vec::new();

        check_empty("suitor", &suitors, &mut diagnostics);
        check_complete("suitor", &suitors, &["X".to_string(), "Y".to_string()], &mut diagnostics);

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(
            diagnostics[0],
            Diagnostic::EmptyPreferences {
                party: "suitor",
                player: "B".into(),
            }
        );
        assert_eq!(
            diagnostics[1],
            Diagnostic::IncompleteRanking {
                party: "suitor",
                player: "A".into(),
                missing: vec!["Y".into()],
            }
        );
    }

    #[test]
    fn test_zero_capacity_is_withdrawn() {
        let hospitals = table(&[("M", &["A"]), ("G", &["A"])]);
        let capacities: HashMap<String, usize> =
            [("M".to_string(), 1), ("G".to_string(), 0)].into();
        let mut residents = table(&[("A", &["G", "M"])]);
        let mut diagnostics = Vec::new();

        let closed = check_capacities("hospital", &hospitals, &capacities, &mut diagnostics);
        withdraw(&mut residents, &closed);

        assert_eq!(residents[0].1, vec!["M"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].player(), Some("G"));
    }
}
