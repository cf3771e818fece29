//! Stable roommates game.

use crate::engine::stable_roommates;
use crate::error::{GameError, InvalidMatching, Result};
use crate::games::input::{self, PreferenceTable};
use crate::games::{enrol, resolve, validate, BlockingPairs};
use crate::matching::SingleMatching;
use crate::players::{Arena, Party, Player};
use crate::types::Diagnostic;
use crate::LOG_TARGET;

/// One party; every player ranks every other player.
#[derive(Debug, Clone)]
pub struct StableRoommates {
    arena: Arena,
    players: Party,
    diagnostics: Vec<Diagnostic>,
    matching: Option<SingleMatching>,
    blocking_pairs: BlockingPairs,
}

impl StableRoommates {
    /// Build a game from a name table.
    ///
    /// Each player must rank exactly every other player; a gap is fatal.
    /// A player ranking itself, or a non-member, has that entry dropped
    /// with a warning. With `clean`, duplicate entries keep their first
    /// occurrence.
    pub fn create_from_dictionaries<K, P, N>(
        preferences: impl IntoIterator<Item = (K, P)>,
        clean: bool,
    ) -> Result<Self>
    where
        K: AsRef<str>,
        P: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut table = input::read_table("player", preferences)?;

        let mut diagnostics = Vec::new();
        let members = input::member_names(&table);
        input::skip_unknown(
            "player",
            &mut table,
            |player, other| player != other && members.contains(other),
            &mut diagnostics,
        );
        input::check_duplicates("player", &mut table, clean, &mut diagnostics);

        let all = input::names(&table);
        for (player, ranked) in &table {
            let missing: Vec<String> = all
                .iter()
                .filter(|other| *other != player && !ranked.contains(other))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(GameError::IncompleteRoommatePreferences {
                    player: player.clone(),
                    missing,
                });
            }
        }

        let game = Self::build(table, diagnostics);

        tracing::debug!(
            target: LOG_TARGET,
            players = game.players.len(),
            diagnostics = game.diagnostics.len(),
            "stable roommates game created",
        );
        Ok(game)
    }

    fn build(table: PreferenceTable, diagnostics: Vec<Diagnostic>) -> Self {
        let mut arena = Arena::with_capacity(table.len());
        let mut players = Party::with_capacity("player", table.len());

        for (name, _) in &table {
            enrol(&mut arena, &mut players, Player::new(name.as_str()));
        }
        for (name, preferences) in &table {
            if let Some(key) = players.get(name) {
                arena.set_preferences(key, resolve(&players, preferences));
            }
        }

        Self {
            arena,
            players,
            diagnostics,
            matching: None,
            blocking_pairs: Vec::new(),
        }
    }

    /// Run Irving's algorithm.
    ///
    /// When no stable matching exists the solve still succeeds: the
    /// returned matching is incomplete and a
    /// [`Diagnostic::NoStableMatching`] is appended to
    /// [`diagnostics`](Self::diagnostics).
    pub fn solve(&mut self) -> Result<SingleMatching> {
        self.arena.reset();
        self.blocking_pairs.clear();
        self.diagnostics.retain(|d| !d.is_no_stable_matching());

        let outcome = stable_roommates(&mut self.arena, self.players.keys())?;
        self.diagnostics.extend(outcome.diagnostics);

        let matching = self.collect();
        self.matching = Some(matching.clone());
        Ok(matching)
    }

    fn collect(&self) -> SingleMatching {
        let mut matching = SingleMatching::new();
        for &player in self.players.keys() {
            matching.insert(
                self.arena.name(player),
                self.arena[player].partner().map(|p| self.arena.name(p).to_string()),
            );
        }
        matching
    }

    /// Pair `player` with `roommate`, or leave `player` alone with `None`.
    ///
    /// Previous roommates of both are left alone.
    pub fn set_partner(&mut self, player: &str, roommate: Option<&str>) -> Result<()> {
        let lookup = |name: &str| {
            self.players.get(name).ok_or_else(|| GameError::UnknownPlayer {
                party: "player",
                name: name.to_string(),
            })
        };
        let p = lookup(player)?;
        let q = roommate.map(lookup).transpose()?;
        if q == Some(p) {
            return Err(GameError::SelfPairing {
                player: player.to_string(),
            });
        }

        if let Some(old) = self.arena[p].partner() {
            self.arena.unmatch_pair(p, old);
        }
        if let Some(q) = q {
            if let Some(old) = self.arena[q].partner() {
                self.arena.unmatch_pair(q, old);
            }
            self.arena.match_pair(p, q);
        }

        self.matching = Some(self.collect());
        self.blocking_pairs.clear();
        Ok(())
    }

    pub fn check_validity(&self) -> std::result::Result<(), InvalidMatching> {
        validate(&self.arena, &[&self.players])
    }

    /// Whether no two players would both rather room together.
    ///
    /// Each unordered pair is checked once.
    pub fn check_stability(&mut self) -> bool {
        let keys = self.players.keys();
        let mut blocking = Vec::new();

        for (i, &a) in keys.iter().enumerate() {
            for &b in &keys[i + 1..] {
                let (pa, pb) = (&self.arena[a], &self.arena[b]);
                if pa.partner() != Some(b) && pa.prefers_to_partner(b) && pb.prefers_to_partner(a) {
                    blocking.push((pa.name().to_string(), pb.name().to_string()));
                }
            }
        }

        self.blocking_pairs = blocking;
        self.blocking_pairs.is_empty()
    }

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

    pub fn players(&self) -> &Party {
        &self.players
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irving_example() {
        let mut game = StableRoommates::create_from_dictionaries(
            [
                ("A", "DFBEC"),
                ("B", "FCEAD"),
                ("C", "DEAFB"),
                ("D", "BFEAC"),
                ("E", "DBCFA"),
                ("F", "EADBC"),
            ]
            .map(|(name, prefs)| (name, prefs.chars().map(String::from).collect::<Vec<_>>())),
            false,
        )
        .unwrap();

        let matching = game.solve().unwrap();

        let pairs: Vec<_> = matching.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("A", Some("F")),
                ("B", Some("C")),
                ("C", Some("B")),
                ("D", Some("E")),
                ("E", Some("D")),
                ("F", Some("A")),
            ]
        );
        assert!(game.diagnostics().is_empty());
        assert!(game.check_stability());
        assert_eq!(game.check_validity(), Ok(()));
    }

    #[test]
    fn test_incomplete_preferences_are_fatal() {
        let result = StableRoommates::create_from_dictionaries(
            [("1", vec!["2", "3"]), ("2", vec!["1"]), ("3", vec!["1", "2"])],
            false,
        );

        assert_eq!(
            result.unwrap_err(),
            GameError::IncompleteRoommatePreferences {
                player: "2".into(),
                missing: vec!["3".into()],
            }
        );
    }

    #[test]
    fn test_self_ranking_is_skipped() {
        let game = StableRoommates::create_from_dictionaries(
            [("1", vec!["1", "2"]), ("2", vec!["1"])],
            false,
        )
        .unwrap();

        assert_eq!(game.diagnostics().len(), 1);
        assert_eq!(game.diagnostics()[0].player(), Some("1"));
    }

    #[test]
    fn test_no_stable_matching_is_not_an_error() {
        let mut game = StableRoommates::create_from_dictionaries(
            [
                ("1", vec!["2", "3", "4"]),
                ("2", vec!["3", "1", "4"]),
                ("3", vec!["1", "2", "4"]),
                ("4", vec!["3", "2", "1"]),
            ],
            false,
        )
        .unwrap();

        game.solve().unwrap();
        game.solve().unwrap();

        // Phase 1 empties 4's list; the rotation in phase 2 empties the rest.
        // Re-solving replaces, rather than accumulates, both reports.
        let reports: Vec<_> = game
            .diagnostics()
            .iter()
            .filter(|d| d.is_no_stable_matching())
            .collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0],
            &Diagnostic::NoStableMatching {
                players: vec!["4".to_string()],
            }
        );
        assert_eq!(
            reports[1],
            &Diagnostic::NoStableMatching {
                players: ["1", "2", "3", "4"].map(String::from).to_vec(),
            }
        );
    }

    #[test]
    fn test_set_partner_rejects_self() {
        let mut game = StableRoommates::create_from_dictionaries(
            [("1", vec!["2", "3"]), ("2", vec!["1", "3"]), ("3", vec!["1", "2"])],
            false,
        )
        .unwrap();
        game.solve().unwrap();
        let before = game.matching().cloned();

        assert_eq!(
            game.set_partner("1", Some("1")),
            Err(GameError::SelfPairing {
                player: "1".to_string(),
            })
        );
        assert_eq!(game.matching().cloned(), before);
        assert!(game.set_partner("1", None).is_ok());
    }
}
