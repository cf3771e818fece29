//! Player arena and pairing primitives.
//!
//! ## Architecture
//!
//! Every player of a game lives in one `Slab<Player>`. Preference lists and
//! matches hold slab keys, so the player graph has no ownership cycles and
//! "delete a pair" is two index removals.
//!
//! ## Memory Model
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - `Slab::with_capacity(n)` pre-allocates n slots
//! - O(1) insert and lookup
//!
//! Players are never removed once inserted, so keys stay valid for the
//! lifetime of the arena.
//!
//! ## Pairing Primitives
//!
//! | Operation | Effect on both players |
//! |-----------|------------------------|
//! | [`Arena::match_pair`] | record each other as partner |
//! | [`Arena::unmatch_pair`] | drop each other as partner |
//! | [`Arena::delete_pair`] | drop each other from the working preferences |
//!
//! ## Example
//!
//! ```
//! use matching_games::{Arena, Player};
//!
//! let mut arena = Arena::with_capacity(2);
//! let a = arena.insert(Player::new("A"));
//! let h = arena.insert(Player::host("H", 1));
//! arena.set_preferences(a, vec![h]);
//! arena.set_preferences(h, vec![a]);
//!
//! arena.match_pair(a, h);
//! assert_eq!(arena[a].partner(), Some(h));
//! assert_eq!(arena[h].matches(), &[a]);
//!
//! arena.delete_pair(a, h);
//! assert!(arena[a].preferences().is_empty());
//! assert_eq!(arena[a].original_preferences(), &[h]);
//! ```

use std::ops::{Index, IndexMut};

use slab::Slab;

use crate::players::{Player, PlayerKey};

/// Owner of every player in a game.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    /// Player storage
    /// Key: PlayerKey, Value: Player
    players: Slab<Player>,
}

impl Arena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            players: Slab::new(),
        }
    }

    /// Create an arena with room for `capacity` players
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            players: Slab::with_capacity(capacity),
        }
    }

    // ========================================================================
    // Storage
    // ========================================================================

    /// Add a player and return its key
    pub fn insert(&mut self, player: Player) -> PlayerKey {
        self.players.insert(player)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[inline]
    pub fn get(&self, key: PlayerKey) -> Option<&Player> {
        self.players.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: PlayerKey) -> Option<&mut Player> {
        self.players.get_mut(key)
    }

    /// Iterate over every player with its key
    pub fn iter(&self) -> impl Iterator<Item = (PlayerKey, &Player)> {
        self.players.iter()
    }

    /// Name of the player behind `key`
    #[inline]
    pub fn name(&self, key: PlayerKey) -> &str {
        self.players[key].name()
    }

    /// Names of the players behind `keys`, in order
    pub fn names(&self, keys: &[PlayerKey]) -> Vec<String> {
        keys.iter().map(|&key| self.name(key).to_string()).collect()
    }

    /// Set a player's preferences (see [`Player::set_preferences`])
    pub fn set_preferences(&mut self, key: PlayerKey, preferences: Vec<PlayerKey>) {
        self.players[key].set_preferences(preferences);
    }

    /// Total length of every working preference list
    pub fn total_preference_entries(&self) -> usize {
        self.players.iter().map(|(_, player)| player.preferences().len()).sum()
    }

    /// Restore every working list and clear every match.
    ///
    /// Called before each solve so that solving is repeatable.
    pub fn reset(&mut self) {
        for (_, player) in self.players.iter_mut() {
            player.restore_preferences();
            player.clear_matching();
        }
    }

    // ========================================================================
    // Pairing Primitives
    // ========================================================================

    /// Record `a` and `b` as matched to each other
    pub fn match_pair(&mut self, a: PlayerKey, b: PlayerKey) {
        self.players[a].record_match(b);
        self.players[b].record_match(a);
    }

    /// Remove the match between `a` and `b` on both sides
    pub fn unmatch_pair(&mut self, a: PlayerKey, b: PlayerKey) {
        self.players[a].record_unmatch(b);
        self.players[b].record_unmatch(a);
    }

    /// Remove `a` and `b` from each other's working preferences.
    ///
    /// Permanent for the current solve. Callers must check whether either
    /// player has run out of preferences.
    pub fn delete_pair(&mut self, a: PlayerKey, b: PlayerKey) {
        self.players[a].forget(b);
        self.players[b].forget(a);
    }
}

impl Index<PlayerKey> for Arena {
    type Output = Player;

    #[inline]
    fn index(&self, key: PlayerKey) -> &Player {
        &self.players[key]
    }
}

impl IndexMut<PlayerKey> for Arena {
    #[inline]
    fn index_mut(&mut self, key: PlayerKey) -> &mut Player {
        &mut self.players[key]
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
