//! One side of a game.
//!
//! A `Party` is the ordered list of keys for a group of players (suitors,
//! hospitals, projects, ...) plus a name index for lookups at the API
//! boundary. Names are unique within a party but may repeat across parties.

use std::collections::HashMap;

use crate::players::PlayerKey;

/// Ordered set of players sharing a role.
#[derive(Debug, Clone)]
pub struct Party {
    /// Singular label used in messages, e.g. "resident"
    label: &'static str,

    /// Keys in insertion order
    keys: Vec<PlayerKey>,

    /// Name to key mapping
    index: HashMap<String, PlayerKey>,
}

impl Party {
    /// Create an empty party
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            keys: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty party with room for `capacity` members
    pub fn with_capacity(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            keys: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Add a member. Returns `false` (and changes nothing) if the name is taken.
    pub fn insert(&mut self, name: &str, key: PlayerKey) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), key);
        self.keys.push(key);
        true
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Key of the member called `name`
    #[inline]
    pub fn get(&self, name: &str) -> Option<PlayerKey> {
        self.index.get(name).copied()
    }

    /// Whether `key` belongs to this party
    pub fn contains(&self, key: PlayerKey) -> bool {
        self.keys.contains(&key)
    }

    /// Member keys in insertion order
    #[inline]
    pub fn keys(&self) -> &[PlayerKey] {
        &self.keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_insert_and_lookup() {
        let mut party = Party::with_capacity("hospital", 2);

        assert!(party.insert("M", 4));
        assert!(party.insert("C", 1));

        assert_eq!(party.label(), "hospital");
        assert_eq!(party.len(), 2);
        assert_eq!(party.keys(), &[4, 1]);
        assert_eq!(party.get("C"), Some(1));
        assert_eq!(party.get("G"), None);
        assert!(party.contains(4));
        assert!(!party.contains(2));
    }

    #[test]
    fn test_party_rejects_duplicate_names() {
        let mut party = Party::new("resident");

        assert!(party.insert("A", 0));
        assert!(!party.insert("A", 1));
        assert_eq!(party.keys(), &[0]);
        assert_eq!(party.get("A"), Some(0));
    }
}
