//! One-to-one result container.

use std::collections::BTreeMap;

use crate::matching::fingerprint;

/// Mapping from each player to its partner, if any.
///
/// # Example
///
/// ```
/// use matching_games::StableMarriage;
///
/// let mut game = StableMarriage::create_from_dictionaries(
///     [("A", vec!["X", "Y"]), ("B", vec!["Y", "X"])],
///     [("X", vec!["B", "A"]), ("Y", vec!["A", "B"])],
///     false,
/// )
/// .unwrap();
///
/// let matching = game.solve(matching_games::Optimal::Suitor).unwrap();
/// assert_eq!(matching.partner("A"), Some("X"));
/// assert_eq!(matching.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleMatching {
    pairs: BTreeMap<String, Option<String>>,
}

impl SingleMatching {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, partner: Option<String>) {
        self.pairs.insert(key.into(), partner);
    }

    /// The partner of `key`. `None` if `key` is unmatched or unknown.
    pub fn partner(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).and_then(|p| p.as_deref())
    }

    /// The entry for `key`: `Some(None)` means present but unmatched.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.pairs.get(key).map(|p| p.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    /// Number of keys, matched or not
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of keys with a partner
    pub fn matched(&self) -> usize {
        self.pairs.values().filter(|p| p.is_some()).count()
    }

    /// SHA-256 of the canonical mapping
    pub fn digest(&self) -> [u8; 32] {
        fingerprint(self.iter().map(|(k, p)| (k, p.into_iter())))
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
