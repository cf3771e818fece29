//! One-to-many result container.

use std::collections::BTreeMap;

use crate::matching::fingerprint;

/// Mapping from each host to its members, best first by the host's ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipleMatching {
    members: BTreeMap<String, Vec<String>>,
}

impl MultipleMatching {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, members: Vec<String>) {
        self.members.insert(key.into(), members);
    }

    /// Members of `key`, or `None` for an unknown key.
    pub fn members(&self, key: &str) -> Option<Vec<&str>> {
        self.members
            .get(key)
            .map(|members| members.iter().map(String::as_str).collect())
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.members.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.members.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Number of hosts
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total number of members across all hosts
    pub fn matched(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }

    /// Host holding `member`, if any
    pub fn host_of(&self, member: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == member))
            .map(|(key, _)| key.as_str())
    }

    /// SHA-256 of the canonical mapping
    pub fn digest(&self) -> [u8; 32] {
        fingerprint(
            self.members
                .iter()
                .map(|(k, v)| (k.as_str(), v.iter().map(String::as_str))),
        )
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
