//! Player stored in the arena.
//!
//! ## Design
//!
//! A `Player` is one participant of a game. Other players are referred to by
//! [`PlayerKey`], the slab key of the arena that owns them, never by
//! reference. The shape of a player is fixed by its [`PlayerKind`] when it is
//! created:
//!
//! - `Single` players (suitors, residents, students, roommates) hold at most
//!   one partner
//! - `Host`, `Project` and `Supervisor` players hold a list of partners up to
//!   a capacity
//!
//! ## Preferences
//!
//! `preferences` is the working list that engines prune as they rule pairs
//! out. The first call to [`Player::set_preferences`] also freezes
//! `original_preferences` and a rank lookup built from it. Every
//! [`Player::prefers`] comparison uses the frozen ranking, so pruning never
//! changes what a player actually wants.
//!
//! ## Matching Order
//!
//! A capacitated player's matches are kept sorted by its own original
//! ranking after every insertion, so the worst match is always the last.

use std::collections::{HashMap, HashSet};

/// Stable handle of a player inside an [`Arena`](crate::players::Arena).
pub type PlayerKey = usize;

/// The closed set of player shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerKind {
    /// Holds at most one partner
    Single,
    /// Capacitated, e.g. a hospital
    Host,
    /// Capacitated and run by a supervisor
    Project { supervisor: PlayerKey },
    /// Capacitated across every project it runs
    Supervisor { projects: Vec<PlayerKey> },
}

impl PlayerKind {
    /// Whether players of this kind hold a list of partners
    #[inline]
    pub fn is_capacitated(&self) -> bool {
        !matches!(self, PlayerKind::Single)
    }
}

/// Current match state, decided by the player's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    Single(Option<PlayerKey>),
    Many(Vec<PlayerKey>),
}

/// A participant with preferences and a match state.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique name within the player's party
    name: String,

    /// Shape of the player
    kind: PlayerKind,

    /// Working preference list, pruned while solving
    preferences: Vec<PlayerKey>,

    /// Snapshot taken by the first `set_preferences`
    original_preferences: Option<Vec<PlayerKey>>,

    /// Rank of each player in `original_preferences`
    ranks: HashMap<PlayerKey, usize>,

    /// Working capacity; zero for single players
    capacity: usize,

    /// Capacity given at construction
    original_capacity: usize,

    /// Current partner(s)
    state: MatchState,
}

impl Player {
    /// Create a single-match player with no preferences yet
    ///
    /// # Example
    ///
    /// ```
    /// use matching_games::Player;
    ///
    /// let player = Player::new("A");
    /// assert_eq!(player.name(), "A");
    /// assert!(player.matches().is_empty());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, PlayerKind::Single, 0)
    }

    /// Create a capacitated host, such as a hospital
    pub fn host(name: impl Into<String>, capacity: usize) -> Self {
        Self::with_kind(name, PlayerKind::Host, capacity)
    }

    /// Create a project run by `supervisor`
    pub fn project(name: impl Into<String>, capacity: usize, supervisor: PlayerKey) -> Self {
        Self::with_kind(name, PlayerKind::Project { supervisor }, capacity)
    }

    /// Create a supervisor; its projects are linked afterwards
    pub fn supervisor(name: impl Into<String>, capacity: usize) -> Self {
        let kind = PlayerKind::Supervisor {
            projects: Vec::new(),
        };
        Self::with_kind(name, kind, capacity)
    }

    fn with_kind(name: impl Into<String>, kind: PlayerKind, capacity: usize) -> Self {
        let state = if kind.is_capacitated() {
            MatchState::Many(Vec::new())
        } else {
            MatchState::Single(None)
        };

        Self {
            name: name.into(),
            kind,
            preferences: Vec::new(),
            original_preferences: None,
            ranks: HashMap::new(),
            capacity,
            original_capacity: capacity,
            state,
        }
    }

    // ========================================================================
    // Identity and Shape
    // ========================================================================

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &PlayerKind {
        &self.kind
    }

    /// The supervisor of a project
    pub fn supervisor_key(&self) -> Option<PlayerKey> {
        match self.kind {
            PlayerKind::Project { supervisor } => Some(supervisor),
            _ => None,
        }
    }

    /// The projects of a supervisor; empty for every other kind
    pub fn projects(&self) -> &[PlayerKey] {
        match &self.kind {
            PlayerKind::Supervisor { projects } => projects,
            _ => &[],
        }
    }

    /// Attach a project to a supervisor. No-op for other kinds.
    pub(crate) fn link_project(&mut self, project: PlayerKey) {
        if let PlayerKind::Supervisor { projects } = &mut self.kind {
            projects.push(project);
        }
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    /// Set the working preference list.
    ///
    /// The first call freezes the original ranking; later calls only replace
    /// the working list. A player listed twice keeps its first rank and only
    /// its first entry in the working list.
    pub fn set_preferences(&mut self, preferences: Vec<PlayerKey>) {
        if self.original_preferences.is_none() {
            self.ranks = HashMap::with_capacity(preferences.len());
            for (rank, &other) in preferences.iter().enumerate() {
                self.ranks.entry(other).or_insert(rank);
            }
            self.original_preferences = Some(preferences.clone());
        }
        self.preferences = first_occurrences(&preferences);
    }

    /// Working preference list
    #[inline]
    pub fn preferences(&self) -> &[PlayerKey] {
        &self.preferences
    }

    /// Preference list as first set, untouched by pruning
    #[inline]
    pub fn original_preferences(&self) -> &[PlayerKey] {
        self.original_preferences.as_deref().unwrap_or(&[])
    }

    /// Position of `other` in the original ranking
    #[inline]
    pub fn rank_of(&self, other: PlayerKey) -> Option<usize> {
        self.ranks.get(&other).copied()
    }

    /// Whether `other` is still on the working list
    #[inline]
    pub fn is_acceptable(&self, other: PlayerKey) -> bool {
        self.preferences.contains(&other)
    }

    /// Whether `a` is ranked strictly above `b` originally.
    ///
    /// An unranked `a` is never preferred; an unranked `b` loses to any
    /// ranked `a`.
    pub fn prefers(&self, a: PlayerKey, b: PlayerKey) -> bool {
        match (self.rank_of(a), self.rank_of(b)) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Whether `other` would be an improvement on the current partner.
    ///
    /// Being unmatched counts as worse than any ranked player.
    pub fn prefers_to_partner(&self, other: PlayerKey) -> bool {
        match self.partner() {
            Some(partner) => self.prefers(other, partner),
            None => self.rank_of(other).is_some(),
        }
    }

    /// Remove `other` from the working list. Returns whether it was there.
    pub fn forget(&mut self, other: PlayerKey) -> bool {
        let before = self.preferences.len();
        self.preferences.retain(|&p| p != other);
        self.preferences.len() != before
    }

    /// Most preferred player on the working list that is not already matched.
    pub fn favourite(&self) -> Option<PlayerKey> {
        let matches = self.matches();
        self.preferences.iter().copied().find(|p| !matches.contains(p))
    }

    /// Working-list entries ranked below the worst current match.
    ///
    /// With no match every entry is a successor.
    pub fn successors(&self) -> &[PlayerKey] {
        match self.worst_match() {
            None => &self.preferences,
            Some(worst) => match self.preferences.iter().position(|&p| p == worst) {
                Some(idx) => &self.preferences[idx + 1..],
                None => &[],
            },
        }
    }

    /// Restore the working list from the original ranking
    pub(crate) fn restore_preferences(&mut self) {
        if let Some(original) = &self.original_preferences {
            self.preferences = first_occurrences(original);
        }
        self.capacity = self.original_capacity;
    }

    // ========================================================================
    // Capacity
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn original_capacity(&self) -> usize {
        self.original_capacity
    }

    /// Holding as many matches as the capacity allows (or more)
    #[inline]
    pub fn is_full(&self) -> bool {
        self.matches().len() >= self.capacity
    }

    /// Holding more matches than the capacity allows
    #[inline]
    pub fn is_over_subscribed(&self) -> bool {
        self.matches().len() > self.capacity
    }

    /// Holding fewer matches than the capacity allows
    #[inline]
    pub fn is_under_subscribed(&self) -> bool {
        self.matches().len() < self.capacity
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Current match state
    #[inline]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current partners as a slice: zero or one entries for single players.
    pub fn matches(&self) -> &[PlayerKey] {
        match &self.state {
            MatchState::Single(Some(partner)) => std::slice::from_ref(partner),
            MatchState::Single(None) => &[],
            MatchState::Many(matches) => matches,
        }
    }

    /// The partner of a single player. Always `None` for capacitated players.
    pub fn partner(&self) -> Option<PlayerKey> {
        match self.state {
            MatchState::Single(partner) => partner,
            MatchState::Many(_) => None,
        }
    }

    /// Least preferred current match
    pub fn worst_match(&self) -> Option<PlayerKey> {
        self.matches().last().copied()
    }

    /// Whether `other` is currently matched to this player
    #[inline]
    pub fn is_matched_to(&self, other: PlayerKey) -> bool {
        self.matches().contains(&other)
    }

    /// Record `other` as a partner.
    ///
    /// Single players overwrite their partner. Capacitated players append
    /// and re-sort by original rank, unranked partners last.
    pub fn record_match(&mut self, other: PlayerKey) {
        let ranks = &self.ranks;
        match &mut self.state {
            MatchState::Single(partner) => *partner = Some(other),
            MatchState::Many(matches) => {
                if !matches.contains(&other) {
                    matches.push(other);
                    matches.sort_by_key(|p| ranks.get(p).copied().unwrap_or(usize::MAX));
                }
            }
        }
    }

    /// Remove `other` from the partners.
    pub fn record_unmatch(&mut self, other: PlayerKey) {
        match &mut self.state {
            MatchState::Single(partner) => {
                if *partner == Some(other) {
                    *partner = None;
                }
            }
            MatchState::Many(matches) => matches.retain(|&p| p != other),
        }
    }

    /// Drop every partner
    pub fn clear_matching(&mut self) {
        match &mut self.state {
            MatchState::Single(partner) => *partner = None,
            MatchState::Many(matches) => matches.clear(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

/// `list` without repeats, in order of first appearance.
fn first_occurrences(list: &[PlayerKey]) -> Vec<PlayerKey> {
    let mut seen = HashSet::with_capacity(list.len());
    list.iter().copied().filter(|&other| seen.insert(other)).collect()
}
