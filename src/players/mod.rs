//! Player model for matching games.
//!
//! ## Architecture
//!
//! Players live in an arena and refer to each other by key:
//!
//! - **Slab-based storage**: O(1) insertion and lookup, stable keys
//! - **Frozen rankings**: each player keeps the preferences it started with
//! - **Pairing primitives**: match, unmatch and delete act on both players
//!
//! ## Components
//!
//! - [`Player`]: Name, kind, preferences, capacity and match state
//! - [`Arena`]: Slab of players plus the pairing primitives
//! - [`Party`]: One side of a game with a name index
//!
//! ## Example
//!
//! ```
//! use matching_games::{Arena, Player};
//!
//! let mut arena = Arena::new();
//! let suitor = arena.insert(Player::new("A"));
//! let reviewer = arena.insert(Player::new("X"));
//! arena.set_preferences(suitor, vec![reviewer]);
//! arena.set_preferences(reviewer, vec![suitor]);
//!
//! arena.match_pair(suitor, reviewer);
//! assert_eq!(arena[reviewer].partner(), Some(suitor));
//! ```

pub mod player;
pub mod arena;
pub mod party;

pub use player::{MatchState, Player, PlayerKey, PlayerKind};
pub use arena::Arena;
pub use party::Party;
