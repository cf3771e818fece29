//! Game orchestrators.
//!
//! ## Lifecycle
//!
//! ```text
//! create_from_dictionaries   name tables -> checks -> arena
//!          |
//!        solve               reset arena -> engine -> result container
//!          |
//! check_validity / check_stability
//! ```
//!
//! Every game owns its [`Arena`] and one [`Party`] per side. Solving resets
//! the arena first, so a game can be solved any number of times and for
//! either optimal role. Structural warnings raised at construction stay
//! available through `diagnostics()`; a roommates solve appends its
//! no-stable-matching report there too.
//!
//! ## Validity
//!
//! A matching is valid when every partner is on the holder's working
//! preference list and no capacitated player holds more than its capacity.
//! Every violation is collected into one [`InvalidMatching`].

mod input;
mod marriage;
mod hospital;
mod allocation;
mod roommates;

pub use marriage::StableMarriage;
pub use hospital::HospitalResident;
pub use allocation::StudentAllocation;
pub use roommates::StableRoommates;

use crate::error::{InvalidMatching, MatchingIssue};
use crate::players::{Arena, Party, Player, PlayerKey};

/// Blocking pairs as `(name, name)`, in discovery order.
pub type BlockingPairs = Vec<(String, String)>;

/// Insert `player` into `arena` and register it with `party`.
pub(crate) fn enrol(arena: &mut Arena, party: &mut Party, player: Player) -> PlayerKey {
    let name = player.name().to_string();
    let key = arena.insert(player);
    party.insert(&name, key);
    key
}

/// Resolve names already checked against `party`.
pub(crate) fn resolve(party: &Party, names: &[String]) -> Vec<PlayerKey> {
    names.iter().filter_map(|name| party.get(name)).collect()
}

/// Collect every validity issue of the players in `parties`.
pub(crate) fn validate(arena: &Arena, parties: &[&Party]) -> Result<(), InvalidMatching> {
    let mut issues = Vec::new();

    for party in parties {
        for &key in party.keys() {
            let player = &arena[key];
            for &partner in player.matches() {
                if !player.is_acceptable(partner) {
                    issues.push(MatchingIssue::NotAcceptable {
                        player: player.name().to_string(),
                        partner: arena.name(partner).to_string(),
                        preferences: arena.names(player.preferences()),
                    });
                }
            }
            if player.kind().is_capacitated() && player.is_over_subscribed() {
                issues.push(MatchingIssue::OverCapacity {
                    player: player.name().to_string(),
                    capacity: player.capacity(),
                    matching: arena.names(player.matches()),
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(InvalidMatching { issues })
    }
}

/// Whether `host` would take `single` in its current state: it has room,
/// or it ranks `single` above its worst match.
pub(crate) fn host_would_take(arena: &Arena, host: PlayerKey, single: PlayerKey) -> bool {
    let player = &arena[host];
    if player.rank_of(single).is_none() {
        return false;
    }
    if player.is_under_subscribed() {
        return true;
    }
    player
        .worst_match()
        .is_some_and(|worst| player.prefers(single, worst))
}

/// Whether `single` would leave its partner (or no partner) for `host`.
pub(crate) fn single_would_leave(arena: &Arena, single: PlayerKey, host: PlayerKey) -> bool {
    let player = &arena[single];
    !player.is_matched_to(host) && player.prefers_to_partner(host)
}

/// Replace a host's matches with `members`, moving each member off its
/// previous host.
pub(crate) fn reassign(arena: &mut Arena, host: PlayerKey, members: &[PlayerKey]) {
    for previous in arena[host].matches().to_vec() {
        arena.unmatch_pair(previous, host);
    }
    for &member in members {
        if let Some(old) = arena[member].partner() {
            arena.unmatch_pair(member, old);
        }
        arena.match_pair(member, host);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
