//! Read-side result containers.
//!
//! A solve produces one of two shapes:
//!
//! - [`SingleMatching`]: each key holds at most one partner (marriage,
//!   roommates)
//! - [`MultipleMatching`]: each key holds an ordered list of members
//!   (hospitals, projects)
//!
//! Both are keyed by player name in a `BTreeMap`, so iteration order and
//! the SHA-256 [`digest`](SingleMatching::digest) are independent of the
//! order players were created or popped in. Containers are rebuilt from
//! the arena by the owning game; mutation goes through the game so that
//! both sides' match state stay in step.

mod single;
mod multiple;

pub use single::SingleMatching;
pub use multiple::MultipleMatching;

use sha2::{Digest, Sha256};

/// Hash `(key, members)` entries in a length-prefixed canonical encoding.
///
/// Entries must already be in key order.
pub(crate) fn fingerprint<'a, I, M>(entries: I) -> [u8; 32]
where
    I: IntoIterator<Item = (&'a str, M)>,
    M: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();

    for (key, members) in entries {
        write_field(&mut hasher, key);
        let members: Vec<&str> = members.into_iter().collect();
        hasher.update((members.len() as u64).to_le_bytes());
        for member in members {
            write_field(&mut hasher, member);
        }
    }

    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

fn write_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

// ============================================================================
// Unit Tests
// ============================================================================
