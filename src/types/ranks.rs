//! Rank matrix conversion.
//!
//! ## Overview
//!
//! Games consume preference lists, but instances often arrive as utility
//! matrices (players x candidates, higher is better) or as named lists that
//! need to be compared numerically. Both convert to a zero-based rank
//! matrix: rank `0` is the most preferred candidate.
//!
//! ## Why Fixed-Point?
//!
//! Utilities are `rust_decimal::Decimal`. Floating-point ties depend on how
//! a value was computed; decimal ties are exact, so the stable tie-break
//! below gives the same ranks everywhere.
//!
//! ## Examples
//!
//! ```
//! use matching_games::types::ranks::{preferences_to_ranks, utility_to_ranks};
//! use rust_decimal::Decimal;
//!
//! let utilities = vec![vec![Decimal::new(5, 1), Decimal::new(9, 1), Decimal::new(5, 1)]];
//! assert_eq!(utility_to_ranks(&utilities), vec![vec![1, 0, 2]]);
//!
//! let preferences = [("A", vec!["Y", "X"])];
//! assert_eq!(preferences_to_ranks(&preferences, &["X", "Y", "Z"]), vec![vec![1, 0, 3]]);
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a utility matrix into a rank matrix.
///
/// Each row is ranked independently: the highest utility gets rank `0`.
/// Equal utilities keep their column order (stable sort), so the earlier
/// candidate gets the better rank.
///
/// # Example
///
/// ```
/// use matching_games::types::ranks::utility_to_ranks;
/// use rust_decimal::Decimal;
///
/// let row = vec![Decimal::from(1), Decimal::from(3), Decimal::from(2)];
/// assert_eq!(utility_to_ranks(&[row]), vec![vec![2, 0, 1]]);
/// ```
pub fn utility_to_ranks(utilities: &[Vec<Decimal>]) -> Vec<Vec<usize>> {
    utilities
        .iter()
        .map(|row| {
            let mut order: Vec<usize> = (0..row.len()).collect();
            order.sort_by(|&a, &b| row[b].cmp(&row[a]));

            let mut ranks = vec![0; row.len()];
            for (rank, column) in order.into_iter().enumerate() {
                ranks[column] = rank;
            }
            ranks
        })
        .collect()
}

/// Convert named preference lists into a rank matrix.
///
/// Rows follow the order of `preferences`, columns the order of
/// `candidates`. A candidate missing from a list gets the sentinel rank
/// `candidates.len()`. If a list names a candidate twice, the first
/// occurrence counts.
pub fn preferences_to_ranks<N, C>(preferences: &[(N, Vec<C>)], candidates: &[C]) -> Vec<Vec<usize>>
where
    C: AsRef<str>,
{
    let unranked = candidates.len();

    preferences
        .iter()
        .map(|(_, ranking)| {
            candidates
                .iter()
                .map(|candidate| {
                    ranking
                        .iter()
                        .position(|entry| entry.as_ref() == candidate.as_ref())
                        .unwrap_or(unranked)
                })
                .collect()
        })
        .collect()
}

/// Parse a row of decimal strings into utilities.
///
/// # Returns
///
/// * `Some(Vec<Decimal>)` - Every entry parsed
/// * `None` - Some entry is not a decimal number
///
/// # Example
///
/// ```
/// use matching_games::types::ranks::{parse_utilities, utility_to_ranks};
///
/// let row = parse_utilities(&["0.25", "0.75", "0.5"]).unwrap();
/// assert_eq!(utility_to_ranks(&[row]), vec![vec![2, 0, 1]]);
/// assert!(parse_utilities(&["high"]).is_none());
/// ```
pub fn parse_utilities(row: &[&str]) -> Option<Vec<Decimal>> {
    row.iter().map(|value| Decimal::from_str(value).ok()).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
