//! Optimal role selection.
//!
//! Every two-sided game can be solved in favour of either party. The role
//! is named by an [`Optimal`] value, usually parsed from a string:
//!
//! ```
//! use matching_games::Optimal;
//!
//! let optimal: Optimal = "resident".parse().unwrap();
//! assert_eq!(optimal, Optimal::Resident);
//! assert!("referee".parse::<Optimal>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// The party whose optimal stable matching a solve should find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optimal {
    /// Stable marriage: proposing side
    Suitor,
    /// Stable marriage: receiving side
    Reviewer,
    /// Hospital/resident: residents propose
    Resident,
    /// Hospital/resident: hospitals propose
    Hospital,
    /// Student allocation: students propose
    Student,
    /// Student allocation: supervisors propose
    Supervisor,
}

impl Optimal {
    /// Lowercase role name as accepted by [`FromStr`]
    pub fn as_str(self) -> &'static str {
        match self {
            Optimal::Suitor => "suitor",
            Optimal::Reviewer => "reviewer",
            Optimal::Resident => "resident",
            Optimal::Hospital => "hospital",
            Optimal::Student => "student",
            Optimal::Supervisor => "supervisor",
        }
    }

    /// Check that `self` is one of `expected`, naming `game` otherwise.
    pub(crate) fn expect_one_of(
        self,
        game: &'static str,
        expected: &'static [Optimal],
    ) -> Result<Self, GameError> {
        if expected.contains(&self) {
            Ok(self)
        } else {
            Err(GameError::InvalidOptimal {
                game,
                optimal: self,
                expected,
            })
        }
    }
}

impl fmt::Display for Optimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Optimal {
    type Err = GameError;

    /// Parse a role name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suitor" => Ok(Optimal::Suitor),
            "reviewer" => Ok(Optimal::Reviewer),
            "resident" => Ok(Optimal::Resident),
            "hospital" => Ok(Optimal::Hospital),
            "student" => Ok(Optimal::Student),
            "supervisor" => Ok(Optimal::Supervisor),
            _ => Err(GameError::UnknownOptimal(s.to_string())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_roundtrip_names() {
        for optimal in [
            Optimal::Suitor,
            Optimal::Reviewer,
            Optimal::Resident,
            Optimal::Hospital,
            Optimal::Student,
            Optimal::Supervisor,
        ] {
            assert_eq!(optimal.as_str().parse::<Optimal>(), Ok(optimal));
        }
    }

    #[test]
    fn test_optimal_parse_ignores_case() {
        assert_eq!("Hospital".parse::<Optimal>(), Ok(Optimal::Hospital));
        assert_eq!("SUITOR".parse::<Optimal>(), Ok(Optimal::Suitor));
    }

    #[test]
    fn test_optimal_parse_unknown() {
        assert_eq!(
            "dean".parse::<Optimal>(),
            Err(GameError::UnknownOptimal("dean".to_string()))
        );
    }

    #[test]
    fn test_expect_one_of() {
        const ROLES: &[Optimal] = &[Optimal::Suitor, Optimal::Reviewer];

        assert_eq!(Optimal::Suitor.expect_one_of("stable marriage", ROLES), Ok(Optimal::Suitor));

        let error = Optimal::Hospital.expect_one_of("stable marriage", ROLES).unwrap_err();
        assert_eq!(
            error.to_string(),
            "stable marriage cannot be solved hospital-optimally, expected one of [Suitor, Reviewer]"
        );
    }
}
