//! Core value types for matching games.
//!
//! ## Types
//!
//! - [`Optimal`]: The party a solve should favour
//! - [`Diagnostic`]: A recoverable structural warning about an instance
//!
//! ## Rank Conversion
//!
//! [`ranks`] turns utility matrices and named preference lists into
//! zero-based rank matrices. Utilities are fixed-point `Decimal`s so ties are
//! exact and results are identical on every machine.

mod optimal;
mod diagnostic;
pub mod ranks;

// Re-export all types at module level
pub use optimal::Optimal;
pub use diagnostic::Diagnostic;
