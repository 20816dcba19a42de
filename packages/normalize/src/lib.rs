#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical labels for free-text survey answers.
//!
//! Respondents type course and city names by hand, so the same answer shows
//! up as "Tecnólogo em Análise e Desenvolvimento de Sistemas", "ADS" or
//! "análise e desenvolvimento". These lookups fold such variants into one
//! display label (and, for municipalities, a map position).
//!
//! Both lookups use ordered pattern tables. Matching is case-insensitive
//! substring containment in either direction, and the first table entry that
//! matches wins, so table order is part of the behavior.

pub mod course;
pub mod municipality;

pub use course::{CourseAbbreviation, abbreviate_course, match_course};
pub use municipality::{HOME_MUNICIPALITY, Municipality, ResolvedMunicipality, resolve_municipality};

/// Returns `true` if either lower-cased string contains the other.
///
/// An empty `input` never matches; every pattern would trivially contain it.
fn contains_either(input: &str, pattern: &str) -> bool {
    !input.is_empty() && (input.contains(pattern) || pattern.contains(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_bidirectional() {
        assert!(contains_either("licenciatura em pedagogia", "pedagogia"));
        assert!(contains_either("santo amaro", "santo amaro da imperatriz"));
        assert!(!contains_either("engenharia", "pedagogia"));
    }

    #[test]
    fn empty_input_never_matches() {
        assert!(!contains_either("", "pedagogia"));
    }
}
