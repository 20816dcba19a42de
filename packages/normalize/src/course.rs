//! Course name abbreviation.
//!
//! Maps the many spellings of each offered course to a short chart label.
//! Anything not in the table keeps its (trimmed) original spelling.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::contains_either;

/// Short display label for a known course.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CourseAbbreviation {
    /// Análise e Desenvolvimento de Sistemas
    #[strum(serialize = "ADS")]
    #[serde(rename = "ADS")]
    Ads,
    /// Gestão Pública / Administração
    #[strum(serialize = "ADM")]
    #[serde(rename = "ADM")]
    Adm,
    /// Gestão de Recursos Humanos
    #[strum(serialize = "GRH")]
    #[serde(rename = "GRH")]
    Grh,
    /// Licenciatura em Pedagogia
    #[strum(serialize = "Pedagogia")]
    #[serde(rename = "Pedagogia")]
    Pedagogia,
}

/// Lower-cased course phrases and their abbreviation, in match order.
pub const COURSE_PATTERNS: &[(&str, CourseAbbreviation)] = &[
    // ── Análise e Desenvolvimento de Sistemas ──────────────────────
    (
        "tecnólogo em análise e desenvolvimento de sistemas",
        CourseAbbreviation::Ads,
    ),
    ("análise e desenvolvimento de sistemas", CourseAbbreviation::Ads),
    ("ads", CourseAbbreviation::Ads),
    ("análise e desenvolvimento", CourseAbbreviation::Ads),
    ("analise e desenvolvimento de sistemas", CourseAbbreviation::Ads),
    // ── Administração / Gestão Pública ─────────────────────────────
    ("tecnólogo em gestão pública", CourseAbbreviation::Adm),
    ("gestão pública", CourseAbbreviation::Adm),
    ("administração", CourseAbbreviation::Adm),
    ("adm", CourseAbbreviation::Adm),
    ("gestao publica", CourseAbbreviation::Adm),
    // ── Gestão de Recursos Humanos ─────────────────────────────────
    (
        "tecnólogo em gestão de recursos humanos",
        CourseAbbreviation::Grh,
    ),
    ("gestão de recursos humanos", CourseAbbreviation::Grh),
    ("grh", CourseAbbreviation::Grh),
    ("gestao de recursos humanos", CourseAbbreviation::Grh),
    ("recursos humanos", CourseAbbreviation::Grh),
    // ── Pedagogia ──────────────────────────────────────────────────
    ("licenciatura em pedagogia", CourseAbbreviation::Pedagogia),
    ("pedagogia", CourseAbbreviation::Pedagogia),
];

/// Finds the abbreviation for a raw course name, if any table entry matches.
#[must_use]
pub fn match_course(raw: &str) -> Option<CourseAbbreviation> {
    let lower = raw.trim().to_lowercase();

    COURSE_PATTERNS
        .iter()
        .find(|(pattern, _)| contains_either(&lower, pattern))
        .map(|(_, abbreviation)| *abbreviation)
}

/// Abbreviates a raw course name for display.
///
/// Returns the abbreviation of the first matching table entry, or the
/// trimmed input unchanged when nothing matches.
#[must_use]
pub fn abbreviate_course(raw: &str) -> String {
    match_course(raw).map_or_else(|| raw.trim().to_string(), |a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_full_names() {
        assert_eq!(
            abbreviate_course("Tecnólogo em Análise e Desenvolvimento de Sistemas"),
            "ADS"
        );
        assert_eq!(abbreviate_course("Tecnólogo em Gestão Pública"), "ADM");
        assert_eq!(abbreviate_course("Administração"), "ADM");
        assert_eq!(
            abbreviate_course("Tecnólogo em Gestão de Recursos Humanos"),
            "GRH"
        );
        assert_eq!(abbreviate_course("Licenciatura em Pedagogia"), "Pedagogia");
    }

    #[test]
    fn matches_unaccented_spellings() {
        assert_eq!(
            abbreviate_course("analise e desenvolvimento de sistemas"),
            "ADS"
        );
        assert_eq!(abbreviate_course("GESTAO PUBLICA"), "ADM");
    }

    #[test]
    fn matches_input_contained_in_pattern() {
        assert_eq!(abbreviate_course("recursos"), "GRH");
        assert_eq!(abbreviate_course("  Pedagogia  "), "Pedagogia");
    }

    #[test]
    fn unknown_course_is_trimmed_but_kept() {
        assert_eq!(abbreviate_course("  Engenharia Civil "), "Engenharia Civil");
        assert_eq!(match_course("Engenharia Civil"), None);
    }

    #[test]
    fn blank_course_is_not_matched() {
        assert_eq!(match_course("   "), None);
        assert_eq!(abbreviate_course("   "), "");
    }

    #[test]
    fn canonical_labels_are_fixed_points() {
        for label in ["ADS", "ADM", "GRH", "Pedagogia"] {
            assert_eq!(abbreviate_course(label), label);
        }

        for raw in [
            "Tecnólogo em Análise e Desenvolvimento de Sistemas",
            "gestão de recursos humanos",
            "Engenharia Civil",
        ] {
            let once = abbreviate_course(raw);
            assert_eq!(abbreviate_course(&once), once);
        }
    }

    #[test]
    fn first_table_entry_wins() {
        // "ads" precedes "adm", and both appear inside this phrase.
        assert_eq!(match_course("ads adm"), Some(CourseAbbreviation::Ads));
    }

    #[test]
    fn parses_display_labels() {
        assert_eq!(
            "GRH".parse::<CourseAbbreviation>().unwrap(),
            CourseAbbreviation::Grh
        );
        assert_eq!(CourseAbbreviation::Pedagogia.as_ref(), "Pedagogia");
    }
}
