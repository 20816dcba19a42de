//! Heuristic discovery of well-known survey columns.
//!
//! Survey exports name their columns after the question text ("Qual o seu
//! município de residência?"), so columns are found by case-insensitive
//! substring match against ordered candidate lists. Earlier candidates take
//! precedence over later ones; within a candidate, the first column in file
//! order wins.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use survey_insights_dataset_models::{CellValue, Dataset};
use survey_insights_normalize::abbreviate_course;

/// Column name fragment that marks a course column.
pub const COURSE_MARKER: &str = "curso";

/// Role a column plays in the survey.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColumnRole {
    /// Respondent's city of residence.
    Location,
    /// Course the respondent is enrolled in.
    Course,
    /// Gender identity.
    Gender,
    /// Age or age bracket.
    Age,
    /// Race/color.
    Race,
    /// How the respondent heard about the institution.
    Referral,
    /// Employment status.
    Employment,
    /// Income bracket.
    Income,
}

impl ColumnRole {
    /// Lower-cased name fragments identifying this role, in priority order.
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Location => &[
                "município de residência",
                "município",
                "municipio",
                "cidade",
                "residência",
            ],
            Self::Course => &[COURSE_MARKER],
            Self::Gender => &["gênero", "genero", "identifica"],
            Self::Age => &["faixa etária", "idade"],
            Self::Race => &["cor", "raça"],
            Self::Referral => &["divulgação", "conheceu"],
            Self::Employment => &["trabalhando", "trabalha"],
            Self::Income => &["renda"],
        }
    }
}

/// Finds the column playing `role`, if any.
#[must_use]
pub fn find_column(columns: &[String], role: ColumnRole) -> Option<&str> {
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

    let found = role.candidates().iter().find_map(|candidate| {
        lowered
            .iter()
            .position(|name| name.contains(candidate))
            .map(|idx| columns[idx].as_str())
    });

    log::debug!("find_column: {role} -> {found:?}");

    found
}

/// Returns `true` if the column holds course names and should be
/// abbreviated.
#[must_use]
pub fn is_course_column(column: &str) -> bool {
    column.to_lowercase().contains(COURSE_MARKER)
}

/// Returns a copy of the dataset with the course names in `column`
/// abbreviated. Missing and numeric values pass through unchanged.
#[must_use]
pub fn abbreviate_courses(dataset: &Dataset, column: &str) -> Dataset {
    let Some(idx) = dataset.column_index(column) else {
        return dataset.clone();
    };

    dataset.map_column(idx, |value| match value {
        CellValue::Text(raw) => CellValue::Text(abbreviate_course(raw)),
        other => other.clone(),
    })
}
