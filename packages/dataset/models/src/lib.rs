#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular survey dataset types.
//!
//! A [`Dataset`] is an immutable, row-ordered table of [`CellValue`]s with a
//! stable list of column names. Uploaded survey exports have one row per
//! respondent. Every transformation (filtering, segmentation, label
//! normalization) produces a new [`Dataset`] and never mutates its source.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Label used wherever a missing value is counted as its own category.
pub const MISSING_LABEL: &str = "N/A";

/// Raw tokens that are read as a missing value when a dataset is loaded.
///
/// Matches the tokens survey spreadsheet exports commonly emit for blank
/// answers. An empty (or whitespace-only) cell is always missing.
pub const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// A single scalar value in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No answer.
    Missing,
    /// Numeric answer (only produced for columns whose every non-missing
    /// value parses as a number).
    Number(f64),
    /// Free-text or categorical answer.
    Text(String),
}

impl CellValue {
    /// Reads a raw cell from a file, mapping blank cells and
    /// [`MISSING_TOKENS`] to [`CellValue::Missing`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
            Self::Missing
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// Returns `true` if the value is [`CellValue::Missing`].
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// String-coerces the value. Missing values have no string form.
    ///
    /// Numbers use the shortest round-trip representation, so `1.0`
    /// becomes `"1"` and `2.5` stays `"2.5"`.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Missing => None,
            Self::Number(n) => Some(Cow::Owned(format!("{n}"))),
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    /// String-coerces the value, substituting [`MISSING_LABEL`] for missing
    /// values.
    #[must_use]
    pub fn label(&self) -> Cow<'_, str> {
        self.as_text().unwrap_or(Cow::Borrowed(MISSING_LABEL))
    }

    /// Returns the numeric value, parsing text when possible.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Missing => None,
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Inferred kind of a column.
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
pub enum ColumnKind {
    /// Every non-missing value parses as a number.
    Numeric,
    /// At least one non-missing value is free text.
    Categorical,
}

/// An immutable, named table of survey answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Builds a dataset from already-typed rows.
    ///
    /// Rows shorter than the header are padded with [`CellValue::Missing`];
    /// longer rows are truncated to the header width.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Builds a dataset from raw text cells, inferring missing values and
    /// numeric columns.
    ///
    /// A column is numeric when every non-missing cell parses as a number;
    /// its cells are then stored as [`CellValue::Number`].
    #[must_use]
    pub fn from_raw(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows: Vec<Vec<CellValue>> = rows
            .iter()
            .map(|row| row.iter().map(|raw| CellValue::from_raw(raw)).collect())
            .collect();

        let mut dataset = Self::new(name, columns, rows);

        for idx in 0..dataset.columns.len() {
            if dataset.column_kind(idx) == ColumnKind::Numeric {
                for row in &mut dataset.rows {
                    if let CellValue::Text(s) = &row[idx]
                        && let Ok(n) = s.trim().parse::<f64>()
                    {
                        row[idx] = CellValue::Number(n);
                    }
                }
            }
        }

        dataset
    }

    /// Dataset name (the name it was loaded under).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in file order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with exactly this name.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Returns `true` if a column with exactly this name exists.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Iterates the values of the column at `idx`, in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Infers the kind of the column at `idx`.
    ///
    /// A column with no non-missing values is numeric.
    #[must_use]
    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        let all_numeric = self
            .column_values(idx)
            .filter(|v| !v.is_missing())
            .all(|v| v.as_number().is_some());

        if all_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Returns a new dataset containing only the rows matching `predicate`.
    #[must_use]
    pub fn filter_rows(&self, mut predicate: impl FnMut(&[CellValue]) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Returns a new dataset with `f` applied to every value of the column at
    /// `idx`.
    #[must_use]
    pub fn map_column(&self, idx: usize, mut f: impl FnMut(&CellValue) -> CellValue) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[idx] = f(&row[idx]);
                row
            })
            .collect();

        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn reads_missing_tokens() {
        assert!(CellValue::from_raw("").is_missing());
        assert!(CellValue::from_raw("   ").is_missing());
        assert!(CellValue::from_raw("N/A").is_missing());
        assert!(CellValue::from_raw("NaN").is_missing());
        assert_eq!(CellValue::from_raw("Palhoça"), CellValue::from("Palhoça"));
    }

    #[test]
    fn infers_numeric_columns() {
        let ds = Dataset::from_raw(
            "survey.csv",
            raw(&["idade", "curso"]),
            vec![raw(&["21", "ADS"]), raw(&["", "GRH"]), raw(&["30.5", "42"])],
        );

        assert_eq!(ds.column_kind(0), ColumnKind::Numeric);
        assert_eq!(ds.column_kind(1), ColumnKind::Categorical);
        assert_eq!(ds.rows()[0][0], CellValue::Number(21.0));
        assert!(ds.rows()[1][0].is_missing());
        assert_eq!(ds.rows()[2][1], CellValue::from("42"));
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let ds = Dataset::from_raw("a.csv", raw(&["x"]), vec![raw(&[""]), raw(&["NA"])]);
        assert_eq!(ds.column_kind(0), ColumnKind::Numeric);
    }

    #[test]
    fn coerces_numbers_to_short_text() {
        assert_eq!(CellValue::Number(1.0).as_text().unwrap(), "1");
        assert_eq!(CellValue::Number(2.5).as_text().unwrap(), "2.5");
        assert_eq!(CellValue::Missing.label(), MISSING_LABEL);
        assert!(CellValue::Missing.as_text().is_none());
    }

    #[test]
    fn pads_short_rows() {
        let ds = Dataset::new(
            "a.csv",
            raw(&["a", "b"]),
            vec![vec![CellValue::from("x")]],
        );
        assert_eq!(ds.rows()[0].len(), 2);
        assert!(ds.rows()[0][1].is_missing());
    }

    #[test]
    fn filter_rows_leaves_source_untouched() {
        let ds = Dataset::from_raw(
            "a.csv",
            raw(&["cidade"]),
            vec![raw(&["Palhoça"]), raw(&["Florianópolis"])],
        );
        let filtered = ds.filter_rows(|row| row[0] == CellValue::from("Palhoça"));

        assert_eq!(filtered.row_count(), 1);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(filtered.name(), "a.csv");
    }

    #[test]
    fn serializes_missing_as_null() {
        let json = serde_json::to_string(&vec![
            CellValue::Missing,
            CellValue::Number(3.0),
            CellValue::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3.0,"x"]"#);
    }
}
