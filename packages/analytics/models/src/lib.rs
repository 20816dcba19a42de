#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parameter and result types for the survey analytics operations.
//!
//! Every engine operation takes one of the `*Params` types and returns one of
//! the result types below. They are plain serde structures so any caller (the
//! REST server, the CLI, a charting front end) can consume them without
//! depending on the engine's internals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column filters: column name to the accepted raw (string-coerced) values.
pub type FilterSet = BTreeMap<String, Vec<String>>;

/// How missing values are treated when counting categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Count missing values under the `"N/A"` category.
    #[default]
    AsCategory,
    /// Leave missing values out of the counts.
    Drop,
}

/// Chart the caller intends to draw.
///
/// Only [`ChartKind::Histogram`] changes the counting (missing values are
/// dropped, as a histogram of raw values would); the rest are categorical
/// bar-style counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Vertical bars per category.
    #[default]
    Bar,
    /// Pie slices per category.
    Pie,
    /// Line through category totals.
    Line,
    /// Histogram of raw values.
    Histogram,
}

impl ChartKind {
    /// Missing-value policy used when counting for this chart.
    #[must_use]
    pub const fn missing_policy(self) -> MissingPolicy {
        match self {
            Self::Histogram => MissingPolicy::Drop,
            Self::Bar | Self::Pie | Self::Line => MissingPolicy::AsCategory,
        }
    }
}

/// Count of rows in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label.
    pub category: String,
    /// Number of rows.
    pub count: u64,
}

/// Category counts for one column of one (sub)dataset.
///
/// Categories are ordered by count descending, ties in order of first
/// appearance. `total` always equals the sum of the counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDistribution {
    /// Column the counts were taken from.
    pub column: String,
    /// Sum of all category counts.
    pub total: u64,
    /// Per-category counts.
    pub categories: Vec<CategoryCount>,
}

impl CategoryDistribution {
    /// Builds a distribution, computing the total from the counts.
    #[must_use]
    pub fn new(column: impl Into<String>, categories: Vec<CategoryCount>) -> Self {
        Self {
            column: column.into(),
            total: categories.iter().map(|c| c.count).sum(),
            categories,
        }
    }

    /// Count for `category`, zero if absent.
    #[must_use]
    pub fn get(&self, category: &str) -> u64 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    /// Returns `true` if no category has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category labels in distribution order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.category.as_str())
    }
}

/// One category of a base-vs-comparator comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    /// Category label.
    pub category: String,
    /// Count in the base dataset.
    pub base_count: u64,
    /// Count in the comparator dataset.
    pub comparator_count: u64,
    /// Percentage change from base to comparator, two decimals.
    pub percent_change: f64,
}

/// Summary of one column, used to drive filter and column pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Whether every non-missing value parses as a number.
    pub is_numeric: bool,
    /// Number of distinct non-missing values.
    pub distinct_count: u64,
    /// Up to ten distinct non-missing values, in first-seen order.
    pub sample_values: Vec<String>,
}

/// Parameters for listing a dataset's columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListColumnsParams {
    /// Dataset name.
    pub filename: String,
}

/// Result of listing a dataset's columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListColumnsResult {
    /// Dataset name.
    pub filename: String,
    /// Number of rows in the dataset.
    pub row_count: u64,
    /// One profile per column, in file order.
    pub columns: Vec<ColumnProfile>,
}

/// Parameters for an explicit distribution query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionParams {
    /// Base dataset name.
    pub filename: String,
    /// Column to count.
    pub column: String,
    /// Chart the caller will draw.
    #[serde(default)]
    pub kind: ChartKind,
    /// Filters applied to both datasets.
    #[serde(default)]
    pub filters: FilterSet,
    /// Optional column to segment by.
    pub group_by: Option<String>,
    /// Optional comparator dataset name.
    pub compare_with: Option<String>,
}

/// Non-fatal conditions reported alongside a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryWarning {
    /// Filtering removed every row of a dataset; its distributions are
    /// empty.
    EmptyResult {
        /// Dataset whose rows were all filtered out.
        dataset: String,
    },
}

/// Result for one segment of a distribution query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResult {
    /// Group label (`"overall"` when not segmented).
    pub group: String,
    /// Human-readable segment title.
    pub title: String,
    /// Counts in the base dataset.
    pub base: CategoryDistribution,
    /// Counts in the comparator dataset, when one was given.
    pub comparator: Option<CategoryDistribution>,
    /// Per-category percentage change, when a comparator was given.
    pub comparison: Option<Vec<ComparisonRow>>,
    /// Change between the two segment totals, when a comparator was given.
    pub total_comparison: Option<ComparisonRow>,
}

/// Result of an explicit distribution query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    /// Base dataset name.
    pub filename: String,
    /// Comparator dataset name.
    pub compare_with: Option<String>,
    /// Counted column.
    pub column: String,
    /// Chart kind the counts were produced for.
    pub kind: ChartKind,
    /// Whether course-name abbreviation was applied to the column.
    pub normalized_courses: bool,
    /// One entry per segment, in group order.
    pub segments: Vec<SegmentResult>,
    /// Non-fatal warnings.
    pub warnings: Vec<QueryWarning>,
}

/// Parameters for a geographic query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographyParams {
    /// Dataset name.
    pub filename: String,
}

/// A location placed on the map with its respondent count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPoint {
    /// Display name (the trimmed raw location).
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Number of respondents.
    pub count: u64,
    /// Canonical municipality matched, `None` when placed at the default.
    pub matched: Option<String>,
}

/// Summary statistics of a geographic aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoStats {
    /// Rows with a non-missing location.
    pub total_count: u64,
    /// Distinct (trimmed) location labels.
    pub distinct_location_count: u64,
    /// Raw label of the most common location (`"N/A"` when empty).
    pub top_location_label: String,
    /// Count of the most common location.
    pub top_location_count: u64,
}

/// Per-location counts with map positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoSummary {
    /// Location column that was aggregated.
    pub column: String,
    /// One point per distinct raw location, most common first.
    pub points: Vec<LocationPoint>,
    /// Summary statistics.
    pub stats: GeoStats,
}

/// Contingency table of two categorical columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossTab {
    /// Column whose values label the rows.
    pub row_column: String,
    /// Column whose values label the columns.
    pub column_column: String,
    /// Sorted row labels.
    pub row_labels: Vec<String>,
    /// Sorted column labels.
    pub column_labels: Vec<String>,
    /// `counts[r][c]` is the number of rows with both labels.
    pub counts: Vec<Vec<u64>>,
}

/// Pairwise Pearson correlation of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    /// Numeric columns, in file order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of columns `i` and `j`; `None`
    /// when undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

/// The fixed analyses of the overview battery.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverviewKind {
    /// Respondents per (abbreviated) course.
    Course,
    /// Respondents per gender.
    Gender,
    /// Respondents per age bracket.
    AgeBracket,
    /// Course by city contingency table.
    CourseByCity,
    /// Respondents per race/color.
    Race,
    /// How respondents heard about the institution.
    ReferralSource,
    /// Employment status.
    Employment,
    /// Income brackets.
    Income,
    /// Correlation between numeric columns.
    Correlation,
    /// Respondents per municipality.
    Geography,
}

impl OverviewKind {
    /// All analyses, in the order they run.
    pub const ALL: &[Self] = &[
        Self::Course,
        Self::Gender,
        Self::AgeBracket,
        Self::CourseByCity,
        Self::Race,
        Self::ReferralSource,
        Self::Employment,
        Self::Income,
        Self::Correlation,
        Self::Geography,
    ];

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Course => "Distribuição por Curso",
            Self::Gender => "Distribuição por Gênero",
            Self::AgeBracket => "Distribuição por Faixa Etária",
            Self::CourseByCity => "Curso vs Cidade",
            Self::Race => "Distribuição por Cor/Raça",
            Self::ReferralSource => "Meio de Divulgação",
            Self::Employment => "Situação de Trabalho",
            Self::Income => "Distribuição por Faixa de Renda",
            Self::Correlation => "Correlação entre Variáveis",
            Self::Geography => "Dados Geográficos",
        }
    }
}

/// Parameters for the overview battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewParams {
    /// Dataset name.
    pub filename: String,
}

/// Payload of one overview analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AnalysisData {
    /// Category counts.
    Distribution(CategoryDistribution),
    /// Contingency table.
    CrossTab(CrossTab),
    /// Correlation matrix.
    Correlation(CorrelationMatrix),
    /// Geographic summary.
    Geography(GeoSummary),
}

/// One produced overview analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewAnalysis {
    /// Which analysis this is.
    pub kind: OverviewKind,
    /// Display title.
    pub title: String,
    /// Result payload.
    pub result: AnalysisData,
}

/// An overview analysis that did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedAnalysis {
    /// Which analysis was skipped.
    pub kind: OverviewKind,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of the overview battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResult {
    /// Dataset name.
    pub filename: String,
    /// Analyses that produced a result, in battery order.
    pub analyses: Vec<OverviewAnalysis>,
    /// Analyses that were skipped, in battery order.
    pub skipped: Vec<SkippedAnalysis>,
}

impl OverviewResult {
    /// Finds a produced analysis by kind.
    #[must_use]
    pub fn analysis(&self, kind: OverviewKind) -> Option<&OverviewAnalysis> {
        self.analyses.iter().find(|a| a.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Vec<CategoryCount> {
        pairs
            .iter()
            .map(|(category, count)| CategoryCount {
                category: (*category).to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn distribution_total_is_sum_of_counts() {
        let dist = CategoryDistribution::new("curso", counts(&[("ADS", 2), ("GRH", 3)]));
        assert_eq!(dist.total, 5);
        assert_eq!(dist.get("GRH"), 3);
        assert_eq!(dist.get("ADM"), 0);
        assert_eq!(dist.labels().collect::<Vec<_>>(), ["ADS", "GRH"]);
    }

    #[test]
    fn chart_kind_parses_and_defaults() {
        assert_eq!("histogram".parse::<ChartKind>().unwrap(), ChartKind::Histogram);
        assert_eq!(ChartKind::default(), ChartKind::Bar);
        assert_eq!(ChartKind::Histogram.missing_policy(), MissingPolicy::Drop);
        assert_eq!(ChartKind::Pie.missing_policy(), MissingPolicy::AsCategory);
    }

    #[test]
    fn distribution_params_accept_minimal_json() {
        let params: DistributionParams =
            serde_json::from_str(r#"{"filename":"a.csv","column":"curso"}"#).unwrap();
        assert_eq!(params.kind, ChartKind::Bar);
        assert!(params.filters.is_empty());
        assert!(params.group_by.is_none());
        assert!(params.compare_with.is_none());
    }

    #[test]
    fn distribution_params_read_camel_case_fields() {
        let params: DistributionParams = serde_json::from_str(
            r#"{"filename":"a.csv","column":"curso","kind":"pie",
                "filters":{"turno":["Noturno"]},"groupBy":"turno","compareWith":"b.csv"}"#,
        )
        .unwrap();
        assert_eq!(params.kind, ChartKind::Pie);
        assert_eq!(params.filters["turno"], vec!["Noturno"]);
        assert_eq!(params.group_by.as_deref(), Some("turno"));
        assert_eq!(params.compare_with.as_deref(), Some("b.csv"));
    }

    #[test]
    fn warnings_are_tagged() {
        let json = serde_json::to_value(QueryWarning::EmptyResult {
            dataset: "a.csv".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "empty_result");
        assert_eq!(json["dataset"], "a.csv");
    }

    #[test]
    fn overview_kinds_have_titles_and_names() {
        assert_eq!(OverviewKind::ALL.len(), 10);
        assert_eq!(OverviewKind::CourseByCity.to_string(), "course_by_city");
        assert!(OverviewKind::ALL.iter().all(|k| !k.title().is_empty()));
    }
}
