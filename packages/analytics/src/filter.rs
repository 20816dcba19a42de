//! Row filtering and segmentation.

use std::collections::HashSet;

use survey_insights_analytics_models::FilterSet;
use survey_insights_dataset_models::Dataset;

use crate::AnalyticsError;

/// Group label used when a dataset is not segmented.
pub const OVERALL_GROUP: &str = "overall";

/// A labelled subset of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Group label ([`OVERALL_GROUP`] when not segmented).
    pub label: String,
    /// Rows belonging to this group.
    pub dataset: Dataset,
}

/// Keeps the rows whose string-coerced value is accepted by every filter.
///
/// Filters on columns absent from the dataset, or with no accepted values,
/// are ignored. Missing cells never match.
#[must_use]
pub fn apply_filters(dataset: &Dataset, filters: &FilterSet) -> Dataset {
    let active: Vec<(usize, HashSet<&str>)> = filters
        .iter()
        .filter(|(_, accepted)| !accepted.is_empty())
        .filter_map(|(column, accepted)| {
            dataset
                .column_index(column)
                .map(|idx| (idx, accepted.iter().map(String::as_str).collect()))
        })
        .collect();

    if active.is_empty() {
        return dataset.clone();
    }

    let filtered = dataset.filter_rows(|row| {
        active.iter().all(|(idx, accepted)| {
            row[*idx]
                .as_text()
                .is_some_and(|value| accepted.contains(value.as_ref()))
        })
    });

    log::debug!(
        "apply_filters: {} -> {} rows of '{}'",
        dataset.row_count(),
        filtered.row_count(),
        dataset.name()
    );

    filtered
}

/// Distinct non-missing string-coerced values of a column, first-seen order.
///
/// # Errors
///
/// Returns [`AnalyticsError::GroupColumnNotFound`] if the column is absent.
pub fn group_labels(dataset: &Dataset, group_column: &str) -> Result<Vec<String>, AnalyticsError> {
    let idx = group_index(dataset, group_column)?;

    let mut seen = HashSet::new();
    Ok(dataset
        .column_values(idx)
        .filter_map(|v| v.as_text())
        .filter(|label| seen.insert(label.to_string()))
        .map(|label| label.into_owned())
        .collect())
}

/// Splits a dataset into one segment per group value.
///
/// Without a group column the whole dataset is a single
/// [`OVERALL_GROUP`] segment. Rows whose group value is missing belong to no
/// segment.
///
/// # Errors
///
/// Returns [`AnalyticsError::GroupColumnNotFound`] if the group column is
/// absent.
pub fn segment(
    dataset: &Dataset,
    group_column: Option<&str>,
) -> Result<Vec<Segment>, AnalyticsError> {
    match group_column {
        None => Ok(vec![overall(dataset)]),
        Some(column) => {
            let labels = group_labels(dataset, column)?;
            segment_like(dataset, Some(column), &labels)
        }
    }
}

/// Splits a dataset by an externally supplied list of group labels.
///
/// Used to partition a comparator by the base dataset's groups: every label
/// yields a segment, empty when the dataset has no rows with that value.
/// Values not in `labels` are left out.
///
/// # Errors
///
/// Returns [`AnalyticsError::GroupColumnNotFound`] if the group column is
/// absent.
pub fn segment_like(
    dataset: &Dataset,
    group_column: Option<&str>,
    labels: &[String],
) -> Result<Vec<Segment>, AnalyticsError> {
    let Some(column) = group_column else {
        return Ok(vec![overall(dataset)]);
    };
    let idx = group_index(dataset, column)?;

    Ok(labels
        .iter()
        .map(|label| Segment {
            label: label.clone(),
            dataset: dataset.filter_rows(|row| {
                row[idx]
                    .as_text()
                    .is_some_and(|value| value.as_ref() == label.as_str())
            }),
        })
        .collect())
}

fn overall(dataset: &Dataset) -> Segment {
    Segment {
        label: OVERALL_GROUP.to_string(),
        dataset: dataset.clone(),
    }
}

fn group_index(dataset: &Dataset, column: &str) -> Result<usize, AnalyticsError> {
    dataset
        .column_index(column)
        .ok_or_else(|| AnalyticsError::GroupColumnNotFound {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
        })
}
