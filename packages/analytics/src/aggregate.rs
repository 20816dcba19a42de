//! Category counting, column profiling, cross tabulation and correlation.

use std::collections::{BTreeSet, HashMap, HashSet};

use survey_insights_analytics_models::{
    CategoryCount, CategoryDistribution, ColumnProfile, CorrelationMatrix, CrossTab,
    MissingPolicy,
};
use survey_insights_dataset_models::{ColumnKind, Dataset};

use crate::AnalyticsError;

/// Maximum number of sample values reported per column.
pub const SAMPLE_VALUE_LIMIT: usize = 10;

/// Counts the categories of a column, with missing values counted as
/// `"N/A"`.
///
/// # Errors
///
/// Returns [`AnalyticsError::ColumnNotFound`] if the column is absent.
pub fn distribution(
    dataset: &Dataset,
    column: &str,
) -> Result<CategoryDistribution, AnalyticsError> {
    distribution_with(dataset, column, MissingPolicy::AsCategory)
}

/// Counts the categories of a column under an explicit missing-value policy.
///
/// Categories are ordered by count descending; equal counts keep the order
/// in which the categories first appear.
///
/// # Errors
///
/// Returns [`AnalyticsError::ColumnNotFound`] if the column is absent.
pub fn distribution_with(
    dataset: &Dataset,
    column: &str,
    policy: MissingPolicy,
) -> Result<CategoryDistribution, AnalyticsError> {
    let idx = dataset
        .column_index(column)
        .ok_or_else(|| AnalyticsError::column_not_found(dataset.name(), column))?;

    let labels = dataset.column_values(idx).filter_map(|value| match policy {
        MissingPolicy::AsCategory => Some(value.label().into_owned()),
        MissingPolicy::Drop => value.as_text().map(std::borrow::Cow::into_owned),
    });

    Ok(CategoryDistribution::new(column, count_labels(labels)))
}

/// Counts labels, most frequent first, ties in first-seen order.
pub(crate) fn count_labels(labels: impl IntoIterator<Item = String>) -> Vec<CategoryCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for label in labels {
        if let Some(&pos) = positions.get(&label) {
            counts[pos].count += 1;
        } else {
            positions.insert(label.clone(), counts.len());
            counts.push(CategoryCount {
                category: label,
                count: 1,
            });
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Profiles every column of a dataset, in file order.
#[must_use]
pub fn column_profile(dataset: &Dataset) -> Vec<ColumnProfile> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut seen = HashSet::new();
            let mut samples = Vec::new();

            for value in dataset.column_values(idx).filter_map(|v| v.as_text()) {
                if seen.insert(value.to_string()) && samples.len() < SAMPLE_VALUE_LIMIT {
                    samples.push(value.into_owned());
                }
            }

            ColumnProfile {
                name: name.clone(),
                is_numeric: dataset.column_kind(idx) == ColumnKind::Numeric,
                distinct_count: seen.len() as u64,
                sample_values: samples,
            }
        })
        .collect()
}

/// Builds a contingency table of two columns.
///
/// Only rows where both values are present are counted. Row and column
/// labels are sorted ascending.
///
/// # Errors
///
/// Returns [`AnalyticsError::ColumnNotFound`] if either column is absent.
pub fn cross_tab(
    dataset: &Dataset,
    row_column: &str,
    column_column: &str,
) -> Result<CrossTab, AnalyticsError> {
    let row_idx = dataset
        .column_index(row_column)
        .ok_or_else(|| AnalyticsError::column_not_found(dataset.name(), row_column))?;
    let col_idx = dataset
        .column_index(column_column)
        .ok_or_else(|| AnalyticsError::column_not_found(dataset.name(), column_column))?;

    let pairs: Vec<(String, String)> = dataset
        .rows()
        .iter()
        .filter_map(|row| {
            Some((
                row[row_idx].as_text()?.into_owned(),
                row[col_idx].as_text()?.into_owned(),
            ))
        })
        .collect();

    let row_labels: Vec<String> = pairs
        .iter()
        .map(|(r, _)| r.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column_labels: Vec<String> = pairs
        .iter()
        .map(|(_, c)| c.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0_u64; column_labels.len()]; row_labels.len()];
    for (r, c) in &pairs {
        if let (Ok(ri), Ok(ci)) = (row_labels.binary_search(r), column_labels.binary_search(c)) {
            counts[ri][ci] += 1;
        }
    }

    Ok(CrossTab {
        row_column: row_column.to_string(),
        column_column: column_column.to_string(),
        row_labels,
        column_labels,
        counts,
    })
}

/// Pearson correlation between every pair of numeric columns.
///
/// Each pair uses only the rows where both values are present. Returns
/// `None` when the dataset has fewer than two numeric columns.
#[must_use]
pub fn correlation_matrix(dataset: &Dataset) -> Option<CorrelationMatrix> {
    let numeric: Vec<(String, Vec<Option<f64>>)> = dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| dataset.column_kind(*idx) == ColumnKind::Numeric)
        .map(|(idx, name)| {
            (
                name.clone(),
                dataset.column_values(idx).map(|v| v.as_number()).collect(),
            )
        })
        .collect();

    if numeric.len() < 2 {
        return None;
    }

    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = numeric[i]
                .1
                .iter()
                .zip(&numeric[j].1)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();

            let corr = pearson(&xs, &ys).map(|c| if i == j { 1.0 } else { c });
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    Some(CorrelationMatrix {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        values,
    })
}

/// Pearson correlation coefficient, `None` when undefined.
#[allow(clippy::cast_precision_loss)]
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some((numerator / denominator).clamp(-1.0, 1.0))
    }
}

/// Returns the distribution with categories sorted by label.
///
/// When every label is a number the sort is numeric, so `"9"` precedes
/// `"10"`.
#[must_use]
pub fn sort_by_label(mut dist: CategoryDistribution) -> CategoryDistribution {
    let numeric = dist
        .categories
        .iter()
        .all(|c| c.category.trim().parse::<f64>().is_ok());

    if numeric {
        dist.categories.sort_by(|a, b| {
            let a = a.category.trim().parse::<f64>().unwrap_or(f64::NAN);
            let b = b.category.trim().parse::<f64>().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        });
    } else {
        dist.categories.sort_by(|a, b| a.category.cmp(&b.category));
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_raw(
            "survey.csv",
            columns.iter().map(|c| (*c).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    fn pairs(dist: &CategoryDistribution) -> Vec<(&str, u64)> {
        dist.categories
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect()
    }

    #[test]
    fn counts_missing_as_category() {
        let ds = dataset(&["genero"], &[&["F"], &[""], &["M"], &["F"], &["N/A"]]);
        let dist = distribution(&ds, "genero").unwrap();
        assert_eq!(pairs(&dist), [("F", 2), ("N/A", 2), ("M", 1)]);
        assert_eq!(dist.total, ds.row_count() as u64);
    }

    #[test]
    fn drop_policy_ignores_missing() {
        let ds = dataset(&["genero"], &[&["F"], &[""], &["M"]]);
        let dist = distribution_with(&ds, "genero", MissingPolicy::Drop).unwrap();
        assert_eq!(pairs(&dist), [("F", 1), ("M", 1)]);
        assert_eq!(dist.total, 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let ds = dataset(&["c"], &[&["b"], &["a"], &["c"], &["a"], &["b"]]);
        let dist = distribution(&ds, "c").unwrap();
        assert_eq!(pairs(&dist), [("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let ds = dataset(&["c"], &[&["x"]]);
        assert!(matches!(
            distribution(&ds, "d"),
            Err(AnalyticsError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn empty_dataset_has_empty_distribution() {
        let ds = dataset(&["c"], &[]);
        let dist = distribution(&ds, "c").unwrap();
        assert!(dist.is_empty());
        assert_eq!(dist.total, 0);
    }

    #[test]
    fn profiles_columns() {
        let ds = dataset(&["curso", "idade"], &[&["ADS", "20"], &["GRH", ""], &["ADS", "31"]]);
        let profile = column_profile(&ds);
        assert_eq!(profile.len(), 2);
        assert!(!profile[0].is_numeric);
        assert_eq!(profile[0].distinct_count, 2);
        assert_eq!(profile[0].sample_values, ["ADS", "GRH"]);
        assert!(profile[1].is_numeric);
        assert_eq!(profile[1].sample_values, ["20", "31"]);
    }

    #[test]
    fn profile_samples_are_capped() {
        let rows: Vec<Vec<String>> = (0..15).map(|i| vec![format!("v{i}")]).collect();
        let ds = Dataset::from_raw("s.csv", vec!["c".to_string()], rows);
        let profile = column_profile(&ds);
        assert_eq!(profile[0].distinct_count, 15);
        assert_eq!(profile[0].sample_values.len(), SAMPLE_VALUE_LIMIT);
    }

    #[test]
    fn cross_tab_sorts_labels_and_skips_missing() {
        let ds = dataset(
            &["curso", "cidade"],
            &[
                &["GRH", "Palhoça"],
                &["ADS", "São José"],
                &["ADS", "Palhoça"],
                &["ADS", "Palhoça"],
                &["", "Palhoça"],
            ],
        );
        let tab = cross_tab(&ds, "curso", "cidade").unwrap();
        assert_eq!(tab.row_labels, ["ADS", "GRH"]);
        assert_eq!(tab.column_labels, ["Palhoça", "São José"]);
        assert_eq!(tab.counts, vec![vec![2, 1], vec![1, 0]]);
    }

    #[test]
    fn correlation_needs_two_numeric_columns() {
        let ds = dataset(&["a", "b"], &[&["1", "x"], &["2", "y"]]);
        assert!(correlation_matrix(&ds).is_none());
    }

    #[test]
    fn correlation_of_linear_columns() {
        let ds = dataset(
            &["a", "b", "c", "label"],
            &[
                &["1", "2", "3", "x"],
                &["2", "4", "2", "y"],
                &["3", "6", "1", "z"],
            ],
        );
        let matrix = correlation_matrix(&ds).unwrap();
        assert_eq!(matrix.columns, ["a", "b", "c"]);
        let ab = matrix.values[0][1].unwrap();
        let ac = matrix.values[0][2].unwrap();
        assert!((ab - 1.0).abs() < 1e-9);
        assert!((ac + 1.0).abs() < 1e-9);
        assert_eq!(matrix.values[1][0], matrix.values[0][1]);
        assert_eq!(matrix.values[2][2], Some(1.0));
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let ds = dataset(&["a", "b"], &[&["1", "5"], &["2", "5"], &["3", "5"]]);
        let matrix = correlation_matrix(&ds).unwrap();
        assert_eq!(matrix.values[0][1], None);
        assert_eq!(matrix.values[1][1], None);
    }

    #[test]
    fn sorts_numeric_labels_numerically() {
        let ds = dataset(&["idade"], &[&["10"], &["9"], &["10"], &["30"]]);
        let dist = sort_by_label(distribution_with(&ds, "idade", MissingPolicy::Drop).unwrap());
        assert_eq!(dist.labels().collect::<Vec<_>>(), ["9", "10", "30"]);
    }

    #[test]
    fn sorts_text_labels_lexically() {
        let ds = dataset(&["faixa"], &[&["25 a 30"], &["18 a 24"], &["25 a 30"]]);
        let dist = sort_by_label(distribution(&ds, "faixa").unwrap());
        assert_eq!(dist.labels().collect::<Vec<_>>(), ["18 a 24", "25 a 30"]);
    }
}
