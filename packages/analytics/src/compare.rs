//! Category-by-category comparison of two distributions.

use std::collections::HashMap;

use survey_insights_analytics_models::{CategoryDistribution, ComparisonRow};

/// Category label of the row produced by [`total_comparison`].
pub const TOTAL_CATEGORY: &str = "Total";

/// Percentage change from `base` to `comparator`, rounded to two decimals
/// with ties going to the even digit.
///
/// Growth from zero is reported as `100.0` and zero-to-zero as `0.0`, so the
/// result is always finite.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_change(base: u64, comparator: u64) -> f64 {
    let pct = if base > 0 {
        ((comparator as f64 - base as f64) / base as f64) * 100.0
    } else if comparator > 0 {
        100.0
    } else {
        0.0
    };

    (pct * 100.0).round_ties_even() / 100.0
}

/// Compares two distributions over the union of their categories.
///
/// Rows are ordered by the larger of the two counts, descending, then by
/// category label.
#[must_use]
pub fn compare(
    base: &CategoryDistribution,
    comparator: &CategoryDistribution,
) -> Vec<ComparisonRow> {
    let mut counts: HashMap<&str, (u64, u64)> = HashMap::new();

    for c in &base.categories {
        counts.entry(c.category.as_str()).or_default().0 += c.count;
    }
    for c in &comparator.categories {
        counts.entry(c.category.as_str()).or_default().1 += c.count;
    }

    let mut rows: Vec<ComparisonRow> = counts
        .into_iter()
        .map(|(category, (base_count, comparator_count))| ComparisonRow {
            category: category.to_string(),
            base_count,
            comparator_count,
            percent_change: percent_change(base_count, comparator_count),
        })
        .collect();

    rows.sort_by(|a, b| {
        let a_max = a.base_count.max(a.comparator_count);
        let b_max = b.base_count.max(b.comparator_count);
        b_max.cmp(&a_max).then_with(|| a.category.cmp(&b.category))
    });

    rows
}

/// Compares the overall totals of two distributions.
#[must_use]
pub fn total_comparison(
    base: &CategoryDistribution,
    comparator: &CategoryDistribution,
) -> ComparisonRow {
    ComparisonRow {
        category: TOTAL_CATEGORY.to_string(),
        base_count: base.total,
        comparator_count: comparator.total,
        percent_change: percent_change(base.total, comparator.total),
    }
}
