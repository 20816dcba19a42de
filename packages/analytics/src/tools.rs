//! Engine operations.
//!
//! Each function loads its datasets through the injected [`DatasetStore`] and
//! returns a self-contained result. Validation happens before any counting,
//! so a failed query never produces partial output.

use survey_insights_analytics_models::{
    CategoryDistribution, ComparisonRow, DistributionParams, DistributionResult, GeoSummary,
    GeographyParams, ListColumnsParams, ListColumnsResult, MissingPolicy, OverviewParams,
    OverviewResult, QueryWarning, SegmentResult,
};
use survey_insights_dataset::DatasetStore;
use survey_insights_dataset_models::Dataset;

use crate::{
    AnalyticsError,
    aggregate::{column_profile, distribution, distribution_with},
    columns::{ColumnRole, abbreviate_courses, find_column, is_course_column},
    compare::{compare, total_comparison},
    filter::{apply_filters, segment, segment_like},
    geography, overview,
};

/// Title of the single segment of an unsegmented query.
pub const OVERALL_TITLE: &str = "GERAL";

/// Lists the names of every stored dataset.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_datasets(store: &dyn DatasetStore) -> Result<Vec<String>, AnalyticsError> {
    Ok(store.list()?)
}

/// Profiles every column of a dataset.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub fn list_columns(
    store: &dyn DatasetStore,
    params: &ListColumnsParams,
) -> Result<ListColumnsResult, AnalyticsError> {
    let dataset = store.load(&params.filename)?;

    Ok(ListColumnsResult {
        filename: params.filename.clone(),
        row_count: dataset.row_count() as u64,
        columns: column_profile(&dataset),
    })
}

/// Counts the categories of one column, optionally segmented and compared
/// against a second dataset.
///
/// Filters apply to both datasets. Course columns are abbreviated before
/// counting. When segmenting, the comparator is split by the base dataset's
/// group labels so every segment pairs up.
///
/// # Errors
///
/// Returns an error if either dataset cannot be loaded, or if the column or
/// group column is missing from either dataset.
pub fn query_distribution(
    store: &dyn DatasetStore,
    params: &DistributionParams,
) -> Result<DistributionResult, AnalyticsError> {
    let group_by = params.group_by.as_deref();

    let base = store.load(&params.filename)?;
    validate(&base, &params.column, group_by)?;

    let comparator = match params.compare_with.as_deref() {
        Some(name) => {
            let comparator = store.load(name)?;
            validate(&comparator, &params.column, group_by)?;
            Some(comparator)
        }
        None => None,
    };

    let mut warnings = Vec::new();
    let normalize = is_course_column(&params.column);

    let prepare = |dataset: &Dataset, warnings: &mut Vec<QueryWarning>| {
        let filtered = apply_filters(dataset, &params.filters);
        if filtered.is_empty() {
            warnings.push(QueryWarning::EmptyResult {
                dataset: dataset.name().to_string(),
            });
        }
        if normalize {
            abbreviate_courses(&filtered, &params.column)
        } else {
            filtered
        }
    };

    let base = prepare(&base, &mut warnings);
    let comparator = comparator.map(|c| prepare(&c, &mut warnings));

    let base_segments = segment(&base, group_by)?;
    let labels: Vec<String> = base_segments.iter().map(|s| s.label.clone()).collect();
    let comparator_segments = comparator
        .as_ref()
        .map(|c| segment_like(c, group_by, &labels))
        .transpose()?;

    let policy = params.kind.missing_policy();
    let mut segments = Vec::with_capacity(base_segments.len());

    for (i, seg) in base_segments.iter().enumerate() {
        let comparator_seg = comparator_segments.as_ref().and_then(|segs| segs.get(i));

        let base_dist = distribution_with(&seg.dataset, &params.column, policy)?;
        let comparator_dist = comparator_seg
            .map(|s| distribution_with(&s.dataset, &params.column, policy))
            .transpose()?;

        // Comparison rows always count missing values as "N/A".
        let comparison = match (comparator_seg, &comparator_dist) {
            (Some(s), _) if policy == MissingPolicy::Drop => {
                let base_all = distribution(&seg.dataset, &params.column)?;
                let comparator_all = distribution(&s.dataset, &params.column)?;
                Some(comparison_rows(&base_all, &comparator_all))
            }
            (_, Some(c)) => Some(comparison_rows(&base_dist, c)),
            _ => None,
        };
        let (comparison, total_comparison) = comparison.unzip();

        let title = group_by.map_or_else(
            || OVERALL_TITLE.to_string(),
            |group| format!("{group}: {}", seg.label),
        );

        segments.push(SegmentResult {
            group: seg.label.clone(),
            title,
            comparison,
            total_comparison,
            base: base_dist,
            comparator: comparator_dist,
        });
    }

    log::debug!(
        "query_distribution: '{}' column '{}' -> {} segments",
        params.filename,
        params.column,
        segments.len()
    );

    Ok(DistributionResult {
        filename: params.filename.clone(),
        compare_with: params.compare_with.clone(),
        column: params.column.clone(),
        kind: params.kind,
        normalized_courses: normalize,
        segments,
        warnings,
    })
}

fn comparison_rows(
    base: &CategoryDistribution,
    comparator: &CategoryDistribution,
) -> (Vec<ComparisonRow>, ComparisonRow) {
    (compare(base, comparator), total_comparison(base, comparator))
}

fn validate(dataset: &Dataset, column: &str, group_by: Option<&str>) -> Result<(), AnalyticsError> {
    if !dataset.has_column(column) {
        return Err(AnalyticsError::column_not_found(dataset.name(), column));
    }
    if let Some(group) = group_by
        && !dataset.has_column(group)
    {
        return Err(AnalyticsError::GroupColumnNotFound {
            dataset: dataset.name().to_string(),
            column: group.to_string(),
        });
    }
    Ok(())
}

/// Aggregates respondents by location, using the dataset's location column.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or has no location
/// column.
pub fn query_geography(
    store: &dyn DatasetStore,
    params: &GeographyParams,
) -> Result<GeoSummary, AnalyticsError> {
    let dataset = store.load(&params.filename)?;

    let column = find_column(dataset.columns(), ColumnRole::Location).ok_or_else(|| {
        AnalyticsError::LocationColumnNotFound {
            dataset: params.filename.clone(),
        }
    })?;

    geography::aggregate(&dataset, column)
}

/// Runs the full overview battery against a dataset.
///
/// # Errors
///
/// Returns an error only if the dataset cannot be loaded; individual
/// analyses that cannot run are reported as skipped.
pub fn query_overview(
    store: &dyn DatasetStore,
    params: &OverviewParams,
) -> Result<OverviewResult, AnalyticsError> {
    let dataset = store.load(&params.filename)?;
    Ok(overview::run(&dataset))
}
