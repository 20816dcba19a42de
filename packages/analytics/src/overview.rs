//! The fixed battery of overview analyses.
//!
//! Every analysis runs in isolation: a missing column or an unusable dataset
//! skips that analysis with a reason and never affects the others.

use survey_insights_analytics_models::{
    AnalysisData, CategoryDistribution, MissingPolicy, OverviewAnalysis, OverviewKind,
    OverviewResult, SkippedAnalysis,
};
use survey_insights_dataset_models::Dataset;

use crate::{
    aggregate::{correlation_matrix, cross_tab, distribution_with, sort_by_label},
    columns::{ColumnRole, abbreviate_courses, find_column},
    geography,
};

/// Canonical income brackets, lowest first.
pub const INCOME_BRACKETS: &[&str] = &[
    "Menos de 1 salário mínimo",
    "De 1 a 3 salários mínimos",
    "De 4 a 6 salários mínimos",
    "Mais de 6 salários mínimos",
];

/// Runs every overview analysis against `dataset`.
#[must_use]
pub fn run(dataset: &Dataset) -> OverviewResult {
    let mut analyses = Vec::new();
    let mut skipped = Vec::new();

    for &kind in OverviewKind::ALL {
        match analyze(dataset, kind) {
            Ok(result) => analyses.push(OverviewAnalysis {
                kind,
                title: kind.title().to_string(),
                result,
            }),
            Err(reason) => {
                log::warn!("overview: skipped {kind} for '{}': {reason}", dataset.name());
                skipped.push(SkippedAnalysis { kind, reason });
            }
        }
    }

    log::info!(
        "overview: {} analyses produced, {} skipped for '{}'",
        analyses.len(),
        skipped.len(),
        dataset.name()
    );

    OverviewResult {
        filename: dataset.name().to_string(),
        analyses,
        skipped,
    }
}

fn analyze(dataset: &Dataset, kind: OverviewKind) -> Result<AnalysisData, String> {
    match kind {
        OverviewKind::Course => {
            let column = require(dataset, ColumnRole::Course)?;
            let abbreviated = abbreviate_courses(dataset, column);
            counts(&abbreviated, column).map(AnalysisData::Distribution)
        }
        OverviewKind::Gender => role_counts(dataset, ColumnRole::Gender),
        OverviewKind::AgeBracket => {
            let column = require(dataset, ColumnRole::Age)?;
            counts(dataset, column).map(|d| AnalysisData::Distribution(sort_by_label(d)))
        }
        OverviewKind::CourseByCity => {
            let course = require(dataset, ColumnRole::Course)?;
            let city = require(dataset, ColumnRole::Location)?;
            cross_tab(&abbreviate_courses(dataset, course), course, city)
                .map(AnalysisData::CrossTab)
                .map_err(|e| e.to_string())
        }
        OverviewKind::Race => role_counts(dataset, ColumnRole::Race),
        OverviewKind::ReferralSource => role_counts(dataset, ColumnRole::Referral),
        OverviewKind::Employment => role_counts(dataset, ColumnRole::Employment),
        OverviewKind::Income => {
            let column = require(dataset, ColumnRole::Income)?;
            counts(dataset, column).map(|d| AnalysisData::Distribution(order_income(d)))
        }
        OverviewKind::Correlation => correlation_matrix(dataset)
            .map(AnalysisData::Correlation)
            .ok_or_else(|| "fewer than two numeric columns".to_string()),
        OverviewKind::Geography => {
            let column = require(dataset, ColumnRole::Location)?;
            geography::aggregate(dataset, column)
                .map(AnalysisData::Geography)
                .map_err(|e| e.to_string())
        }
    }
}

fn require(dataset: &Dataset, role: ColumnRole) -> Result<&str, String> {
    find_column(dataset.columns(), role).ok_or_else(|| format!("no {role} column found"))
}

fn counts(dataset: &Dataset, column: &str) -> Result<CategoryDistribution, String> {
    distribution_with(dataset, column, MissingPolicy::Drop).map_err(|e| e.to_string())
}

fn role_counts(dataset: &Dataset, role: ColumnRole) -> Result<AnalysisData, String> {
    let column = require(dataset, role)?;
    counts(dataset, column).map(AnalysisData::Distribution)
}

/// Puts the canonical income brackets first, in bracket order, followed by
/// every other category in count order.
///
/// A bracket claims the first (most common) category whose label contains
/// it.
#[must_use]
pub fn order_income(mut dist: CategoryDistribution) -> CategoryDistribution {
    let mut remaining = std::mem::take(&mut dist.categories);
    let mut ordered = Vec::with_capacity(remaining.len());

    for bracket in INCOME_BRACKETS {
        if let Some(pos) = remaining.iter().position(|c| c.category.contains(bracket)) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.append(&mut remaining);

    dist.categories = ordered;
    dist
}
