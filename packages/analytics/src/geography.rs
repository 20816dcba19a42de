//! Per-location respondent counts placed on the map.

use std::collections::HashSet;

use survey_insights_analytics_models::{GeoStats, GeoSummary, LocationPoint};
use survey_insights_dataset_models::{Dataset, MISSING_LABEL};
use survey_insights_normalize::resolve_municipality;

use crate::{AnalyticsError, aggregate::count_labels};

/// Aggregates respondents by location.
///
/// Produces one point per distinct raw location, most common first. Cities
/// outside the municipality table are placed at the default position, so no
/// location is ever dropped. Missing locations are not counted.
///
/// # Errors
///
/// Returns [`AnalyticsError::ColumnNotFound`] if the column is absent.
pub fn aggregate(dataset: &Dataset, location_column: &str) -> Result<GeoSummary, AnalyticsError> {
    let idx = dataset
        .column_index(location_column)
        .ok_or_else(|| AnalyticsError::column_not_found(dataset.name(), location_column))?;

    let counts = count_labels(
        dataset
            .column_values(idx)
            .filter_map(|v| v.as_text().map(std::borrow::Cow::into_owned)),
    );

    let points: Vec<LocationPoint> = counts
        .iter()
        .map(|c| {
            let resolved = resolve_municipality(&c.category);
            LocationPoint {
                name: resolved.label,
                latitude: resolved.latitude,
                longitude: resolved.longitude,
                count: c.count,
                matched: resolved.matched.map(str::to_string),
            }
        })
        .collect();

    let distinct: HashSet<&str> = counts.iter().map(|c| c.category.trim()).collect();

    let stats = GeoStats {
        total_count: counts.iter().map(|c| c.count).sum(),
        distinct_location_count: distinct.len() as u64,
        top_location_label: counts
            .first()
            .map_or_else(|| MISSING_LABEL.to_string(), |c| c.category.clone()),
        top_location_count: counts.first().map_or(0, |c| c.count),
    };

    log::debug!(
        "geography: {} points, {} respondents in '{}'",
        points.len(),
        stats.total_count,
        dataset.name()
    );

    Ok(GeoSummary {
        column: location_column.to_string(),
        points,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use survey_insights_normalize::HOME_MUNICIPALITY;

    use super::*;

    fn cities(values: &[&str]) -> Dataset {
        Dataset::from_raw(
            "survey.csv",
            vec!["cidade".to_string()],
            values.iter().map(|v| vec![(*v).to_string()]).collect(),
        )
    }

    #[test]
    fn counts_and_resolves_locations() {
        let ds = cities(&["Palhoça", "Florianópolis", "Palhoça", "Curitiba", ""]);
        let summary = aggregate(&ds, "cidade").unwrap();

        assert_eq!(summary.points.len(), 3);
        assert_eq!(summary.points[0].name, "Palhoça");
        assert_eq!(summary.points[0].count, 2);
        assert_eq!(summary.points[1].matched.as_deref(), Some("Florianópolis"));

        let unknown = &summary.points[2];
        assert_eq!(unknown.name, "Curitiba");
        assert_eq!(unknown.matched, None);
        assert!((unknown.latitude - HOME_MUNICIPALITY.latitude).abs() < f64::EPSILON);

        assert_eq!(summary.stats.total_count, 4);
        assert_eq!(summary.stats.distinct_location_count, 3);
        assert_eq!(summary.stats.top_location_label, "Palhoça");
        assert_eq!(summary.stats.top_location_count, 2);
    }

    #[test]
    fn unmatched_locations_are_never_dropped() {
        let ds = cities(&["Curitiba", "Porto Alegre", "Lisboa"]);
        let summary = aggregate(&ds, "cidade").unwrap();
        assert_eq!(summary.points.len(), 3);
        assert_eq!(summary.points.iter().map(|p| p.count).sum::<u64>(), 3);
    }

    #[test]
    fn distinct_count_uses_trimmed_labels() {
        let ds = cities(&["São José", "São José ", "Biguaçu"]);
        let summary = aggregate(&ds, "cidade").unwrap();
        assert_eq!(summary.points.len(), 3);
        assert_eq!(summary.stats.distinct_location_count, 2);
        assert_eq!(summary.points[1].name, "São José");
    }

    #[test]
    fn top_location_is_first_seen_among_ties() {
        let ds = cities(&["Biguaçu", "Garopaba", "Garopaba", "Biguaçu"]);
        let summary = aggregate(&ds, "cidade").unwrap();
        assert_eq!(summary.stats.top_location_label, "Biguaçu");
    }

    #[test]
    fn empty_column_reports_no_top_location() {
        let ds = cities(&["", "N/A"]);
        let summary = aggregate(&ds, "cidade").unwrap();
        assert!(summary.points.is_empty());
        assert_eq!(summary.stats.total_count, 0);
        assert_eq!(summary.stats.top_location_label, MISSING_LABEL);
        assert_eq!(summary.stats.top_location_count, 0);
    }
}
