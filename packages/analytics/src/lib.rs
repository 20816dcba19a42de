#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular analytics and comparison engine for survey datasets.
//!
//! Each public function in [`tools`] corresponds to one operation a front end
//! can invoke. Operations accept the parameter types from
//! `survey_insights_analytics_models`, load their datasets through an injected
//! [`DatasetStore`](survey_insights_dataset::DatasetStore), and return typed
//! results. Everything here is synchronous and side-effect free apart from
//! reading the store.

pub mod aggregate;
pub mod columns;
pub mod compare;
pub mod filter;
pub mod geography;
pub mod overview;
pub mod tools;

use survey_insights_dataset::DatasetError;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The requested column does not exist in a dataset.
    #[error("Column '{column}' not found in dataset '{dataset}'")]
    ColumnNotFound {
        /// Dataset that was searched.
        dataset: String,
        /// Requested column name.
        column: String,
    },

    /// The requested group column does not exist in a dataset.
    #[error("Group column '{column}' not found in dataset '{dataset}'")]
    GroupColumnNotFound {
        /// Dataset that was searched.
        dataset: String,
        /// Requested group column name.
        column: String,
    },

    /// No column in the dataset looks like a location column.
    #[error("No location column found in dataset '{dataset}'")]
    LocationColumnNotFound {
        /// Dataset that was searched.
        dataset: String,
    },
}

impl AnalyticsError {
    pub(crate) fn column_not_found(dataset: &str, column: &str) -> Self {
        Self::ColumnNotFound {
            dataset: dataset.to_string(),
            column: column.to_string(),
        }
    }
}
