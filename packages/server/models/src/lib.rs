#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the survey insights server.
//!
//! Query endpoints accept and return the engine's own parameter and result
//! types directly. The types here cover the server-only responses.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Names of the stored datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDatasetList {
    /// Dataset names, sorted.
    pub datasets: Vec<String>,
}

/// Response to a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUploadResult {
    /// Name the dataset was stored under.
    pub name: String,
    /// Number of respondent rows.
    pub row_count: u64,
    /// Number of columns.
    pub column_count: u64,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable description of the failure.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
