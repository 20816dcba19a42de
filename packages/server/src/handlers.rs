//! HTTP handler functions for the survey insights API.
//!
//! Engine calls read datasets from disk, so they run on the blocking thread
//! pool via [`web::block`].

use std::sync::Arc;

use actix_web::{HttpResponse, error::BlockingError, http::StatusCode, web};
use serde::Serialize;
use survey_insights_analytics::{AnalyticsError, tools};
use survey_insights_analytics_models::{
    DistributionParams, GeographyParams, ListColumnsParams, OverviewParams,
};
use survey_insights_dataset::DatasetError;
use survey_insights_server_models::{ApiDatasetList, ApiError, ApiHealth, ApiUploadResult};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/datasets`
///
/// Lists the stored dataset names.
pub async fn list_datasets(state: web::Data<AppState>) -> HttpResponse {
    let store = Arc::clone(&state.store);
    let result = web::block(move || {
        tools::list_datasets(store.as_ref()).map(|datasets| ApiDatasetList { datasets })
    })
    .await;

    respond("list datasets", StatusCode::OK, result)
}

/// `POST /api/datasets/{name}`
///
/// Stores the raw CSV request body under `name`, replacing any existing
/// dataset with that name.
pub async fn upload_dataset(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let store = Arc::clone(&state.store);
    let name = path.into_inner();

    let result = web::block(move || -> Result<ApiUploadResult, AnalyticsError> {
        store.save(&name, &body)?;
        let dataset = store.load(&name)?;
        log::info!(
            "Uploaded dataset '{name}' ({} rows, {} bytes)",
            dataset.row_count(),
            body.len()
        );
        Ok(ApiUploadResult {
            row_count: dataset.row_count() as u64,
            column_count: dataset.columns().len() as u64,
            name,
        })
    })
    .await;

    respond("upload dataset", StatusCode::CREATED, result)
}

/// `POST /api/columns`
///
/// Profiles every column of a dataset.
pub async fn list_columns(
    state: web::Data<AppState>,
    params: web::Json<ListColumnsParams>,
) -> HttpResponse {
    let store = Arc::clone(&state.store);
    let params = params.into_inner();
    let result = web::block(move || tools::list_columns(store.as_ref(), &params)).await;

    respond("list columns", StatusCode::OK, result)
}

/// `POST /api/distribution`
///
/// Category counts for one column, optionally segmented and compared.
pub async fn distribution(
    state: web::Data<AppState>,
    params: web::Json<DistributionParams>,
) -> HttpResponse {
    let store = Arc::clone(&state.store);
    let params = params.into_inner();
    let result = web::block(move || tools::query_distribution(store.as_ref(), &params)).await;

    respond("query distribution", StatusCode::OK, result)
}

/// `POST /api/geography`
///
/// Respondent counts per location with map positions.
pub async fn geography(
    state: web::Data<AppState>,
    params: web::Json<GeographyParams>,
) -> HttpResponse {
    let store = Arc::clone(&state.store);
    let params = params.into_inner();
    let result = web::block(move || tools::query_geography(store.as_ref(), &params)).await;

    respond("query geography", StatusCode::OK, result)
}

/// `POST /api/overview`
///
/// Runs the full overview battery.
pub async fn overview(
    state: web::Data<AppState>,
    params: web::Json<OverviewParams>,
) -> HttpResponse {
    let store = Arc::clone(&state.store);
    let params = params.into_inner();
    let result = web::block(move || tools::query_overview(store.as_ref(), &params)).await;

    respond("query overview", StatusCode::OK, result)
}

/// Maps an engine error to the HTTP status reported to the client.
#[must_use]
pub const fn status_for(err: &AnalyticsError) -> StatusCode {
    match err {
        AnalyticsError::Dataset(DatasetError::NotFound { .. }) => StatusCode::NOT_FOUND,
        AnalyticsError::Dataset(DatasetError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        AnalyticsError::Dataset(
            DatasetError::Malformed { .. } | DatasetError::InvalidName { .. },
        )
        | AnalyticsError::ColumnNotFound { .. }
        | AnalyticsError::GroupColumnNotFound { .. }
        | AnalyticsError::LocationColumnNotFound { .. } => StatusCode::BAD_REQUEST,
    }
}

fn respond<T: Serialize>(
    action: &str,
    success: StatusCode,
    result: Result<Result<T, AnalyticsError>, BlockingError>,
) -> HttpResponse {
    match result {
        Ok(Ok(body)) => HttpResponse::build(success).json(body),
        Ok(Err(e)) => {
            let status = status_for(&e);
            if status.is_server_error() {
                log::error!("Failed to {action}: {e}");
            } else {
                log::warn!("Failed to {action}: {e}");
            }
            HttpResponse::build(status).json(ApiError::new(&e))
        }
        Err(e) => {
            log::error!("Failed to {action}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(format!("Failed to {action}")))
        }
    }
}

/// Turns JSON body errors (bad syntax, missing fields) into `400` responses
/// with the standard error body.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    log::warn!("Rejected request body: {err}");
    let response = HttpResponse::BadRequest().json(ApiError::new(&err));
    actix_web::error::InternalError::from_response(err, response).into()
}
