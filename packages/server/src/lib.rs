#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the survey insights engine.
//!
//! Exposes the engine operations as JSON endpoints under `/api` and accepts
//! CSV uploads into a directory-backed dataset store. Optionally serves a
//! static front end from the configured directory.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use survey_insights_dataset::{DatasetStore, DirectoryStore};
use thiserror::Error;

pub use config::{ConfigError, ServerConfig};

/// Errors that can stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP server failed to bind or crashed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Where datasets are listed, loaded and saved.
    pub store: Arc<dyn DatasetStore>,
}

impl AppState {
    /// Wraps a dataset store.
    #[must_use]
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self { store }
    }
}

/// Registers the `/api` routes and the JSON error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/datasets", web::get().to(handlers::list_datasets))
                .route("/datasets/{name}", web::post().to(handlers::upload_dataset))
                .route("/columns", web::post().to(handlers::list_columns))
                .route("/distribution", web::post().to(handlers::distribution))
                .route("/geography", web::post().to(handlers::geography))
                .route("/overview", web::post().to(handlers::overview)),
        );
}

/// Starts the survey insights API server.
///
/// Opens a [`DirectoryStore`] at the configured data directory and serves
/// until the server is stopped. The caller provides the async runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    log::info!("Using dataset directory {}", config.data_dir.display());
    let store: Arc<dyn DatasetStore> = Arc::new(DirectoryStore::new(config.data_dir.clone()));
    let state = web::Data::new(AppState::new(store));

    let ServerConfig {
        bind_addr,
        port,
        cors_permissive,
        static_dir,
        max_upload_bytes,
        ..
    } = config;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = if cors_permissive {
            Cors::permissive()
        } else {
            Cors::default()
        };

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure);

        // Serve front-end static files when configured
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::StatusCode,
        test::{self, TestRequest},
    };
    use serde_json::{Value, json};
    use survey_insights_dataset::MemoryStore;

    use super::*;

    const SURVEY: &str = "\
Curso,Gênero,Município de residência
Tecnólogo em Análise e Desenvolvimento de Sistemas,Feminino,Palhoça
ADS,Masculino,São José
Pedagogia,Feminino,Curitiba
";

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(
            MemoryStore::new().with_file("survey.csv", SURVEY),
        )))
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().app_data(state()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!();
        let req = TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn distribution_returns_abbreviated_counts() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/distribution")
            .set_json(json!({"filename": "survey.csv", "column": "Curso"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let categories = &body["segments"][0]["base"]["categories"];
        assert_eq!(categories[0]["category"], "ADS");
        assert_eq!(categories[0]["count"], 2);
        assert_eq!(body["segments"][0]["title"], "GERAL");
    }

    #[actix_web::test]
    async fn unknown_dataset_is_404() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/overview")
            .set_json(json!({"filename": "missing.csv"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("missing.csv"));
    }

    #[actix_web::test]
    async fn unknown_column_is_400() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/distribution")
            .set_json(json!({"filename": "survey.csv", "column": "Idade"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_required_field_is_400_with_error_body() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/distribution")
            .set_json(json!({"filename": "survey.csv"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn upload_then_list() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/datasets/spring.csv")
            .set_payload("curso\nADS\nGRH\n")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["rowCount"], 2);

        let req = TestRequest::get().uri("/api/datasets").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["datasets"], json!(["spring.csv", "survey.csv"]));
    }

    #[actix_web::test]
    async fn upload_rejects_non_csv_names() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/datasets/notes.txt")
            .set_payload("curso\nADS\n")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn geography_places_unknown_cities() {
        let app = app!();
        let req = TestRequest::post()
            .uri("/api/geography")
            .set_json(json!({"filename": "survey.csv"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["points"].as_array().unwrap().len(), 3);
        assert_eq!(body["stats"]["totalCount"], 3);
    }
}
