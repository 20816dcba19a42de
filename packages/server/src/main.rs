#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey insights API server binary.
//!
//! Reads its configuration from `SURVEY_INSIGHTS_CONFIG` and the environment
//! (see [`survey_insights_server::config`]).

use survey_insights_server::{ServerConfig, ServerError, run_server};

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::load()?;
    run_server(config).await
}
