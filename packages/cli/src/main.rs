#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the survey insights engine.
//!
//! Runs each engine operation against a dataset directory and prints the
//! result as pretty JSON, or starts the API server.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use survey_insights_analytics::tools;
use survey_insights_analytics_models::{
    ChartKind, DistributionParams, FilterSet, GeographyParams, ListColumnsParams, OverviewParams,
};
use survey_insights_dataset::{DatasetStore, DirectoryStore, paths};
use survey_insights_server::ServerConfig;

#[derive(Parser)]
#[command(name = "survey_insights", about = "Survey dataset analytics tool")]
struct Cli {
    /// Directory holding the CSV datasets (overrides `SURVEY_INSIGHTS_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the stored datasets
    Datasets,
    /// Profile every column of a dataset
    Columns {
        /// Dataset name (e.g., "respostas.csv")
        name: String,
    },
    /// Count the categories of one column
    Distribution {
        /// Dataset name
        name: String,
        /// Column to count
        column: String,
        /// Chart the counts are for (`bar`, `pie`, `line`, `histogram`)
        #[arg(long, default_value = "bar", value_parser = parse_chart_kind)]
        kind: ChartKind,
        /// Keep only rows whose column has one of the values, as
        /// `column=value1,value2`. May be repeated.
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, Vec<String>)>,
        /// Segment the counts by this column
        #[arg(long)]
        group_by: Option<String>,
        /// Compare against this second dataset
        #[arg(long)]
        compare_with: Option<String>,
    },
    /// Count respondents per location
    Geography {
        /// Dataset name
        name: String,
    },
    /// Run the full overview battery
    Overview {
        /// Dataset name
        name: String,
    },
    /// Store a CSV file as a dataset
    Upload {
        /// Path of the CSV file to upload
        path: PathBuf,
        /// Name to store it under (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Start the API server
    Serve,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(paths::data_dir);
    log::debug!("Using dataset directory {}", data_dir.display());
    let store = DirectoryStore::new(data_dir.clone());

    match cli.command {
        Commands::Datasets => print_json(&tools::list_datasets(&store)?)?,
        Commands::Columns { name } => {
            print_json(&tools::list_columns(&store, &ListColumnsParams { filename: name })?)?;
        }
        Commands::Distribution {
            name,
            column,
            kind,
            filters,
            group_by,
            compare_with,
        } => {
            let params = DistributionParams {
                filename: name,
                column,
                kind,
                filters: merge_filters(filters),
                group_by,
                compare_with,
            };
            print_json(&tools::query_distribution(&store, &params)?)?;
        }
        Commands::Geography { name } => {
            print_json(&tools::query_geography(&store, &GeographyParams { filename: name })?)?;
        }
        Commands::Overview { name } => {
            print_json(&tools::query_overview(&store, &OverviewParams { filename: name })?)?;
        }
        Commands::Upload { path, name } => {
            let name = match name {
                Some(name) => name,
                None => upload_name(&path)?,
            };
            let contents = std::fs::read(&path)?;
            store.save(&name, &contents)?;
            log::info!("Stored {} as '{name}'", path.display());
            println!("{name}");
        }
        Commands::Serve => {
            let mut config = ServerConfig::load()?;
            if cli.data_dir.is_some() {
                config.data_dir = data_dir;
            }
            actix_web::rt::System::new().block_on(survey_insights_server::run_server(config))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_chart_kind(raw: &str) -> Result<ChartKind, String> {
    raw.parse()
        .map_err(|_| format!("unknown chart kind '{raw}' (expected bar, pie, line or histogram)"))
}

/// Parses `column=value1,value2` into a filter entry.
fn parse_filter(raw: &str) -> Result<(String, Vec<String>), String> {
    let (column, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected column=value1,value2, got '{raw}'"))?;

    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{raw}'"));
    }

    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    Ok((column.to_string(), values))
}

/// Combines repeated `--filter` flags; repeating a column adds values.
fn merge_filters(filters: Vec<(String, Vec<String>)>) -> FilterSet {
    let mut set = FilterSet::new();
    for (column, values) in filters {
        set.entry(column).or_default().extend(values);
    }
    set
}

fn upload_name(path: &Path) -> Result<String, String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| format!("cannot derive a dataset name from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters() {
        assert_eq!(
            parse_filter("turno=Noturno, Matutino").unwrap(),
            (
                "turno".to_string(),
                vec!["Noturno".to_string(), "Matutino".to_string()]
            )
        );
        assert!(parse_filter("turno").is_err());
        assert!(parse_filter("=Noturno").is_err());
    }

    #[test]
    fn repeated_filters_merge() {
        let set = merge_filters(vec![
            ("turno".to_string(), vec!["Noturno".to_string()]),
            ("turno".to_string(), vec!["Matutino".to_string()]),
        ]);
        assert_eq!(set["turno"], ["Noturno", "Matutino"]);
    }

    #[test]
    fn parses_distribution_command() {
        let cli = Cli::try_parse_from([
            "survey_insights",
            "--data-dir",
            "/tmp/surveys",
            "distribution",
            "fall.csv",
            "curso",
            "--kind",
            "histogram",
            "--filter",
            "turno=Noturno",
            "--compare-with",
            "spring.csv",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/surveys")));
        let Commands::Distribution {
            kind,
            filters,
            compare_with,
            ..
        } = cli.command
        else {
            panic!("expected distribution");
        };
        assert_eq!(kind, ChartKind::Histogram);
        assert_eq!(filters.len(), 1);
        assert_eq!(compare_with.as_deref(), Some("spring.csv"));
    }

    #[test]
    fn rejects_unknown_chart_kind() {
        assert!(parse_chart_kind("scatter").is_err());
        assert_eq!(parse_chart_kind("pie").unwrap(), ChartKind::Pie);
    }

    #[test]
    fn upload_name_defaults_to_file_name() {
        assert_eq!(
            upload_name(Path::new("/home/me/respostas.csv")).unwrap(),
            "respostas.csv"
        );
    }
}
