//! Bulk-load ingredients from a JSON file into the catalogue.
//!
//! The file holds `[{"name": "...", "measurement_unit": "..."}]`. Pairs that
//! already exist are skipped.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use foodgram::config::DatabaseSettings;
use foodgram::domain::{IngredientCatalogueService, IngredientDraft};
use foodgram::domain::ports::IngredientCatalogue;
use foodgram::outbound::persistence::{
    DbPool, DieselIngredientRepository, run_pending_migrations,
};
use foodgram::telemetry::init_tracing;
use tokio::runtime::Builder;
use tracing::info;

/// `load-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-ingredients",
    about = "Import ingredients from JSON, skipping (name, unit) pairs already stored",
    version
)]
struct CliArgs {
    /// Path to the JSON ingredient list.
    #[arg(long = "file", value_name = "path")]
    file: PathBuf,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    init_tracing();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let drafts = read_drafts(&args.file)?;

    let settings = DatabaseSettings::from_environment("load-ingredients")
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let database_url = settings
        .resolve_database_url(args.database_url)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    if settings.run_migrations() {
        let url = database_url.clone();
        tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|error| io::Error::other(format!("migration task: {error}")))?
            .map_err(io::Error::other)?;
    }
    let pool = DbPool::new(settings.pool_config(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let catalogue =
        IngredientCatalogueService::new(Arc::new(DieselIngredientRepository::new(pool)));
    let summary = catalogue
        .import(drafts)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    info!(
        submitted = summary.submitted,
        inserted = summary.inserted,
        "ingredient import finished"
    );
    println!("submitted={}", summary.submitted);
    println!("inserted={}", summary.inserted);
    println!("skipped={}", summary.skipped());
    Ok(())
}

fn read_drafts(path: &Path) -> io::Result<Vec<IngredientDraft>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let raw = directory.read_to_string(file_name).map_err(|error| {
        io::Error::other(format!("read input file '{}': {error}", path.display()))
    })?;
    parse_drafts(&raw)
}

fn parse_drafts(raw: &str) -> io::Result<Vec<IngredientDraft>> {
    serde_json::from_str(raw).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("ingredient list: {error}"),
        )
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for ingredient file parsing.

    use rstest::rstest;

    use super::parse_drafts;

    #[rstest]
    fn parses_name_and_unit_pairs() {
        let drafts = parse_drafts(
            r#"[{"name": "flour", "measurement_unit": "g"},
                {"name": "salt", "measurement_unit": "tsp"}]"#,
        )
        .expect("valid list");

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].name.as_str(), "salt");
        assert_eq!(drafts[1].measurement_unit.as_str(), "tsp");
    }

    #[rstest]
    #[case(r#"[{"name": "", "measurement_unit": "g"}]"#)]
    #[case(r#"[{"name": "flour"}]"#)]
    #[case(r#"{"name": "flour", "measurement_unit": "g"}"#)]
    fn rejects_invalid_entries(#[case] raw: &str) {
        let error = parse_drafts(raw).expect_err("invalid list");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
    }
}
