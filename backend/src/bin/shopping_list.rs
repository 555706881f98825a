//! Print a user's aggregated shopping list as plain text.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use foodgram::config::DatabaseSettings;
use foodgram::domain::{ShoppingListService, UserId};
use foodgram::domain::ports::ShoppingListQuery;
use foodgram::outbound::persistence::{
    DbPool, DieselRecipeRepository, DieselRelationRepository, run_pending_migrations,
};
use foodgram::telemetry::init_tracing;
use tokio::runtime::Builder;

/// `shopping-list` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shopping-list",
    about = "Aggregate the ingredients of every recipe in a user's cart",
    version
)]
struct CliArgs {
    /// Owner of the cart.
    #[arg(long = "user", value_name = "uuid", value_parser = parse_user_id)]
    user: UserId,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn parse_user_id(raw: &str) -> Result<UserId, String> {
    UserId::new(raw).map_err(|error| error.to_string())
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

    let settings = DatabaseSettings::from_environment("shopping-list")
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

    let service = ShoppingListService::new(
        Arc::new(DieselRelationRepository::new(pool.clone())),
        Arc::new(DieselRecipeRepository::new(pool)),
    );
    let list = service
        .shopping_list(&args.user)
        .await
        .map_err(|error| io::Error::other(format!("shopping list failed: {error}")))?;

    io::stdout().lock().write_all(list.render_text().as_bytes())
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::parse_user_id;

    #[rstest]
    fn accepts_uuid_user_ids() {
        let user = parse_user_id("11111111-1111-1111-1111-111111111111").expect("valid id");
        assert_eq!(user.as_ref(), "11111111-1111-1111-1111-111111111111");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn rejects_malformed_user_ids(#[case] raw: &str) {
        assert!(parse_user_id(raw).is_err());
    }
}
