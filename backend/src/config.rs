//! Database configuration loaded via OrthoConfig.
//!
//! Values come from `FOODGRAM_*` environment variables or configuration
//! files. Binaries parse their own flags with clap and let an explicit
//! `--database-url` win over the loaded value.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Errors raised while turning settings into a pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Configuration sources could not be read.
    #[error("failed to load settings: {message}")]
    Load { message: String },
    /// No URL was configured and none was passed explicitly.
    #[error("database URL missing: set --database-url or FOODGRAM_DATABASE_URL")]
    MissingDatabaseUrl,
    /// The URL was present but blank.
    #[error("database URL must not be empty")]
    EmptyDatabaseUrl,
}

/// Connection settings shared by every binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum number of pooled connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Idle connections the pool keeps open.
    #[ortho_config(default = 2)]
    pub pool_min_idle: u32,
    /// Apply pending migrations before doing any work.
    pub run_migrations: Option<bool>,
}

impl DatabaseSettings {
    /// Load settings from the environment and configuration files only.
    ///
    /// Command-line arguments are left to the calling binary.
    pub fn from_environment(program: &str) -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from(program)]).map_err(|err| SettingsError::Load {
            message: err.to_string(),
        })
    }

    /// Whether pending migrations should run first. Off unless configured.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(false)
    }

    /// Resolve the database URL, preferring `explicit` over the loaded value.
    pub fn resolve_database_url(&self, explicit: Option<String>) -> Result<String, SettingsError> {
        let url = explicit
            .or_else(|| self.database_url.clone())
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        if url.trim().is_empty() {
            return Err(SettingsError::EmptyDatabaseUrl);
        }
        Ok(url)
    }

    /// Build the pool configuration for `database_url`.
    pub fn pool_config(&self, database_url: String) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.pool_max_size)
            .with_min_idle(Some(self.pool_min_idle))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for database settings parsing.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "FOODGRAM_DATABASE_URL",
        "FOODGRAM_POOL_MAX_SIZE",
        "FOODGRAM_POOL_MIN_IDLE",
        "FOODGRAM_RUN_MIGRATIONS",
    ];

    fn cleared() -> [(&'static str, Option<String>); 4] {
        VARS.map(|name| (name, None))
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(cleared());

        let settings = DatabaseSettings::from_environment("foodgram").expect("settings load");

        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size, 10);
        assert_eq!(settings.pool_min_idle, 2);
        assert!(!settings.run_migrations());
        assert_eq!(
            settings.resolve_database_url(None),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "FOODGRAM_DATABASE_URL",
                Some("postgres://cook@localhost/recipes".to_owned()),
            ),
            ("FOODGRAM_POOL_MAX_SIZE", Some("4".to_owned())),
            ("FOODGRAM_POOL_MIN_IDLE", Some("1".to_owned())),
            ("FOODGRAM_RUN_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = DatabaseSettings::from_environment("foodgram").expect("settings load");

        assert!(settings.run_migrations());
        assert_eq!(
            settings.resolve_database_url(None).as_deref(),
            Ok("postgres://cook@localhost/recipes")
        );
        let pool = settings.pool_config("postgres://cook@localhost/recipes".to_owned());
        assert_eq!(pool.max_size(), 4);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("false"), false)]
    #[case(Some("true"), true)]
    fn run_migrations_follows_the_environment(
        #[case] raw: Option<&str>,
        #[case] expected: bool,
    ) {
        let mut vars = cleared();
        vars[3] = ("FOODGRAM_RUN_MIGRATIONS", raw.map(str::to_owned));
        let _guard = lock_env(vars);

        let settings = DatabaseSettings::from_environment("foodgram").expect("settings load");

        assert_eq!(settings.run_migrations(), expected);
    }

    #[rstest]
    #[case(Some("postgres://override/db"), Ok("postgres://override/db"))]
    #[case(Some("   "), Err(SettingsError::EmptyDatabaseUrl))]
    #[case(None, Ok("postgres://configured/db"))]
    fn explicit_url_wins_over_settings(
        #[case] explicit: Option<&str>,
        #[case] expected: Result<&str, SettingsError>,
    ) {
        let settings = DatabaseSettings {
            database_url: Some("postgres://configured/db".to_owned()),
            pool_max_size: 10,
            pool_min_idle: 2,
            run_migrations: None,
        };

        let resolved = settings.resolve_database_url(explicit.map(str::to_owned));

        assert_eq!(resolved.as_deref().map_err(Clone::clone), expected);
    }
}
