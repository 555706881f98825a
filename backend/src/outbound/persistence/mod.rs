//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository port has a Diesel implementation here, backed by
//! `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Business rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Explicit cascades**: foreign keys carry no `ON DELETE` actions;
//!   deletes remove dependent rows inside their own transaction.
//! - **Named constraints**: unique and foreign key violations are mapped to
//!   port errors by constraint name.
//!
//! # Example
//!
//! ```no_run
//! use foodgram::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), foodgram::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_ingredient_repository;
mod diesel_recipe_repository;
mod diesel_relation_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ingredient_repository::DieselIngredientRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_relation_repository::DieselRelationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
