//! Recipe composition, user relations, and shopping list aggregation.
//!
//! - [`domain`] holds entities, validation, services, and ports.
//! - [`outbound`] holds the in-memory and PostgreSQL adapters.
//! - [`config`] and [`telemetry`] carry the settings and logging the
//!   binaries share.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
