//! Outbound adapters implementing the domain's driven ports.
//!
//! - **memory**: in-process store behind one lock, used by tests and by
//!   embedders that do not need durability.
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//!
//! Adapters translate between domain types and storage representations and
//! enforce storage-level constraints. They contain no business rules beyond
//! the explicit delete cascades.

pub mod memory;
pub mod persistence;
